//! Logging Infrastructure
//!
//! Structured logging: console always, plus a daily-rolling file when a
//! log directory is configured.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log file name prefix inside `LOG_DIR`
const LOG_FILE_PREFIX: &str = "stall-server";

/// Build the filter: `RUST_LOG` wins, otherwise `level` for our crates
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stall_server={level},shared={level},tower_http={level},sqlx=warn"
        ))
    })
}

/// Initialize the logger (console only, `info`)
pub fn init_logger() {
    let _ = init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// The returned guard flushes the file writer; keep it alive for the
/// lifetime of the process.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let level = log_level.unwrap_or("info");

    let console = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let file = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);

            let _ = tracing_subscriber::registry()
                .with(env_filter(level))
                .with(console)
                .with(file)
                .try_init();
            return Some(guard);
        }
    }

    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console)
        .try_init();
    None
}
