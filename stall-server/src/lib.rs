//! Stall Server - 小吃摊点单后端
//!
//! # 架构概述
//!
//! 顾客在公开页面下单，收银员在登录后的页面查看订单、更新状态，
//! 双方通过 WebSocket 实时同步。
//!
//! - **订单引擎** (`orders`): 状态流转、派生字段、写库后广播
//! - **数据库** (`db`): SQLite (sqlx)，订单和明细
//! - **付款凭证** (`services`): 上传文件存储
//! - **实时推送** (`live`): 所有连接共享的通知中心
//! - **认证** (`auth`): 收银员 JWT
//! - **HTTP API** (`api`): REST 接口 + `/ws`
//!
//! # 模块结构
//!
//! ```text
//! stall-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证
//! ├── services/      # 付款凭证存储
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志
//! ├── db/            # 数据库层
//! ├── live/          # 实时推送
//! └── orders/        # 订单生命周期
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod live;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use live::NotificationHub;
pub use orders::{LifecycleError, OrderService};

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env，初始化日志
///
/// 返回的 guard 需要保持到进程结束，否则文件日志不会落盘。
pub fn setup_environment() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty());
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __        ____
  / ___// /_____ _/ / /
  \__ \/ __/ __ `/ / /
 ___/ / /_/ /_/ / / /
/____/\__/\__,_/_/_/
        stall-server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
