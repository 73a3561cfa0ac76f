use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 默认上传大小上限 (5MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// 服务器配置 - 小吃摊后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、上传文件、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | WORK_DIR/database/stall.db | SQLite 文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | CASHIER_USERNAME | kasir | 收银员登录名 |
/// | CASHIER_PASSWORD | (开发环境默认值) | 收银员密码 |
/// | MAX_UPLOAD_BYTES | 5242880 | 付款凭证大小上限 |
/// | ORDER_STATUSES | (未设置) | 允许的状态列表，逗号分隔 |
/// | ALLOW_LEGACY_LOGIN_HEADER | false | 是否接受 `X-Logged-In: true` |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 日志文件目录 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/stall HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、上传文件、日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库路径 (None = work_dir/database/stall.db)
    pub database_path: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 收银员账号
    pub cashier_username: String,
    /// 收银员密码
    pub cashier_password: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 单个上传文件大小上限 (字节)
    pub max_upload_bytes: usize,
    /// 收银员可设置的状态 (None = 不限制，只要求非空)
    pub order_statuses: Option<Vec<String>>,
    /// 兼容旧收银页面的 `X-Logged-In` 头
    pub allow_legacy_login_header: bool,
    /// 日志级别
    pub log_level: String,
    /// 日志目录 (None = 只输出到终端)
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH")
                .ok()
                .filter(|s| !s.is_empty()),
            cashier_username: std::env::var("CASHIER_USERNAME")
                .unwrap_or_else(|_| "kasir".into()),
            cashier_password: std::env::var("CASHIER_PASSWORD")
                .unwrap_or_else(|_| "dev-cashier-password".into()),
            jwt: JwtConfig::from_env(&environment),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            order_statuses: std::env::var("ORDER_STATUSES")
                .ok()
                .and_then(|v| parse_status_list(&v)),
            allow_legacy_login_header: std::env::var("ALLOW_LEGACY_LOGIN_HEADER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.database_path = None;
        config
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 数据库文件路径
    pub fn database_file(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => PathBuf::from(path),
            None => self.database_dir().join("stall.db"),
        }
    }

    /// 付款凭证目录 (work_dir/uploads)
    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    /// 启动前检查配置
    ///
    /// 非开发环境必须显式提供 `JWT_SECRET` 和收银员密码。
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.is_empty() {
            return Err(format!(
                "JWT_SECRET environment variable must be set in {}",
                self.environment
            ));
        }
        if self.jwt.secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters long".to_string());
        }
        if !self.is_development() && std::env::var("CASHIER_PASSWORD").is_err() {
            return Err(format!(
                "CASHIER_PASSWORD environment variable must be set in {}",
                self.environment
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be greater than 0".to_string());
        }
        Ok(())
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.uploads_dir())?;
        if let Some(parent) = self.database_file().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 解析 `PREPARING, DONE ,CANCELLED` 形式的状态列表
fn parse_status_list(raw: &str) -> Option<Vec<String>> {
    let statuses: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if statuses.is_empty() {
        None
    } else {
        Some(statuses)
    }
}
