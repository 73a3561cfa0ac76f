use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::live::NotificationHub;
use crate::orders::{OrderService, StatusPolicy};
use crate::services::ProofStore;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 克隆成本很低：连接池、广播通道和 JWT 服务内部都是共享的。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | hub | NotificationHub | 实时推送 |
/// | orders | OrderService | 订单生命周期引擎 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 数据库
    pub db: DbService,
    /// 实时推送中心
    pub hub: NotificationHub,
    /// 订单生命周期引擎
    pub orders: OrderService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 在已打开的数据库上组装所有服务
    pub fn new(config: Config, db: DbService) -> Self {
        let hub = NotificationHub::new();
        let proofs = ProofStore::new(config.uploads_dir(), config.max_upload_bytes);
        let orders = OrderService::new(
            db.pool.clone(),
            proofs,
            hub.clone(),
            StatusPolicy::new(config.order_statuses.clone()),
        );
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            db,
            hub,
            orders,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 配置检查
    /// 2. 工作目录结构 (database/, uploads/)
    /// 3. 数据库 (work_dir/database/stall.db，应用迁移)
    /// 4. 各服务 (ProofStore, NotificationHub, OrderService, JWT)
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.validate().map_err(ServerError::Config)?;
        config.ensure_work_dir_structure()?;

        let db_path = config.database_file();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        tracing::info!(
            work_dir = %config.work_dir,
            environment = %config.environment,
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), db))
    }

    /// 内存数据库 + 指定工作目录 (测试用)
    pub async fn in_memory(config: Config) -> Result<Self> {
        let db = DbService::in_memory().await?;
        Ok(Self::new(config, db))
    }
}
