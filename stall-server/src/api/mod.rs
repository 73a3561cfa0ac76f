//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 收银员登录
//! - [`orders`] - 订单接口 (下单、凭证上传、收银员操作)
//! - [`ws`] - 实时推送
//!
//! 上传的付款凭证以静态文件形式挂在 `/uploads/` 下。

pub mod auth;
pub mod health;
pub mod orders;
pub mod ws;

use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use axum::{Json, Router};
use shared::error::{AppError, AppResult};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// multipart 边界、表单头等额外开销
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// JSON 请求体解析失败统一转为 `ValidationFailed`
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::validation(e.body_text()))
}

/// Build a router with all routes registered (no global middleware, no state)
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Auth API - public route
        .merge(auth::router())
        // Order API - public + cashier routes
        .merge(orders::router(state))
        // Health API - public route
        .merge(health::router())
        // Realtime channel - public route
        .route("/ws", get(ws::handle_ws))
        // Payment proof files (read-only)
        .nest_service("/uploads", ServeDir::new(state.config.uploads_dir()))
}

/// Build a fully configured application with all middleware and state
///
/// Used by both the HTTP server and the integration tests
pub fn build_app(state: &ServerState) -> Router {
    build_router(state)
        // Request body limit - sized to the proof upload limit
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes + MULTIPART_OVERHEAD,
        ))
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone())
}
