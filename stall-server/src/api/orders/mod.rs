//! Order API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/orders (/submit-order) | POST | 顾客下单 | 无 |
//! | /api/orders/{id}/payment-proof (/upload-qris-proof/{id}) | POST | 上传付款凭证 | 无 |
//! | /api/orders (/orders) | GET | 订单列表 (含明细) | 收银员 |
//! | /api/orders/{id} (/order/{id}) | GET | 订单详情 | 收银员 |
//! | /api/orders/{id}/items (/order-items/{id}) | GET | 订单明细 | 收银员 |
//! | /api/orders/{id}/status (/update-status/{id}) | POST | 更新状态 | 收银员 |
//!
//! 括号中是旧页面使用的路径，行为完全相同。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_cashier;
use crate::core::ServerState;

/// Order router
pub fn router(state: &ServerState) -> Router<ServerState> {
    public_routes().merge(cashier_routes(state))
}

fn public_routes() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", post(handler::submit))
        .route("/submit-order", post(handler::submit))
        .route("/api/orders/{id}/payment-proof", post(handler::upload_payment_proof))
        .route("/upload-qris-proof/{id}", post(handler::upload_payment_proof))
}

fn cashier_routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(handler::list))
        .route("/orders", get(handler::list))
        .route("/api/orders/{id}", get(handler::get_by_id))
        .route("/order/{id}", get(handler::get_by_id))
        .route("/api/orders/{id}/items", get(handler::get_items))
        .route("/order-items/{id}", get(handler::get_items))
        .route("/api/orders/{id}/status", post(handler::update_status))
        .route("/update-status/{id}", post(handler::update_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_cashier,
        ))
}
