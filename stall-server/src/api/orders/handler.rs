//! Order API Handlers

use axum::{
    Extension, Json,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Order, OrderItem, OrderWithItems, PaymentProofResponse, SubmitOrderRequest,
    SubmitOrderResponse, UpdateStatusRequest,
};

use crate::api::json_body;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::ProofUpload;

/// Multipart field names accepted for the proof image
const PROOF_FIELDS: &[&str] = &["file", "qrisImage"];

fn order_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::invalid_request(format!("Invalid order id: {}", e.body_text())))
}

/// Submit a new order (public)
pub async fn submit(
    State(state): State<ServerState>,
    payload: Result<Json<SubmitOrderRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SubmitOrderResponse>)> {
    let req = json_body(payload)?;
    let order = state.orders.submit_order(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitOrderResponse {
            message: "Order received".to_string(),
            order_id: order.id,
            initial_status: order.status,
        }),
    ))
}

/// List all orders with items, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderWithItems>>> {
    let orders = state.orders.list_orders().await?;
    Ok(Json(orders))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Order>> {
    let id = order_id(path)?;
    let order = state.orders.get_order(id).await?;
    Ok(Json(order))
}

/// Get the line items of an order (empty for unknown ids)
pub async fn get_items(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Vec<OrderItem>>> {
    let id = order_id(path)?;
    let items = state.orders.get_items(id).await?;
    Ok(Json(items))
}

/// Cashier status update
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(cashier): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> AppResult<Json<serde_json::Value>> {
    let id = order_id(path)?;
    let req = json_body(payload)?;
    let status = state.orders.change_status(id, &req.new_status).await?;
    tracing::info!(
        order_id = id,
        status = %status,
        cashier = %cashier.username,
        "Order status changed by cashier"
    );

    Ok(Json(serde_json::json!({
        "message": "Status updated",
        "orderId": id,
        "newStatus": status,
    })))
}

/// Payment proof upload (public, multipart)
///
/// The image is read from the `file` field; `qrisImage` is accepted for
/// the older customer page.
pub async fn upload_payment_proof(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<PaymentProofResponse>> {
    let id = order_id(path)?;
    let mut multipart = multipart.map_err(|e| {
        AppError::with_message(
            ErrorCode::NoFileProvided,
            format!("Expected a multipart/form-data upload: {}", e.body_text()),
        )
    })?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if !field.name().is_some_and(|name| PROOF_FIELDS.contains(&name)) {
            continue;
        }
        let file_name = field.file_name().map(|s| s.to_string());
        let data = field.bytes().await.map_err(multipart_error)?.to_vec();
        upload = Some(ProofUpload { file_name, data });
        break;
    }

    let file_ref = state.orders.record_payment_proof(id, upload).await?;
    Ok(Json(PaymentProofResponse {
        message: "Payment proof uploaded".to_string(),
        file_ref,
    }))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::with_message(ErrorCode::FileTooLarge, e.body_text())
    } else {
        AppError::validation(format!("Invalid multipart request: {}", e.body_text()))
    }
}
