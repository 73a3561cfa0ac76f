//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use shared::error::AppError;
use shared::models::{LoginRequest, LoginResponse};

use crate::api::json_body;
use crate::core::ServerState;
use crate::security_log;

/// Fixed delay on failed logins to slow down guessing
const AUTH_FAILURE_DELAY_MS: u64 = 300;

/// Login handler
///
/// Checks the configured cashier credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let req = json_body(payload)?;
    let config = &state.config;
    let valid = req.username == config.cashier_username && req.password == config.cashier_password;

    if !valid {
        tokio::time::sleep(Duration::from_millis(AUTH_FAILURE_DELAY_MS)).await;
        security_log!("WARN", "login_failed", username = req.username.clone());
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                success: false,
                message: "Invalid username or password".to_string(),
                token: None,
            }),
        ));
    }

    let token = state
        .jwt_service
        .generate_token(&req.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(username = %req.username, "Cashier logged in");

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            token: Some(token),
        }),
    ))
}
