//! 认证中间件
//!
//! 为收银员 (特权) 接口提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;

use crate::auth::{CASHIER_ROLE, CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 旧收银页面登录后附带的标记头
pub const LEGACY_LOGIN_HEADER: &str = "x-logged-in";

/// 认证中间件 - 要求收银员已登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，
/// 成功后将 [`CurrentUser`] 注入请求扩展。
///
/// 配置 `ALLOW_LEGACY_LOGIN_HEADER=true` 时，`X-Logged-In: true` 也视为已登录。
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_cashier(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            if state.config.allow_legacy_login_header && has_legacy_marker(&req) {
                req.extensions_mut().insert(CurrentUser {
                    username: state.config.cashier_username.clone(),
                    role: CASHIER_ROLE.to_string(),
                });
                return Ok(next.run(req).await);
            }
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::not_authenticated());
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

fn has_legacy_marker(req: &Request) -> bool {
    req.headers()
        .get(LEGACY_LOGIN_HEADER)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
