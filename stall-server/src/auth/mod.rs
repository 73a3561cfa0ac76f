//! 认证模块
//!
//! 只区分两类能力：公开接口和收银员 (特权) 接口。
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前收银员
//! - [`require_cashier`] - 特权接口中间件

pub mod jwt;
pub mod middleware;

pub use jwt::{CASHIER_ROLE, Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{LEGACY_LOGIN_HEADER, require_cashier};
