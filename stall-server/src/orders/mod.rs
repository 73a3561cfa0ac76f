//! Order Lifecycle Module
//!
//! - **service**: `OrderService`, the lifecycle engine
//! - **summary**: derived fields (items summary, initial status)
//! - **status**: cashier status policy
//! - **error**: `LifecycleError` and its mapping onto `AppError`
//!
//! # Data Flow
//!
//! ```text
//! HTTP handler → OrderService ─┬─→ order repository (SQLite)
//!                              ├─→ ProofStore (uploads/)
//!                              └─→ NotificationHub → all WS subscribers
//! ```

pub mod error;
pub mod service;
pub mod status;
pub mod summary;

pub use error::{LifecycleError, LifecycleResult};
pub use service::{OrderService, ProofUpload};
pub use status::StatusPolicy;
