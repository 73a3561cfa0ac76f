//! Data models
//!
//! Shared between stall-server and the order / cashier pages (via API).
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod auth;
pub mod order;

// Re-exports
pub use auth::*;
pub use order::*;
