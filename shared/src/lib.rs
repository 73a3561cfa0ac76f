//! Shared types for the stall backend
//!
//! Common types used by the server and its clients: error types,
//! response structures, the order model and realtime events.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use message::StallEvent;
