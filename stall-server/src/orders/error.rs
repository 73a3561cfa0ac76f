use crate::db::repository::RepoError;
use crate::services::ProofStoreError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Lifecycle engine errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Bad or missing input; nothing was written
    #[error("{message}")]
    Validation { code: ErrorCode, message: String },

    #[error("Order not found: {0}")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Upload error: {0}")]
    Upload(String),
}

impl LifecycleError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::invalid(ErrorCode::ValidationFailed, message)
    }

    pub fn invalid(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    /// Map a repository error for the given order
    pub fn from_repo(err: RepoError, order_id: i64) -> Self {
        match err {
            RepoError::NotFound(_) => Self::NotFound(order_id),
            other => other.into(),
        }
    }
}

impl From<RepoError> for LifecycleError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(msg) => Self::validation(msg),
            RepoError::NotFound(msg) | RepoError::Database(msg) => Self::Storage(msg),
        }
    }
}

impl From<ProofStoreError> for LifecycleError {
    fn from(err: ProofStoreError) -> Self {
        match err {
            ProofStoreError::Empty => Self::invalid(ErrorCode::EmptyFile, err.to_string()),
            ProofStoreError::TooLarge { .. } => {
                Self::invalid(ErrorCode::FileTooLarge, err.to_string())
            }
            ProofStoreError::InvalidRef(_) | ProofStoreError::Io(_) => {
                Self::Upload(err.to_string())
            }
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Validation { code, message } => AppError::with_message(code, message),
            LifecycleError::NotFound(id) => AppError::order_not_found(id),
            LifecycleError::Storage(cause) => {
                tracing::error!(error = %cause, "Order store failure");
                AppError::database("Database operation failed").with_detail("cause", cause)
            }
            LifecycleError::Upload(cause) => {
                tracing::error!(error = %cause, "Payment proof storage failure");
                AppError::file_storage("Failed to store payment proof").with_detail("cause", cause)
            }
        }
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
