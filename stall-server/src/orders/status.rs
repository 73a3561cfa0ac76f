//! Cashier status policy
//!
//! The engine only owns the two payment states. Every other status is
//! written by the cashier; by default any non-empty label is accepted,
//! optionally narrowed to a configured list.

use super::error::{LifecycleError, LifecycleResult};
use shared::error::ErrorCode;
use shared::models::OrderStatus;

pub const MAX_STATUS_LEN: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct StatusPolicy {
    allowed: Option<Vec<String>>,
}

impl StatusPolicy {
    /// `None` accepts any non-empty status
    pub fn new(allowed: Option<Vec<String>>) -> Self {
        Self { allowed }
    }

    pub fn check(&self, raw: &str) -> LifecycleResult<OrderStatus> {
        let status = raw.trim();
        if status.is_empty() {
            return Err(LifecycleError::invalid(
                ErrorCode::RequiredField,
                "New status is required",
            ));
        }
        if status.chars().count() > MAX_STATUS_LEN {
            return Err(LifecycleError::invalid(
                ErrorCode::OrderInvalidStatus,
                format!("Status must be at most {MAX_STATUS_LEN} characters"),
            ));
        }

        let status = OrderStatus::new(status);
        if let Some(allowed) = &self.allowed
            && !status.is_engine_owned()
            && !allowed.iter().any(|s| s == status.as_str())
        {
            return Err(LifecycleError::invalid(
                ErrorCode::OrderInvalidStatus,
                format!("Unknown status '{status}'"),
            ));
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_policy_accepts_any_label() {
        let policy = StatusPolicy::default();
        assert_eq!(policy.check(" PREPARING ").unwrap().as_str(), "PREPARING");
        assert_eq!(policy.check("selesai").unwrap().as_str(), "selesai");
        assert!(policy.check("   ").is_err());
        assert!(policy.check(&"X".repeat(MAX_STATUS_LEN + 1)).is_err());
    }

    #[test]
    fn test_configured_policy() {
        let policy = StatusPolicy::new(Some(vec!["PREPARING".into(), "DONE".into()]));
        assert!(policy.check("DONE").is_ok());
        assert!(policy.check("AWAITING_PAYMENT").is_ok());
        assert!(matches!(
            policy.check("LOST"),
            Err(LifecycleError::Validation { code: ErrorCode::OrderInvalidStatus, .. })
        ));
    }
}
