//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// 等待付款 (CASH / QRIS 下单后的初始状态)
pub const AWAITING_PAYMENT: &str = "AWAITING_PAYMENT";
/// 等待收银员确认 (其他支付方式的初始状态，或上传付款凭证之后)
pub const AWAITING_CONFIRMATION: &str = "AWAITING_CONFIRMATION";

/// Order status
///
/// 状态集合是开放的：引擎只拥有 [`AWAITING_PAYMENT`] 和 [`AWAITING_CONFIRMATION`]，
/// 其余状态 (如 `PREPARING`, `DONE`, `CANCELLED`) 由收银员通过状态更新接口写入。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn awaiting_payment() -> Self {
        Self(AWAITING_PAYMENT.to_string())
    }

    pub fn awaiting_confirmation() -> Self {
        Self(AWAITING_CONFIRMATION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为引擎自身会写入的状态
    pub fn is_engine_owned(&self) -> bool {
        self.0 == AWAITING_PAYMENT || self.0 == AWAITING_CONFIRMATION
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Payment method tag
///
/// `TUNAI` (legacy cash tag of the customer page) is normalised to `CASH`.
/// Any other non-empty tag is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    Qris,
    Other(String),
}

impl PaymentMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cash => "CASH",
            Self::Qris => "QRIS",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Other(tag) if tag.is_empty())
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        let tag = value.trim();
        match tag.to_ascii_uppercase().as_str() {
            "CASH" | "TUNAI" => Self::Cash,
            "QRIS" => Self::Qris,
            _ => Self::Other(tag.to_string()),
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Other(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity (one row of `orders`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub table_number: Option<String>,
    /// Total in currency unit
    pub total_price: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Unix millis, set once by the store
    pub created_at: i64,
    /// `/uploads/...` reference of the latest payment proof
    pub payment_proof_ref: Option<String>,
    /// Denormalised "Sate x2, Es Teh x1 (less sugar)"
    pub items_summary: String,
}

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub item_name: String,
    pub quantity: i64,
    /// Unit price in currency unit
    pub unit_price: f64,
    /// 单品备注 (订单本身没有备注字段)
    pub note: Option<String>,
}

/// Order with its line items attached (cashier listing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Request / Response DTOs
// =============================================================================

/// Cart line as submitted by the customer page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, alias = "unitPrice")]
    pub price: f64,
    #[serde(default, alias = "notes")]
    pub note: Option<String>,
}

impl OrderItemInput {
    /// Note with surrounding whitespace removed; empty notes count as absent
    pub fn trimmed_note(&self) -> Option<&str> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Submit order payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, alias = "cart")]
    pub items: Vec<OrderItemInput>,
}

/// Submit order response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderResponse {
    pub message: String,
    pub order_id: i64,
    pub initial_status: OrderStatus,
}

/// Status update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub new_status: String,
}

/// Payment proof upload response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProofResponse {
    pub message: String,
    pub file_ref: String,
}
