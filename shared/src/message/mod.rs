//! 实时推送消息类型定义
//!
//! 这些类型在 stall-server 和收银/下单页面之间共享，
//! 通过 WebSocket 以 JSON 文本帧发送：
//!
//! ```json
//! { "event": "status-update", "data": { "orderId": 1, "newStatus": "DONE" } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Order, OrderStatus, PaymentMethod};

/// 新订单广播内容
///
/// 只包含订单的公开字段；单品备注和明细不在广播中出现。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderPayload {
    pub id: i64,
    pub customer_name: String,
    pub table_number: Option<String>,
    pub total_price: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: i64,
    pub items_summary: String,
}

impl From<&Order> for NewOrderPayload {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer_name.clone(),
            table_number: order.table_number.clone(),
            total_price: order.total_price,
            payment_method: order.payment_method.clone(),
            status: order.status.clone(),
            created_at: order.created_at,
            items_summary: order.items_summary.clone(),
        }
    }
}

/// 服务器推送事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum StallEvent {
    /// 连接建立后的问候 (仅发给新连接)
    Connected { subscriber_id: String },
    /// 新订单
    NewOrder(NewOrderPayload),
    /// 订单状态变化
    StatusUpdate {
        order_id: i64,
        new_status: OrderStatus,
    },
    /// 付款凭证已上传
    ProofUploaded { order_id: i64, file_ref: String },
}

impl StallEvent {
    /// 事件名 (与 JSON 中的 `event` 字段一致)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::NewOrder(_) => "new-order",
            Self::StatusUpdate { .. } => "status-update",
            Self::ProofUploaded { .. } => "proof-uploaded",
        }
    }

    /// 关联的订单 ID
    pub fn order_id(&self) -> Option<i64> {
        match self {
            Self::Connected { .. } => None,
            Self::NewOrder(payload) => Some(payload.id),
            Self::StatusUpdate { order_id, .. } | Self::ProofUploaded { order_id, .. } => {
                Some(*order_id)
            }
        }
    }

    /// 序列化为 JSON 文本帧
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for StallEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
