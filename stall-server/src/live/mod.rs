//! NotificationHub — 订单事件实时分发
//!
//! 生命周期引擎发布事件，所有已连接的收银/顾客页面都会收到同一份。
//! 不做按订阅者过滤，不持久化，不重放：连接之前发生的事件就错过了。
//!
//! ```text
//! OrderService
//!       │ StallEvent
//!       ▼
//! NotificationHub
//!   ├── tx: broadcast::Sender<StallEvent> (fan-out)
//!   └── subscribers: subscriber_id → connected_at
//!         │
//!         ▼
//!   WS handler (subscribe → 推送)
//! ```

use dashmap::DashMap;
use shared::StallEvent;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

/// Broadcast channel 容量 — 足以缓冲连接时突发
pub const BROADCAST_CAPACITY: usize = 256;

/// 进程内唯一的通知中心，clone 共享同一个 channel
#[derive(Clone)]
pub struct NotificationHub {
    tx: broadcast::Sender<StallEvent>,
    /// subscriber_id → connected_at (millis)
    subscribers: Arc<DashMap<String, i64>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            subscribers: Arc::new(DashMap::new()),
        }
    }

    /// 注册一个新的订阅者
    ///
    /// 返回的 [`Subscription`] 被 drop 时自动注销。
    pub fn subscribe(&self) -> Subscription {
        let id = Uuid::new_v4().to_string();
        self.subscribers
            .insert(id.clone(), shared::util::now_millis());
        tracing::info!(subscriber_id = %id, total = self.subscribers.len(), "Subscriber connected");

        Subscription {
            id,
            rx: self.tx.subscribe(),
            subscribers: self.subscribers.clone(),
        }
    }

    /// 发布事件到所有订阅者，返回收到事件的订阅者数量
    ///
    /// 没有订阅者时 send 返回 Err，安全忽略；调用方永远不会因为推送失败而失败。
    pub fn broadcast(&self, event: StallEvent) -> usize {
        let name = event.name();
        match self.tx.send(event) {
            Ok(n) => {
                tracing::debug!(event = name, receivers = n, "Event broadcast");
                n
            }
            Err(_) => {
                tracing::trace!(event = name, "No subscribers, event dropped");
                0
            }
        }
    }

    /// 当前连接数
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

/// 单个订阅者的接收端
pub struct Subscription {
    id: String,
    rx: broadcast::Receiver<StallEvent>,
    subscribers: Arc<DashMap<String, i64>>,
}

impl Subscription {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 等待下一个事件；hub 关闭时返回 None
    ///
    /// 落后超过 channel 容量时跳过丢失的事件，从当前位置继续。
    pub async fn recv(&mut self) -> Option<StallEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(subscriber_id = %self.id, skipped, "Subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.subscribers.remove(&self.id);
        tracing::info!(subscriber_id = %self.id, total = self.subscribers.len(), "Subscriber disconnected");
    }
}
