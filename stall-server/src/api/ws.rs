//! Realtime WebSocket endpoint
//!
//! GET /ws (public)
//!
//! 协议:
//! - Server → Client: `StallEvent` JSON 文本帧 (`connected`, `new-order`, `status-update`, `proof-uploaded`)
//! - Client → Server: 无 (文本帧被忽略，只处理 close)

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use shared::StallEvent;
use tokio::time::Duration;

use crate::core::ServerState;

/// 心跳间隔
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// GET /ws
pub async fn handle_ws(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_session(socket, state))
}

async fn ws_session(socket: WebSocket, state: ServerState) {
    let (mut sink, mut stream) = socket.split();

    // 注册订阅者；离开此函数时 Subscription drop 自动注销
    let mut subscription = state.hub.subscribe();

    let hello = StallEvent::Connected {
        subscriber_id: subscription.id().to_string(),
    };
    if send_event(&mut sink, &hello).await.is_err() {
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = subscription.recv() => {
                match event {
                    Some(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    // 客户端消息没有语义
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!(subscriber_id = %subscription.id(), "WS session ended");
}

async fn send_event(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &StallEvent,
) -> Result<(), axum::Error> {
    let json = match event.to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(event = event.name(), error = %e, "Failed to serialize event");
            return Ok(());
        }
    };
    sink.send(Message::Text(json.into())).await
}
