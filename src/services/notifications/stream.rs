//! 通知实时推送（Server-Sent Events）
//!
//! 客户端订阅 `GET /api/notifications/stream`，首先收到一条 `connected` 事件，
//! 之后每条新通知以 `notification` 事件推送，空闲时定期发送注释行保活。
//! 同一用户的多个连接共享一个广播通道，最后一个连接断开时通道被移除。

use std::convert::Infallible;
use std::time::Duration;

use actix_web::http::header;
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use dashmap::DashMap;
use futures_util::Stream;
use once_cell::sync::Lazy;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::models::notifications::entities::Notification;
use crate::services::{current_user, unauthorized};

/// 全局连接管理器
static CONNECTION_MANAGER: Lazy<ConnectionManager> = Lazy::new(ConnectionManager::new);

const KEEP_ALIVE_FRAME: &[u8] = b": keep-alive\n\n";

/// 连接管理器：用户 ID -> 广播发送器
pub struct ConnectionManager {
    connections: DashMap<i64, broadcast::Sender<Notification>>,
}

impl ConnectionManager {
    fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// 获取全局实例
    pub fn get() -> &'static Self {
        &CONNECTION_MANAGER
    }

    /// 注册用户连接
    pub fn register(&self, user_id: i64) -> broadcast::Receiver<Notification> {
        let capacity = AppConfig::get().notifications.channel_capacity.max(1);
        self.connections
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(capacity).0)
            .subscribe()
    }

    /// 没有订阅者时移除用户的通道
    pub fn unregister(&self, user_id: i64) {
        self.connections
            .remove_if(&user_id, |_, sender| sender.receiver_count() == 0);
    }

    /// 推送给通知的接收者，用户不在线时返回 false
    pub fn push(&self, notification: Notification) -> bool {
        match self.connections.get(&notification.user_id) {
            Some(sender) => sender.send(notification).is_ok(),
            None => false,
        }
    }

    pub fn is_online(&self, user_id: i64) -> bool {
        self.connections.contains_key(&user_id)
    }

    pub fn online_count(&self) -> usize {
        self.connections.len()
    }
}

/// 单个 SSE 连接的状态，随响应流一起释放
struct StreamState {
    user_id: i64,
    rx: Option<broadcast::Receiver<Notification>>,
    keep_alive: Interval,
    greeted: bool,
}

impl Drop for StreamState {
    fn drop(&mut self) {
        // 先释放接收端，unregister 才能看到正确的订阅数
        self.rx.take();
        ConnectionManager::get().unregister(self.user_id);
        debug!("SSE stream closed for user {}", self.user_id);
    }
}

enum StreamEvent {
    Message(Result<Notification, RecvError>),
    KeepAlive,
}

fn event_frame(event: &str, id: Option<i64>, data: &str) -> Bytes {
    let mut frame = format!("event: {event}\n");
    if let Some(id) = id {
        frame.push_str(&format!("id: {id}\n"));
    }
    frame.push_str(&format!("data: {data}\n\n"));
    Bytes::from(frame)
}

/// 构建某个用户的事件流
pub fn notification_stream(
    user_id: i64,
    keep_alive_every: Duration,
) -> impl Stream<Item = Result<Bytes, Infallible>> + 'static {
    let mut keep_alive =
        tokio::time::interval_at(Instant::now() + keep_alive_every, keep_alive_every);
    keep_alive.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let state = StreamState {
        user_id,
        rx: Some(ConnectionManager::get().register(user_id)),
        keep_alive,
        greeted: false,
    };

    futures_util::stream::unfold(state, |mut state| async move {
        if !state.greeted {
            state.greeted = true;
            let data = serde_json::json!({ "user_id": state.user_id }).to_string();
            return Some((Ok(event_frame("connected", None, &data)), state));
        }

        loop {
            let event = {
                let rx = state.rx.as_mut()?;
                tokio::select! {
                    message = rx.recv() => StreamEvent::Message(message),
                    _ = state.keep_alive.tick() => StreamEvent::KeepAlive,
                }
            };

            match event {
                StreamEvent::Message(Ok(notification)) => {
                    match serde_json::to_string(&notification) {
                        Ok(data) => {
                            let frame = event_frame("notification", Some(notification.id), &data);
                            return Some((Ok(frame), state));
                        }
                        Err(e) => warn!("Failed to serialize notification {}: {}", notification.id, e),
                    }
                }
                StreamEvent::Message(Err(RecvError::Lagged(skipped))) => {
                    warn!(
                        "SSE stream for user {} lagged, {} notifications skipped",
                        state.user_id, skipped
                    );
                }
                StreamEvent::Message(Err(RecvError::Closed)) => return None,
                StreamEvent::KeepAlive => {
                    return Some((Ok(Bytes::from_static(KEEP_ALIVE_FRAME)), state));
                }
            }
        }
    })
}

pub async fn open_stream(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };

    let keep_alive = Duration::from_secs(AppConfig::get().notifications.keep_alive_secs.max(1));
    info!("SSE stream opened for user {}", user.id);

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        // 跳过 Compress 中间件，压缩缓冲会拖延事件
        .insert_header((header::CONTENT_ENCODING, "identity"))
        .streaming(notification_stream(user.id, keep_alive)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::entities::NotificationKind;
    use futures_util::StreamExt;

    fn notification(user_id: i64, id: i64) -> Notification {
        Notification {
            id,
            user_id,
            kind: NotificationKind::General,
            title: "Hello".into(),
            body: None,
            link: None,
            is_read: false,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_manager_drops_channel_without_receivers() {
        let manager = ConnectionManager::new();
        let rx = manager.register(7);
        assert!(manager.is_online(7));
        assert!(manager.push(notification(7, 1)));
        assert!(!manager.push(notification(8, 2)));

        manager.unregister(7);
        assert!(manager.is_online(7));
        drop(rx);
        manager.unregister(7);
        assert!(!manager.is_online(7));
        assert_eq!(manager.online_count(), 0);
    }

    #[tokio::test]
    async fn test_stream_greets_then_forwards_notifications() {
        let user_id = 910_001;
        let stream = notification_stream(user_id, Duration::from_secs(3600));
        futures_util::pin_mut!(stream);

        let first = stream.next().await.unwrap().unwrap();
        assert!(String::from_utf8_lossy(&first).starts_with("event: connected\n"));

        assert!(ConnectionManager::get().push(notification(user_id, 42)));
        let second = stream.next().await.unwrap().unwrap();
        let text = String::from_utf8_lossy(&second).to_string();
        assert!(text.starts_with("event: notification\nid: 42\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn test_dropping_stream_unregisters() {
        let user_id = 910_002;
        let stream = notification_stream(user_id, Duration::from_secs(3600));
        assert!(ConnectionManager::get().is_online(user_id));
        drop(stream);
        assert!(!ConnectionManager::get().is_online(user_id));
    }

    #[tokio::test]
    async fn test_keep_alive_comment() {
        let stream = notification_stream(910_003, Duration::from_millis(20));
        futures_util::pin_mut!(stream);
        stream.next().await.unwrap().unwrap();
        let frame = stream.next().await.unwrap().unwrap();
        assert_eq!(&frame[..], KEEP_ALIVE_FRAME);
    }
}
