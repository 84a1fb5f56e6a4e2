//! Live subscription to `GET /news-notifications`.
//!
//! The channel runs as one spawned task that decodes the SSE body and
//! forwards `new_article` notifications to the UI as [`AppEvent`]s. There is
//! no automatic reconnect: any connection failure or end of stream closes
//! the channel and reports why. The user may reopen it manually.

use crate::api::{ApiClient, ApiError, Notification, ReceivedNotification, SseDecoder};
use crate::app::AppEvent;
use crate::util::catch_task_panic;
use futures::StreamExt;
use std::fmt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Connection state of the push channel, shown in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Live,
    Closed { reason: String },
}

impl ChannelState {
    pub fn closed(reason: impl Into<String>) -> Self {
        ChannelState::Closed {
            reason: reason.into(),
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ChannelState::Closed { .. })
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelState::Connecting => f.write_str("connecting"),
            ChannelState::Live => f.write_str("live"),
            ChannelState::Closed { reason } => write!(f, "closed: {}", reason),
        }
    }
}

/// Handle to the running subscription task.
///
/// `epoch` tags every status event the task sends, so status updates from a
/// previous subscription can be told apart after a reconnect.
#[derive(Debug)]
pub struct NotificationChannel {
    epoch: u64,
    handle: Option<JoinHandle<()>>,
}

impl NotificationChannel {
    /// Spawn the subscription task.
    pub fn open(api: ApiClient, epoch: u64, tx: mpsc::Sender<AppEvent>) -> Self {
        tracing::info!(epoch, url = %api.notifications_url(), "Opening notification channel");
        let handle = tokio::spawn(async move {
            let tx_panic = tx.clone();
            if let Err(panic_msg) = catch_task_panic(run(api, epoch, tx)).await {
                tracing::error!(task = "notifications", error = %panic_msg, "Background task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "notifications",
                        error: panic_msg,
                    })
                    .await;
            }
        });
        Self {
            epoch,
            handle: Some(handle),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True while the subscription task is still running.
    pub fn is_open(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the subscription. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                tracing::info!(epoch = self.epoch, "Closing notification channel");
            }
            handle.abort();
        }
    }
}

impl Drop for NotificationChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Parse one SSE `data` payload.
pub fn parse_notification(data: &str) -> Result<Notification, serde_json::Error> {
    serde_json::from_str(data)
}

async fn run(api: ApiClient, epoch: u64, tx: mpsc::Sender<AppEvent>) {
    let reason = match subscribe(&api, epoch, &tx).await {
        Ok(()) => "stream ended by server".to_string(),
        Err(e) => {
            tracing::warn!(epoch, error = %e, "Notification channel failed");
            e.to_string()
        }
    };
    let _ = tx
        .send(AppEvent::ChannelStatus {
            epoch,
            state: ChannelState::closed(reason),
        })
        .await;
}

/// Forward notifications until the stream ends, errors, or the UI goes away.
async fn subscribe(
    api: &ApiClient,
    epoch: u64,
    tx: &mpsc::Sender<AppEvent>,
) -> Result<(), ApiError> {
    let response = api.open_notifications().await?;
    if tx
        .send(AppEvent::ChannelStatus {
            epoch,
            state: ChannelState::Live,
        })
        .await
        .is_err()
    {
        return Ok(());
    }
    tracing::info!(epoch, "Notification channel live");

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for event in decoder.push(&chunk)? {
            if !event.is_message() {
                tracing::debug!(event = ?event.event, "Ignoring named SSE event");
                continue;
            }
            let notification = match parse_notification(&event.data) {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(error = %e, data = %event.data, "Malformed notification payload");
                    continue;
                }
            };
            if !notification.is_new_article() {
                tracing::debug!(event = %notification.event, "Ignoring notification");
                continue;
            }
            tracing::info!(
                article_id = notification.article.id,
                title = %notification.article.title,
                "New article notification"
            );
            if tx
                .send(AppEvent::Notification(ReceivedNotification::now(notification)))
                .await
                .is_err()
            {
                tracing::debug!("UI receiver dropped; stopping notification channel");
                return Ok(());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sse(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/event-stream")
            .set_body_string(body.to_string())
    }

    async fn next_event(rx: &mut mpsc::Receiver<AppEvent>) -> AppEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("channel closed")
    }

    #[test]
    fn test_parse_notification() {
        let n = parse_notification(
            r#"{"event":"new_article","message":"새 기사","article":{"title":"T","id":42,"content":"c","tag":"AI","url":"https://x.test/1"}}"#,
        )
        .unwrap();
        assert!(n.is_new_article());
        assert_eq!(n.article.id, 42);
        assert!(parse_notification("not json").is_err());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ChannelState::Live.to_string(), "live");
        assert_eq!(ChannelState::closed("boom").to_string(), "closed: boom");
    }

    #[tokio::test]
    async fn test_forwards_new_article_and_skips_others() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"event\":\"heartbeat\",\"message\":\"\"}\n\n",
            "data: not-json\n\n",
            "event: ping\ndata: {\"event\":\"new_article\"}\n\n",
            "data: {\"event\":\"new_article\",\"message\":\"new\",\"article\":{\"id\":7,\"title\":\"Seven\"}}\n\n",
        );
        Mock::given(method("GET"))
            .and(path("/news-notifications"))
            .respond_with(sse(body))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let (tx, mut rx) = mpsc::channel(16);
        let _channel = NotificationChannel::open(api, 1, tx);

        match next_event(&mut rx).await {
            AppEvent::ChannelStatus { epoch, state } => {
                assert_eq!(epoch, 1);
                assert_eq!(state, ChannelState::Live);
            }
            _ => panic!("expected Live status"),
        }
        match next_event(&mut rx).await {
            AppEvent::Notification(received) => {
                assert_eq!(received.notification.article.id, 7);
                assert_eq!(received.notification.article.title, "Seven");
            }
            _ => panic!("expected notification"),
        }
        match next_event(&mut rx).await {
            AppEvent::ChannelStatus { state, .. } => {
                assert_eq!(state, ChannelState::closed("stream ended by server"));
            }
            _ => panic!("expected Closed status"),
        }
    }

    #[tokio::test]
    async fn test_http_error_closes_channel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news-notifications"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let (tx, mut rx) = mpsc::channel(16);
        let _channel = NotificationChannel::open(api, 3, tx);

        match next_event(&mut rx).await {
            AppEvent::ChannelStatus { epoch, state } => {
                assert_eq!(epoch, 3);
                assert_eq!(state, ChannelState::closed("HTTP error! status: 503"));
            }
            _ => panic!("expected Closed status"),
        }
    }

    #[tokio::test]
    async fn test_oversized_event_closes_channel() {
        let server = MockServer::start().await;
        let body = format!("data: {}", "a".repeat(crate::api::MAX_EVENT_SIZE + 1));
        Mock::given(method("GET"))
            .and(path("/news-notifications"))
            .respond_with(sse(&body))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let (tx, mut rx) = mpsc::channel(16);
        let _channel = NotificationChannel::open(api, 2, tx);

        assert!(matches!(
            next_event(&mut rx).await,
            AppEvent::ChannelStatus { state: ChannelState::Live, .. }
        ));
        match next_event(&mut rx).await {
            AppEvent::ChannelStatus { epoch, state } => {
                assert_eq!(epoch, 2);
                let ChannelState::Closed { reason } = state else {
                    panic!("expected Closed status");
                };
                assert!(reason.contains("too large"), "reason: {}", reason);
            }
            _ => panic!("expected Closed status"),
        }
    }

    #[tokio::test]
    async fn test_byte_order_mark_does_not_hide_first_event() {
        let server = MockServer::start().await;
        let body = "\u{FEFF}data: {\"event\":\"new_article\",\"message\":\"m\",\"article\":{\"id\":1,\"title\":\"First\"}}\n\n";
        Mock::given(method("GET"))
            .and(path("/news-notifications"))
            .respond_with(sse(body))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let (tx, mut rx) = mpsc::channel(16);
        let _channel = NotificationChannel::open(api, 1, tx);

        next_event(&mut rx).await; // Live
        match next_event(&mut rx).await {
            AppEvent::Notification(received) => {
                assert_eq!(received.notification.article.title, "First");
            }
            _ => panic!("expected notification"),
        }
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news-notifications"))
            .respond_with(sse(": keep-alive\n\n").set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(60)).unwrap();
        let (tx, _rx) = mpsc::channel(16);
        let mut channel = NotificationChannel::open(api, 1, tx);
        assert!(channel.is_open());

        channel.close();
        assert!(!channel.is_open());
        channel.close();
        assert!(!channel.is_open());
    }
}
