//! Delivery to the internal notification service
//!
//! Only `200 OK` and `201 Created` count as delivered. A disabled sink accepts
//! and drops everything.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::NotificationConfig;
use crate::event::NotificationEvent;

/// Events accepted by one bulk call. Extra events are dropped, not paginated.
pub const MAX_BULK_NOTIFICATIONS: usize = 100;

const INTERNAL_API_KEY_HEADER: &str = "X-Internal-Api-Key";

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification service returned status {0}")]
    Status(u16),

    #[error("notification delivery timed out")]
    Timeout,
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, event: &NotificationEvent) -> Result<(), NotificationError>;

    async fn send_bulk(&self, events: &[NotificationEvent]) -> Result<(), NotificationError>;

    fn is_enabled(&self) -> bool;
}

#[derive(Serialize)]
struct BulkNotificationRequest<'a> {
    notifications: &'a [NotificationEvent],
}

/// Client for `POST {noti}/api/internal/notifications[/bulk]`.
#[derive(Clone)]
pub struct HttpNotificationClient {
    http: reqwest::Client,
    base_url: String,
    internal_api_key: String,
    enabled: bool,
    timeout: Duration,
}

impl HttpNotificationClient {
    pub fn new(http: reqwest::Client, config: &NotificationConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            internal_api_key: config.internal_api_key.clone(),
            enabled: config.enabled,
            timeout: config.timeout,
        }
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), NotificationError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .header(INTERNAL_API_KEY_HEADER, &self.internal_api_key)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotificationError::Timeout
                } else {
                    NotificationError::Transport(e)
                }
            })?;

        match response.status() {
            reqwest::StatusCode::OK | reqwest::StatusCode::CREATED => Ok(()),
            status => Err(NotificationError::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl NotificationSink for HttpNotificationClient {
    async fn send(&self, event: &NotificationEvent) -> Result<(), NotificationError> {
        if !self.is_enabled() {
            debug!(
                notification_type = %event.kind,
                target_user_id = %event.target_user_id,
                "Notification sending is disabled, skipping"
            );
            return Ok(());
        }

        self.post("/api/internal/notifications", event)
            .await
            .map_err(|e| {
                error!(notification_type = %event.kind, error = %e, "Failed to send notification");
                e
            })?;

        debug!(
            notification_type = %event.kind,
            target_user_id = %event.target_user_id,
            "Notification sent"
        );
        Ok(())
    }

    async fn send_bulk(&self, events: &[NotificationEvent]) -> Result<(), NotificationError> {
        if !self.is_enabled() {
            debug!(count = events.len(), "Notification sending is disabled, skipping bulk");
            return Ok(());
        }
        if events.is_empty() {
            return Ok(());
        }

        let batch = &events[..events.len().min(MAX_BULK_NOTIFICATIONS)];
        if batch.len() < events.len() {
            debug!(
                produced = events.len(),
                sent = batch.len(),
                "Bulk notification batch truncated"
            );
        }

        self.post(
            "/api/internal/notifications/bulk",
            &BulkNotificationRequest { notifications: batch },
        )
        .await
        .map_err(|e| {
            error!(count = batch.len(), error = %e, "Failed to send bulk notifications");
            e
        })?;

        debug!(count = batch.len(), "Bulk notifications sent");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled && !self.internal_api_key.is_empty()
    }
}

/// Sink for deployments without a notification service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationSink;

#[async_trait]
impl NotificationSink for NoopNotificationSink {
    async fn send(&self, _event: &NotificationEvent) -> Result<(), NotificationError> {
        Ok(())
    }

    async fn send_bulk(&self, _events: &[NotificationEvent]) -> Result<(), NotificationError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::BoardContext;
    use std::time::Duration;
    use uuid::Uuid;

    fn event() -> NotificationEvent {
        NotificationEvent::board_assigned(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &BoardContext::new(Uuid::new_v4(), Uuid::new_v4(), "Board", "Project"),
        )
    }

    fn client(enabled: bool, key: &str) -> HttpNotificationClient {
        HttpNotificationClient::new(
            reqwest::Client::new(),
            &NotificationConfig::new(
                "http://127.0.0.1:9".into(),
                key.into(),
                enabled,
                Duration::from_secs(1),
            ),
        )
    }

    #[test]
    fn test_enabled_requires_flag_and_key() {
        assert!(client(true, "key").is_enabled());
        assert!(!client(true, "").is_enabled());
        assert!(!client(false, "key").is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_client_never_calls_out() {
        // Port 9 would fail the request if one were made
        assert!(client(false, "key").send_bulk(&[event()]).await.is_ok());
        assert!(client(true, "").send(&event()).await.is_ok());
    }

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoopNotificationSink;
        assert!(!sink.is_enabled());
        assert!(sink.send_bulk(&[]).await.is_ok());
    }
}
