use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Notification service settings, fixed at startup.
#[derive(Clone)]
pub struct NotificationConfig {
    pub base_url: String,
    /// Sent as `X-Internal-Api-Key`. Empty disables delivery.
    pub internal_api_key: String,
    pub enabled: bool,
    /// Hard deadline for one delivery, detached from any request.
    pub timeout: Duration,
}

impl NotificationConfig {
    /// Load from environment variables
    ///
    /// - `NOTI_SERVICE_URL` (required when `NOTI_ENABLED` is true)
    /// - `INTERNAL_API_KEY` (empty disables delivery)
    /// - `NOTI_ENABLED` (default false)
    /// - `NOTI_SERVICE_TIMEOUT_SECS` (default 10)
    pub fn from_env() -> Result<Self> {
        let enabled = env::var("NOTI_ENABLED")
            .ok()
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let base_url = match env::var("NOTI_SERVICE_URL") {
            Ok(url) => url,
            Err(_) if !enabled => String::new(),
            Err(e) => return Err(e).context("NOTI_SERVICE_URL must be set when NOTI_ENABLED=true"),
        };

        let timeout = env::var("NOTI_SERVICE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| resilience::notification_config().timeout.duration);

        Ok(Self::new(
            base_url,
            env::var("INTERNAL_API_KEY").unwrap_or_default(),
            enabled,
            timeout,
        ))
    }

    pub fn new(base_url: String, internal_api_key: String, enabled: bool, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            internal_api_key,
            enabled,
            timeout,
        }
    }

    pub fn disabled() -> Self {
        Self::new(
            String::new(),
            String::new(),
            false,
            resilience::notification_config().timeout.duration,
        )
    }

    /// Delivery needs both the flag and a key.
    pub fn is_deliverable(&self) -> bool {
        self.enabled && !self.internal_api_key.is_empty()
    }
}

impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("base_url", &self.base_url)
            .field("internal_api_key", &"<redacted>")
            .field("enabled", &self.enabled)
            .field("timeout", &self.timeout)
            .finish()
    }
}
