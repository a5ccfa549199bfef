/// Preset timeouts for the dependencies the board platform talks to
use crate::timeout::TimeoutConfig;
use std::time::Duration;

/// Configuration bundle for a dependency
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub timeout: TimeoutConfig,
}

impl ServiceConfig {
    pub fn with_timeout(duration: Duration) -> Self {
        Self {
            timeout: TimeoutConfig { duration },
        }
    }
}

/// Central authentication authority
///
/// - Timeout: 5s (sits on the request path, local verification is the fallback)
pub fn authority_config() -> ServiceConfig {
    ServiceConfig::with_timeout(Duration::from_secs(5))
}

/// Workspace membership service
///
/// - Timeout: 5s (sits on the request path, a timeout is a denial)
pub fn membership_config() -> ServiceConfig {
    ServiceConfig::with_timeout(Duration::from_secs(5))
}

/// Notification sink
///
/// - Timeout: 10s (detached from the request, only bounds the background task)
pub fn notification_config() -> ServiceConfig {
    ServiceConfig::with_timeout(Duration::from_secs(10))
}
