//! Immutable identity configuration, fixed at startup
//!
//! Built once and injected into each component at construction; nothing
//! mutates it afterwards.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use jwt_security::check_shared_secret;

#[derive(Clone)]
pub struct AuthConfig {
    /// Base URL of the authentication authority. `None` disables the remote strategy.
    pub authority_url: Option<String>,
    /// Shared HMAC secret for local verification
    pub jwt_secret: String,
    /// Bound on the remote validation call
    pub authority_timeout: Duration,
}

impl AuthConfig {
    /// Load from environment variables
    ///
    /// - `JWT_SECRET` (required)
    /// - `AUTH_SERVICE_URL` (optional, empty means local-only)
    /// - `AUTH_SERVICE_TIMEOUT_SECS` (default 5)
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET environment variable not set")?;

        let authority_timeout = env::var("AUTH_SERVICE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| resilience::authority_config().timeout.duration);

        Self::new(env::var("AUTH_SERVICE_URL").ok(), jwt_secret, authority_timeout)
    }

    pub fn new(
        authority_url: Option<String>,
        jwt_secret: String,
        authority_timeout: Duration,
    ) -> Result<Self> {
        check_shared_secret(&jwt_secret).context("Invalid JWT shared secret")?;

        let authority_url = authority_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            authority_url,
            jwt_secret,
            authority_timeout,
        })
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("authority_url", &self.authority_url)
            .field("jwt_secret", &"<redacted>")
            .field("authority_timeout", &self.authority_timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct MembershipConfig {
    /// Base URL of the user service that owns workspace membership
    pub base_url: String,
    pub timeout: Duration,
}

impl MembershipConfig {
    /// - `USER_SERVICE_URL` (required)
    /// - `USER_SERVICE_TIMEOUT_SECS` (default 5)
    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("USER_SERVICE_URL").context("USER_SERVICE_URL environment variable not set")?;
        let timeout = env::var("USER_SERVICE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| resilience::membership_config().timeout.duration);

        Ok(Self::new(base_url, timeout))
    }

    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}
