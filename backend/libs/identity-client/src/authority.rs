//! Remote authentication authority client
//!
//! One attempt per call, no retries. Falling back to local verification is the
//! validator's job, not this client's.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use jwt_security::ValidationError;
use resilience::{with_timeout_result, TimeoutError};

use crate::validator::VerificationStrategy;

const VALIDATE_PATH: &str = "/api/auth/validate";

#[derive(Debug, Error)]
pub enum AuthorityError {
    #[error("authority request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authority rejected token with status {0}")]
    Status(u16),

    #[error("authority response could not be decoded: {0}")]
    Decode(String),

    #[error("authority returned a malformed user id: {0}")]
    MalformedIdentity(String),

    #[error("authority did not answer within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateResponse {
    user_id: String,
}

/// Client for `POST {authority}/api/auth/validate`.
#[derive(Debug, Clone)]
pub struct AuthorityClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl AuthorityClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Ask the authority who owns `token`.
    ///
    /// The token travels both in the JSON body and as a bearer credential;
    /// authority revisions disagree on which one they read.
    pub async fn validate(&self, token: &str) -> Result<Uuid, AuthorityError> {
        with_timeout_result(self.timeout, self.call_validate(token))
            .await
            .map_err(|e| match e {
                TimeoutError::Elapsed(d) => AuthorityError::Timeout(d),
                TimeoutError::Inner(inner) => inner,
            })
    }

    async fn call_validate(&self, token: &str) -> Result<Uuid, AuthorityError> {
        let url = format!("{}{}", self.base_url, VALIDATE_PATH);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthorityError::Status(status.as_u16()));
        }

        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|e| AuthorityError::Decode(e.to_string()))?;

        Uuid::parse_str(&body.user_id).map_err(|_| AuthorityError::MalformedIdentity(body.user_id))
    }
}

#[async_trait]
impl VerificationStrategy for AuthorityClient {
    fn name(&self) -> &'static str {
        "authority"
    }

    async fn verify(&self, token: &str) -> Result<Uuid, ValidationError> {
        self.validate(token).await.map_err(|e| {
            debug!(error = %e, url = %self.base_url, "Authority validation failed");
            ValidationError::AuthorityUnreachable(e.to_string())
        })
    }
}
