//! Token validation as an ordered chain of verification strategies
//!
//! Strategies run in order and the first success wins. A failing strategy is
//! logged at debug level and never surfaced on its own: when every strategy
//! fails, the error of the last one (local verification in the standard
//! chain) is returned.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use jwt_security::{LocalVerifier, ValidationError};

use crate::authority::AuthorityClient;
use crate::config::AuthConfig;

/// The contract consumed by request-handling middleware.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate_token(&self, token: &str) -> Result<Uuid, ValidationError>;
}

/// One way of turning a token into an identity.
#[async_trait]
pub trait VerificationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn verify(&self, token: &str) -> Result<Uuid, ValidationError>;
}

#[async_trait]
impl VerificationStrategy for LocalVerifier {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn verify(&self, token: &str) -> Result<Uuid, ValidationError> {
        LocalVerifier::verify(self, token)
    }
}

pub struct ChainedTokenValidator {
    strategies: Vec<Arc<dyn VerificationStrategy>>,
}

impl ChainedTokenValidator {
    pub fn new(strategies: Vec<Arc<dyn VerificationStrategy>>) -> Self {
        Self { strategies }
    }

    /// Standard chain: authority first when configured, local verification last.
    pub fn from_config(config: &AuthConfig, http: reqwest::Client) -> Self {
        let mut strategies: Vec<Arc<dyn VerificationStrategy>> = Vec::with_capacity(2);

        if let Some(url) = &config.authority_url {
            strategies.push(Arc::new(AuthorityClient::new(
                http,
                url.clone(),
                config.authority_timeout,
            )));
        }
        strategies.push(Arc::new(LocalVerifier::new(&config.jwt_secret)));

        Self::new(strategies)
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

#[async_trait]
impl TokenValidator for ChainedTokenValidator {
    async fn validate_token(&self, token: &str) -> Result<Uuid, ValidationError> {
        let mut last_error = ValidationError::InvalidSignature;

        for strategy in &self.strategies {
            match strategy.verify(token).await {
                Ok(user_id) => return Ok(user_id),
                Err(e) => {
                    debug!(
                        strategy = strategy.name(),
                        error = %e,
                        "Token verification strategy failed, trying next"
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
