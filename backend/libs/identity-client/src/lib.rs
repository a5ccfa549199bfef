//! # Identity Client
//!
//! Caller identity and workspace authorization for board platform services.
//!
//! ## Modules
//! - `validator`: token validation as an ordered chain of verification strategies
//! - `authority`: remote authentication authority (primary trust source)
//! - `membership`: remote workspace membership checks (fail-closed)
//! - `config`: immutable startup configuration
//! - `http`: the shared pooled HTTP client
//!
//! ## Example
//! ```rust,no_run
//! use identity_client::{AuthConfig, ChainedTokenValidator, TokenValidator};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = AuthConfig::from_env()?;
//! let http = identity_client::http::build_client()?;
//! let validator = ChainedTokenValidator::from_config(&config, http);
//!
//! let user_id = validator.validate_token("eyJhbGciOi...").await?;
//! # Ok(())
//! # }
//! ```

pub mod authority;
pub mod config;
pub mod http;
pub mod membership;
pub mod validator;

pub use authority::{AuthorityClient, AuthorityError};
pub use config::{AuthConfig, MembershipConfig};
pub use jwt_security::ValidationError;
pub use membership::{HttpMembershipClient, MembershipAuthorizer, MembershipDecision, MembershipError};
pub use validator::{ChainedTokenValidator, TokenValidator, VerificationStrategy};
