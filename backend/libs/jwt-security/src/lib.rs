//! JWT verification shared by every board platform service
//!
//! **Scope**:
//! - Identity extraction from heterogeneous claim sets (`sub`, `userId`, `user_id`)
//! - Local HMAC verification with the shared secret (fallback trust source)
//! - Shared secret strength diagnostics at startup
//!
//! Token issuance lives in the authentication authority, not here. The
//! `test-utils` feature exposes a signer for tests only.

pub mod claims;
pub mod error;
pub mod local;
pub mod secret_validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use claims::{extract_identity, ClaimsError, IDENTITY_CLAIM_KEYS};
pub use error::ValidationError;
pub use local::{verify_locally, LocalVerifier};
pub use secret_validation::{check_shared_secret, validate_secret_strength, SecretError, SecretStrength};
