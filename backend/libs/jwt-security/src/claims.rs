//! Identity extraction from decoded claim sets
//!
//! Tokens in circulation were issued by several generations of the
//! authority, each naming the subject differently. The lookup walks
//! [`IDENTITY_CLAIM_KEYS`] in order over a plain JSON map and takes the first
//! non-empty string value.

use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Claim keys that may carry the caller identity, highest priority first.
pub const IDENTITY_CLAIM_KEYS: [&str; 3] = ["sub", "userId", "user_id"];

/// Diagnostic detail for a claim set without a usable identity.
///
/// Only logged. Callers see [`crate::ValidationError::MalformedClaims`] for both.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("no identity claim present (checked sub, userId, user_id)")]
    MissingSubject,

    #[error("identity claim `{key}` is not a valid identifier")]
    MalformedSubject { key: &'static str },
}

/// Resolve the caller identity from a decoded claim map.
pub fn extract_identity(claims: &Map<String, Value>) -> Result<Uuid, ClaimsError> {
    let (key, raw) = IDENTITY_CLAIM_KEYS
        .iter()
        .find_map(|key| {
            claims
                .get(*key)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
                .map(|value| (*key, value))
        })
        .ok_or(ClaimsError::MissingSubject)?;

    Uuid::parse_str(raw).map_err(|_| ClaimsError::MalformedSubject { key })
}
