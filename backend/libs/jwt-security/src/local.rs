//! Local token verification with the shared HMAC secret
//!
//! This is the fallback trust source: no I/O, so no timeout. The signature is
//! always checked; `exp` and `nbf` are checked when present, with a small
//! clock-skew leeway. The identity is then pulled out of the claim map by
//! [`crate::claims::extract_identity`].

use std::collections::HashSet;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::claims::extract_identity;
use crate::error::ValidationError;

const DEFAULT_VALIDATION_LEEWAY: u64 = 30; // 30 seconds clock skew tolerance

/// Verifier bound to one shared secret. Cheap to clone.
#[derive(Clone)]
pub struct LocalVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl LocalVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // `exp` is enforced when present; tokens without one are accepted.
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // Audiences differ per issuing service; identity is all we need.
        validation.validate_aud = false;
        validation.leeway = DEFAULT_VALIDATION_LEEWAY;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify signature and expiry, then resolve the caller identity.
    pub fn verify(&self, token: &str) -> Result<Uuid, ValidationError> {
        let token_data = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Local JWT verification failed");
                ValidationError::from(e)
            })?;

        extract_identity(&token_data.claims).map_err(|e| {
            debug!(error = %e, "Verified token carries no usable identity");
            ValidationError::from(e)
        })
    }
}

impl std::fmt::Debug for LocalVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

/// One-shot form of [`LocalVerifier::verify`].
pub fn verify_locally(token: &str, secret: &str) -> Result<Uuid, ValidationError> {
    LocalVerifier::new(secret).verify(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{claims_for, mint_token};
    use jsonwebtoken::Algorithm;
    use serde_json::json;

    const SECRET: &str = "y9K$mP2vRx#TnZ@s4Yw!cGf7Dh&e3Xa6";

    #[test]
    fn test_valid_token_resolves_identity() {
        let user_id = Uuid::new_v4();
        let token = mint_token(&claims_for("sub", &user_id.to_string(), 3600), SECRET);

        assert_eq!(verify_locally(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_hs512_is_accepted() {
        let user_id = Uuid::new_v4();
        let token = crate::test_utils::mint_token_with(
            Algorithm::HS512,
            &claims_for("userId", &user_id.to_string(), 3600),
            SECRET,
        );

        assert_eq!(verify_locally(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let token = mint_token(&claims_for("sub", &Uuid::new_v4().to_string(), 3600), SECRET);

        assert_eq!(
            verify_locally(&token, "another-secret-entirely-0123456789"),
            Err(ValidationError::InvalidSignature)
        );
    }

    #[test]
    fn test_expired_token() {
        let token = mint_token(&claims_for("sub", &Uuid::new_v4().to_string(), -3600), SECRET);

        assert_eq!(verify_locally(&token, SECRET), Err(ValidationError::Expired));
    }

    #[test]
    fn test_expiry_within_leeway_is_accepted() {
        let user_id = Uuid::new_v4();
        let token = mint_token(&claims_for("sub", &user_id.to_string(), -5), SECRET);

        assert_eq!(verify_locally(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_missing_identity_claim_is_malformed() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = mint_token(&json!({ "email": "a@b.c", "exp": exp }), SECRET);

        assert_eq!(verify_locally(&token, SECRET), Err(ValidationError::MalformedClaims));
    }

    #[test]
    fn test_malformed_identity_claim_is_malformed() {
        let token = mint_token(&claims_for("sub", "user-123", 3600), SECRET);

        assert_eq!(verify_locally(&token, SECRET), Err(ValidationError::MalformedClaims));
    }

    #[test]
    fn test_token_without_exp_is_accepted() {
        let user_id = Uuid::new_v4();
        let token = mint_token(&json!({ "sub": user_id.to_string() }), SECRET);

        assert_eq!(verify_locally(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_token_without_exp_still_needs_the_right_secret() {
        let token = mint_token(&json!({ "sub": Uuid::new_v4().to_string() }), SECRET);

        assert_eq!(
            verify_locally(&token, "another-secret-entirely-0123456789"),
            Err(ValidationError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert_eq!(
            verify_locally("not.a.jwt", SECRET),
            Err(ValidationError::InvalidSignature)
        );
    }
}
