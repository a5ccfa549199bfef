//! Test utilities for signing tokens the way the authority does
//!
//! Only compiled for tests or with the `test-utils` feature.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

/// Claim set with the identity under `key` and an `exp` relative to now.
pub fn claims_for(key: &str, user_id: &str, expires_in_secs: i64) -> Value {
    let now = Utc::now().timestamp();
    let mut claims = json!({
        "iat": now,
        "exp": now + expires_in_secs,
        "email": "test@example.com",
    });
    claims[key] = Value::String(user_id.to_string());
    claims
}

/// Sign `claims` with HS256.
pub fn mint_token(claims: &Value, secret: &str) -> String {
    mint_token_with(Algorithm::HS256, claims, secret)
}

pub fn mint_token_with(algorithm: Algorithm, claims: &Value, secret: &str) -> String {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("test claims always encode")
}
