//! Shared secret strength validation
//!
//! Runs once at startup. A weak secret is still accepted because every
//! service in the constellation must share the authority's value, but it is
//! logged loudly. An empty secret disables local verification entirely and is
//! rejected.

use thiserror::Error;
use tracing::warn;

const MIN_SECRET_LENGTH: usize = 32; // 256 bits minimum
const RECOMMENDED_SECRET_LENGTH: usize = 64; // 512 bits recommended

/// Secret strength classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    Weak,
    Acceptable,
    Strong,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error("JWT shared secret is empty")]
    Empty,
}

/// Classify an HMAC secret.
///
/// **Criteria**:
/// - Minimum 32 bytes (256 bits), recommended 64
/// - Shannon entropy > 4.0 bits/byte
/// - No runs of 4 identical or sequential bytes
pub fn validate_secret_strength(secret: &str) -> SecretStrength {
    let bytes = secret.as_bytes();

    if bytes.len() < MIN_SECRET_LENGTH {
        return SecretStrength::Weak;
    }

    let entropy = shannon_entropy(bytes);
    if entropy < 4.0 || has_obvious_patterns(bytes) {
        return SecretStrength::Weak;
    }

    if bytes.len() >= RECOMMENDED_SECRET_LENGTH && entropy >= 5.0 {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

/// Startup check for the shared secret used by local verification.
pub fn check_shared_secret(secret: &str) -> Result<SecretStrength, SecretError> {
    if secret.is_empty() {
        return Err(SecretError::Empty);
    }

    let strength = validate_secret_strength(secret);
    if strength == SecretStrength::Weak {
        warn!(
            secret_len = secret.len(),
            "JWT shared secret is weak; local verification offers little protection"
        );
    }
    Ok(strength)
}

/// Bits per byte (0-8 scale)
fn shannon_entropy(data: &[u8]) -> f64 {
    let mut freq = [0u32; 256];
    for &byte in data {
        freq[byte as usize] += 1;
    }

    let len = data.len() as f64;
    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

fn has_obvious_patterns(data: &[u8]) -> bool {
    longest_run(data, |a, b| a == b) >= 4
        || longest_run(data, |a, b| b as i16 - a as i16 == 1) >= 4
}

fn longest_run(data: &[u8], step: impl Fn(u8, u8) -> bool) -> usize {
    let mut longest = usize::from(!data.is_empty());
    let mut current = longest;
    for window in data.windows(2) {
        if step(window[0], window[1]) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}
