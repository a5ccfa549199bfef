use thiserror::Error;

use crate::claims::ClaimsError;

/// Why a token could not be resolved to an identity.
///
/// Callers on the request path must collapse every variant into one generic
/// "unauthenticated" answer; the variants exist for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token claims are malformed")]
    MalformedClaims,

    #[error("authority unreachable: {0}")]
    AuthorityUnreachable(String),
}

impl From<ClaimsError> for ValidationError {
    fn from(_: ClaimsError) -> Self {
        ValidationError::MalformedClaims
    }
}

impl From<jsonwebtoken::errors::Error> for ValidationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => ValidationError::Expired,
            ErrorKind::MissingRequiredClaim(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                ValidationError::MalformedClaims
            }
            _ => ValidationError::InvalidSignature,
        }
    }
}
