//! Shared error taxonomy and JSON error body for the board platform services.
//!
//! Every service renders failures through [`ErrorResponse`] so that clients see
//! one shape regardless of which service or which validation path failed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Service-level error kinds.
///
/// Messages attached to [`ServiceError::DependencyUnavailable`] and
/// [`ServiceError::Internal`] are for logs only; [`ServiceError::to_response`]
/// replaces them with a generic text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Unauthenticated(_) => 401,
            ServiceError::Forbidden(_) => 403,
            ServiceError::DependencyUnavailable(_) => 503,
            ServiceError::MalformedInput(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Unauthenticated(_) => error_codes::TOKEN_INVALID,
            ServiceError::Forbidden(_) => error_codes::NOT_WORKSPACE_MEMBER,
            ServiceError::DependencyUnavailable(_) => error_codes::SERVICE_UNAVAILABLE,
            ServiceError::MalformedInput(_) => error_codes::INVALID_REQUEST,
            ServiceError::NotFound(_) => error_codes::RESOURCE_NOT_FOUND,
            ServiceError::Internal(_) => error_codes::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ServiceError::Unauthenticated(_) => error_types::AUTHENTICATION_ERROR,
            ServiceError::Forbidden(_) => error_types::AUTHORIZATION_ERROR,
            ServiceError::DependencyUnavailable(_) => error_types::SERVICE_UNAVAILABLE_ERROR,
            ServiceError::MalformedInput(_) => error_types::VALIDATION_ERROR,
            ServiceError::NotFound(_) => error_types::NOT_FOUND_ERROR,
            ServiceError::Internal(_) => error_types::SERVER_ERROR,
        }
    }

    /// Message that is safe to hand to an end caller.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Unauthenticated(msg)
            | ServiceError::Forbidden(msg)
            | ServiceError::MalformedInput(msg)
            | ServiceError::NotFound(msg) => msg.clone(),
            ServiceError::DependencyUnavailable(_) => {
                "Service temporarily unavailable".to_string()
            }
            ServiceError::Internal(_) => "Internal server error".to_string(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let status = self.status_code();
        ErrorResponse::new(
            status_title(status),
            &self.public_message(),
            status,
            self.error_type(),
            self.error_code(),
        )
    }
}

fn status_title(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        503 => "Service Unavailable",
        _ => "Internal Server Error",
    }
}

/// Unified API error body returned by every service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short HTTP status title
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// HTTP status code
    pub status: u16,

    /// Error category, one of [`error_types`]
    pub error_type: String,

    /// Stable machine code, one of [`error_codes`]
    pub code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Correlation id of the failed request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,

    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str, status: u16, error_type: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            status,
            error_type: error_type.to_string(),
            code: code.to_string(),
            details: None,
            trace_id: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_trace_id(mut self, trace_id: String) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}

pub mod error_codes {
    // Authentication
    pub const TOKEN_MISSING: &str = "TOKEN_MISSING";
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const INTERNAL_API_KEY_INVALID: &str = "INTERNAL_API_KEY_INVALID";

    // Authorization
    pub const NOT_WORKSPACE_MEMBER: &str = "NOT_WORKSPACE_MEMBER";

    // Input
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const WORKSPACE_ID_REQUIRED: &str = "WORKSPACE_ID_REQUIRED";

    // Resources
    pub const RESOURCE_NOT_FOUND: &str = "RESOURCE_NOT_FOUND";
    pub const BOARD_NOT_FOUND: &str = "BOARD_NOT_FOUND";

    // System
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
}

pub mod error_types {
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const AUTHENTICATION_ERROR: &str = "authentication_error";
    pub const AUTHORIZATION_ERROR: &str = "authorization_error";
    pub const NOT_FOUND_ERROR: &str = "not_found_error";
    pub const SERVER_ERROR: &str = "server_error";
    pub const SERVICE_UNAVAILABLE_ERROR: &str = "service_unavailable_error";
}
