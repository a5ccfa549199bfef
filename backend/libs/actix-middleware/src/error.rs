//! HTTP rendering of middleware and gate failures
//!
//! Every rejection is an [`ErrorResponse`] JSON body. Authentication failures
//! carry one generic message no matter which validation path failed.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use error_types::{error_codes, ErrorResponse, ServiceError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ApiError {
    kind: ServiceError,
    code: &'static str,
}

impl ApiError {
    pub fn new(kind: ServiceError, code: &'static str) -> Self {
        Self { kind, code }
    }

    pub fn kind(&self) -> &ServiceError {
        &self.kind
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn missing_authorization() -> Self {
        Self::new(
            ServiceError::Unauthenticated("No authorization header".into()),
            error_codes::TOKEN_MISSING,
        )
    }

    pub fn malformed_authorization() -> Self {
        Self::new(
            ServiceError::Unauthenticated("Invalid authorization header format".into()),
            error_codes::TOKEN_INVALID,
        )
    }

    pub fn missing_token() -> Self {
        Self::new(
            ServiceError::Unauthenticated("No token provided".into()),
            error_codes::TOKEN_MISSING,
        )
    }

    pub fn invalid_token() -> Self {
        Self::new(
            ServiceError::Unauthenticated("Invalid token".into()),
            error_codes::TOKEN_INVALID,
        )
    }

    pub fn not_authenticated() -> Self {
        Self::new(
            ServiceError::Unauthenticated("User not authenticated".into()),
            error_codes::TOKEN_MISSING,
        )
    }

    pub fn invalid_internal_api_key() -> Self {
        Self::new(
            ServiceError::Unauthenticated("Invalid internal API key".into()),
            error_codes::INTERNAL_API_KEY_INVALID,
        )
    }

    pub fn workspace_required() -> Self {
        Self::new(
            ServiceError::MalformedInput("x-workspace-id header is required".into()),
            error_codes::WORKSPACE_ID_REQUIRED,
        )
    }

    pub fn not_workspace_member() -> Self {
        Self::new(
            ServiceError::Forbidden("Not a member of this workspace".into()),
            error_codes::NOT_WORKSPACE_MEMBER,
        )
    }
}

impl From<ServiceError> for ApiError {
    fn from(kind: ServiceError) -> Self {
        let code = kind.error_code();
        Self { kind, code }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let mut body: ErrorResponse = self.kind.to_response();
        body.code = self.code.to_string();
        HttpResponse::build(self.status_code()).json(body)
    }
}
