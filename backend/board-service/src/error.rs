use actix_middleware::ApiError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use error_types::{error_codes, ErrorResponse, ServiceError};
use thiserror::Error;

use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Access(#[from] ApiError),

    #[error("Board not found")]
    BoardNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AppError {
    fn service_error(&self) -> (ServiceError, &'static str) {
        match self {
            AppError::Access(err) => (err.kind().clone(), err.code()),
            AppError::BoardNotFound => (
                ServiceError::NotFound("Board not found".into()),
                error_codes::BOARD_NOT_FOUND,
            ),
            AppError::Validation(msg) => (
                ServiceError::MalformedInput(msg.clone()),
                error_codes::INVALID_REQUEST,
            ),
            AppError::Repository(RepositoryError::BoardNotFound(_)) => (
                ServiceError::NotFound("Board not found".into()),
                error_codes::BOARD_NOT_FOUND,
            ),
            AppError::Repository(e) => (
                ServiceError::Internal(e.to_string()),
                error_codes::INTERNAL_SERVER_ERROR,
            ),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        let (kind, _) = self.service_error();
        StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let (kind, code) = self.service_error();
        if let ServiceError::Internal(detail) = &kind {
            tracing::error!(error = %detail, "Request failed with internal error");
        }

        let mut body: ErrorResponse = kind.to_response();
        body.code = code.to_string();
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::BoardNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ApiError::not_workspace_member()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(RepositoryError::Storage("disk".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
