//! # Actix Middleware Library
//!
//! Request-scoped identity and authorization for board platform services
//!
//! ## Modules
//! - `jwt_auth`: bearer token authentication, binds `UserId` and `BearerToken`
//! - `sse_auth`: authentication for event streams (`?token=` first, then header)
//! - `internal_api_key`: service-to-service key check
//! - `workspace`: `x-workspace-id` extraction and the `RequireWorkspace` extractor
//! - `membership`: fail-closed workspace membership gate
//! - `correlation_id`: request correlation ids
//! - `logging`: request/response logging
//! - `error`: JSON error rendering shared by every middleware

pub mod correlation_id;
pub mod error;
pub mod internal_api_key;
pub mod jwt_auth;
pub mod logging;
pub mod membership;
pub mod sse_auth;
pub mod workspace;

pub use correlation_id::{get_correlation_id, CorrelationId, CorrelationIdMiddleware};
pub use error::ApiError;
pub use internal_api_key::InternalApiKeyMiddleware;
pub use jwt_auth::{BearerToken, JwtAuthMiddleware, UserId};
pub use logging::Logging;
pub use membership::require_workspace_member;
pub use sse_auth::SseAuthMiddleware;
pub use workspace::{RequireWorkspace, WorkspaceId, WorkspaceMiddleware};
