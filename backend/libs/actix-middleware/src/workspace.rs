//! Workspace scoping via the `x-workspace-id` header
//!
//! [`WorkspaceMiddleware`] binds a [`WorkspaceId`] only when the header is
//! present and parses. Routes that need one take [`RequireWorkspace`], which
//! answers 400 when nothing was bound.

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::ApiError;

pub const WORKSPACE_ID_HEADER: &str = "x-workspace-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceId(pub Uuid);

/// Extractor for workspace-scoped routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequireWorkspace(pub Uuid);

#[derive(Clone, Default)]
pub struct WorkspaceMiddleware;

impl<S, B> Transform<S, ServiceRequest> for WorkspaceMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = WorkspaceMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(WorkspaceMiddlewareService { service }))
    }
}

pub struct WorkspaceMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for WorkspaceMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let workspace_id = req
            .headers()
            .get(WORKSPACE_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok());

        if let Some(workspace_id) = workspace_id {
            req.extensions_mut().insert(WorkspaceId(workspace_id));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}

impl FromRequest for WorkspaceId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<WorkspaceId>() {
            Some(id) => ready(Ok(*id)),
            None => ready(Err(ApiError::workspace_required().into())),
        }
    }
}

impl FromRequest for RequireWorkspace {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<WorkspaceId>() {
            Some(WorkspaceId(id)) => ready(Ok(RequireWorkspace(*id))),
            None => ready(Err(ApiError::workspace_required().into())),
        }
    }
}
