//! Service-to-service authentication with a shared internal key
//!
//! Header lookup is case-insensitive, so `x-internal-api-key` and
//! `X-Internal-Api-Key` are the same header. An empty configured key rejects
//! every request.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::error::ApiError;

pub const INTERNAL_API_KEY_HEADER: &str = "x-internal-api-key";

/// Compares every byte regardless of where the first mismatch is.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[derive(Clone)]
pub struct InternalApiKeyMiddleware {
    api_key: Rc<str>,
}

impl InternalApiKeyMiddleware {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Rc::from(api_key.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for InternalApiKeyMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = InternalApiKeyMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(InternalApiKeyMiddlewareService {
            service,
            api_key: self.api_key.clone(),
        }))
    }
}

pub struct InternalApiKeyMiddlewareService<S> {
    service: S,
    api_key: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for InternalApiKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authorized = !self.api_key.is_empty()
            && req
                .headers()
                .get(INTERNAL_API_KEY_HEADER)
                .map(|provided| keys_match(provided.as_bytes(), self.api_key.as_bytes()))
                .unwrap_or(false);

        if !authorized {
            tracing::warn!(path = %req.path(), "Rejected internal request with invalid API key");
            return Box::pin(async move { Err(ApiError::invalid_internal_api_key().into()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}
