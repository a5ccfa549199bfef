//! Authentication for event-stream endpoints
//!
//! Browsers cannot set headers on an `EventSource`, so the token may arrive
//! as `?token=`. The query parameter wins; the bearer header is only read
//! when it is absent.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error,
};
use futures::future::LocalBoxFuture;
use identity_client::TokenValidator;
use serde::Deserialize;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::ApiError;
use crate::jwt_auth::{authenticate, bearer_token, bind_identity};

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn stream_token(req: &ServiceRequest) -> Option<String> {
    let from_query = web::Query::<TokenQuery>::from_query(req.query_string())
        .ok()
        .and_then(|q| q.into_inner().token)
        .filter(|t| !t.is_empty());

    from_query.or_else(|| {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

pub struct SseAuthMiddleware {
    validator: Arc<dyn TokenValidator>,
}

impl SseAuthMiddleware {
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SseAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SseAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SseAuthMiddlewareService {
            service: Rc::new(service),
            validator: self.validator.clone(),
        }))
    }
}

pub struct SseAuthMiddlewareService<S> {
    service: Rc<S>,
    validator: Arc<dyn TokenValidator>,
}

impl<S, B> Service<ServiceRequest> for SseAuthMiddlewareService<S>
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
        let service = self.service.clone();
        let validator = self.validator.clone();

        Box::pin(async move {
            let token = stream_token(&req).ok_or_else(ApiError::missing_token)?;

            let user_id = authenticate(validator.as_ref(), &token).await?;
            bind_identity(&req, user_id, token);

            service.call(req).await
        })
    }
}
