//! Logging middleware
//!
//! One line per request on completion, tagged with the correlation id and,
//! once authentication has run, the caller.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::Instant;

use crate::correlation_id::CorrelationId;
use crate::jwt_auth::UserId;

/// Middleware that logs HTTP requests and responses
#[derive(Clone, Default)]
pub struct Logging;

impl<S, B> Transform<S, ServiceRequest> for Logging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggingService { service }))
    }
}

pub struct LoggingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoggingService<S>
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
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        let correlation_id = req
            .extensions()
            .get::<CorrelationId>()
            .map(|id| id.0.clone())
            .unwrap_or_default();

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match &res {
                Ok(res) => {
                    let status = res.status().as_u16();
                    let user_id = res
                        .request()
                        .extensions()
                        .get::<UserId>()
                        .map(|u| u.0.to_string())
                        .unwrap_or_default();

                    if status >= 500 {
                        tracing::warn!(
                            method = %method,
                            path = %path,
                            status,
                            duration_ms,
                            correlation_id = %correlation_id,
                            user_id = %user_id,
                            "HTTP request failed"
                        );
                    } else {
                        tracing::info!(
                            method = %method,
                            path = %path,
                            status,
                            duration_ms,
                            correlation_id = %correlation_id,
                            user_id = %user_id,
                            "HTTP request completed"
                        );
                    }
                }
                Err(e) => {
                    tracing::info!(
                        method = %method,
                        path = %path,
                        status = e.as_response_error().status_code().as_u16(),
                        duration_ms,
                        correlation_id = %correlation_id,
                        "HTTP request rejected"
                    );
                }
            }

            res
        })
    }
}
