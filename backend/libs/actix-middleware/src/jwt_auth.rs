use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use identity_client::TokenValidator;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;

/// Authenticated caller, bound under `user_id` for the rest of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// The caller's raw token, kept for delegated calls such as membership checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

/// `Authorization: <scheme> <token>` with exactly two space-separated parts
/// and a case-insensitive `bearer` scheme.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

/// Every validator failure becomes the same generic 401.
pub(crate) async fn authenticate(
    validator: &dyn TokenValidator,
    token: &str,
) -> Result<Uuid, ApiError> {
    validator.validate_token(token).await.map_err(|e| {
        tracing::warn!(error = %e, "JWT validation failed");
        ApiError::invalid_token()
    })
}

pub(crate) fn bind_identity(req: &ServiceRequest, user_id: Uuid, token: String) {
    let mut extensions = req.extensions_mut();
    extensions.insert(UserId(user_id));
    extensions.insert(BearerToken(token));
}

/// JWT Authentication Middleware
pub struct JwtAuthMiddleware {
    validator: Arc<dyn TokenValidator>,
}

impl JwtAuthMiddleware {
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            validator: self.validator.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    validator: Arc<dyn TokenValidator>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
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
            let token = {
                let header = req
                    .headers()
                    .get(AUTHORIZATION)
                    .filter(|h| !h.is_empty())
                    .ok_or_else(ApiError::missing_authorization)?;
                let header = header
                    .to_str()
                    .map_err(|_| ApiError::malformed_authorization())?;
                bearer_token(header)
                    .ok_or_else(ApiError::malformed_authorization)?
                    .to_string()
            };

            let user_id = authenticate(validator.as_ref(), &token).await?;
            bind_identity(&req, user_id, token);

            service.call(req).await
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(ApiError::not_authenticated().into())),
        }
    }
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<BearerToken>() {
            Some(token) => ready(Ok(token.clone())),
            None => ready(Err(ApiError::not_authenticated().into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, test, web, App, HttpResponse};
    use async_trait::async_trait;
    use identity_client::ValidationError;

    const GOOD_TOKEN: &str = "good-token";

    struct StubValidator(Uuid);

    #[async_trait]
    impl TokenValidator for StubValidator {
        async fn validate_token(&self, token: &str) -> Result<Uuid, ValidationError> {
            match token {
                GOOD_TOKEN => Ok(self.0),
                "expired" => Err(ValidationError::Expired),
                "no-subject" => Err(ValidationError::MalformedClaims),
                "authority-down" => Err(ValidationError::AuthorityUnreachable(
                    "connection refused".into(),
                )),
                _ => Err(ValidationError::InvalidSignature),
            }
        }
    }

    async fn whoami(user_id: UserId, token: BearerToken) -> HttpResponse {
        HttpResponse::Ok().body(format!("{} {}", user_id.0, token.0))
    }

    async fn rejection_body(err: Error) -> (u16, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status().as_u16();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn rejection_message(err: Error) -> (u16, String) {
        let (status, body) = rejection_body(err).await;
        (status, body["message"].as_str().unwrap().to_string())
    }

    macro_rules! app {
        ($user_id:expr) => {
            test::init_service(
                App::new()
                    .wrap(JwtAuthMiddleware::new(Arc::new(StubValidator($user_id))))
                    .route("/test", web::get().to(whoami)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer a b"), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }

    #[actix_web::test]
    async fn test_valid_token_binds_identity_and_token() {
        let user_id = Uuid::new_v4();
        let app = app!(user_id);

        let req = test::TestRequest::get()
            .uri("/test")
            .insert_header(("Authorization", format!("Bearer {}", GOOD_TOKEN)))
            .to_request();

        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, format!("{} {}", user_id, GOOD_TOKEN).as_bytes());
    }

    #[actix_web::test]
    async fn test_scheme_is_case_insensitive() {
        let app = app!(Uuid::new_v4());

        let req = test::TestRequest::get()
            .uri("/test")
            .insert_header(("Authorization", format!("bearer {}", GOOD_TOKEN)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_missing_authorization_header() {
        let app = app!(Uuid::new_v4());

        let req = test::TestRequest::get().uri("/test").to_request();

        let err = test::try_call_service(&app, req)
            .await
            .err()
            .expect("request without a header must be rejected");
        assert_eq!(
            rejection_message(err).await,
            (401, "No authorization header".to_string())
        );
    }

    #[actix_web::test]
    async fn test_malformed_authorization_header() {
        let app = app!(Uuid::new_v4());

        for header in ["Basic abc", "Bearer", "Bearer good-token extra"] {
            let req = test::TestRequest::get()
                .uri("/test")
                .insert_header(("Authorization", header))
                .to_request();

            let err = test::try_call_service(&app, req)
                .await
                .err()
                .expect("malformed header must be rejected");
            assert_eq!(
                rejection_message(err).await,
                (401, "Invalid authorization header format".to_string()),
                "header {:?}",
                header
            );
        }
    }

    #[actix_web::test]
    async fn test_invalid_token_is_generic() {
        let app = app!(Uuid::new_v4());

        let req = test::TestRequest::get()
            .uri("/test")
            .insert_header(("Authorization", "Bearer forged"))
            .to_request();

        let err = test::try_call_service(&app, req)
            .await
            .err()
            .expect("invalid token must be rejected");
        assert_eq!(rejection_message(err).await, (401, "Invalid token".to_string()));
    }

    #[actix_web::test]
    async fn test_every_validation_failure_looks_the_same() {
        let app = app!(Uuid::new_v4());
        let mut bodies = Vec::new();

        for token in ["forged", "expired", "no-subject", "authority-down"] {
            let req = test::TestRequest::get()
                .uri("/test")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request();

            let err = test::try_call_service(&app, req)
                .await
                .err()
                .expect("failed validation must be rejected");
            let (status, mut body) = rejection_body(err).await;

            assert_eq!(status, 401, "token {:?}", token);
            assert_eq!(body["message"], "Invalid token", "token {:?}", token);
            assert_eq!(body["code"], "TOKEN_INVALID", "token {:?}", token);
            body.as_object_mut().unwrap().remove("timestamp");
            bodies.push(body);
        }

        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(!bodies[0].to_string().contains("connection refused"));
    }

    #[actix_web::test]
    async fn test_extractor_without_middleware_is_unauthorized() {
        let app = test::init_service(App::new().route("/test", web::get().to(whoami))).await;

        let req = test::TestRequest::get().uri("/test").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
