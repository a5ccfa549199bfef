use actix_middleware::{CorrelationIdMiddleware, JwtAuthMiddleware, Logging, WorkspaceMiddleware};
use actix_web::{web, App, HttpServer};
use board_service::{
    handlers::{health, register_routes},
    repository::InMemoryBoardRepository,
    BoardService, Config,
};
use identity_client::{ChainedTokenValidator, HttpMembershipClient, TokenValidator};
use notification_dispatch::{
    HttpNotificationClient, NoopNotificationSink, NotificationDispatcher, NotificationSink,
};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting board service");

    let config = Config::from_env().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;

    // One pooled client shared by every outbound dependency
    let http = identity_client::http::build_client().map_err(|e| {
        io::Error::new(io::ErrorKind::Other, format!("Failed to build HTTP client: {}", e))
    })?;

    let chain = ChainedTokenValidator::from_config(&config.auth, http.clone());
    tracing::info!(strategies = ?chain.strategy_names(), "Token validation configured");
    let validator: Arc<dyn TokenValidator> = Arc::new(chain);

    let membership = Arc::new(HttpMembershipClient::new(http.clone(), &config.membership));

    let sink: Arc<dyn NotificationSink> = if config.notifications.is_deliverable() {
        tracing::info!(url = %config.notifications.base_url, "Notification delivery enabled");
        Arc::new(HttpNotificationClient::new(http.clone(), &config.notifications))
    } else {
        tracing::info!("Notification delivery disabled");
        Arc::new(NoopNotificationSink)
    };
    let dispatcher = NotificationDispatcher::new(sink, config.notifications.timeout);

    let repository = Arc::new(InMemoryBoardRepository::new());
    let board_service = web::Data::new(BoardService::new(repository, membership, dispatcher));

    let addr = config.bind_address();
    tracing::info!("Starting HTTP server on {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(board_service.clone())
            .wrap(Logging)
            .wrap(CorrelationIdMiddleware)
            .configure(health::register_routes)
            .service(
                web::scope("/api")
                    .wrap(WorkspaceMiddleware)
                    .wrap(JwtAuthMiddleware::new(validator.clone()))
                    .configure(register_routes),
            )
    })
    .bind(&addr)?
    .run()
    .await
}
