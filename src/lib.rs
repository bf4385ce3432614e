//! Marketplace Backend - library for app logic and testing

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod logging;
pub mod repository;
pub mod routes;
pub mod usecase;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::repository::PgRepository;
use crate::routes::AppState;
use crate::usecase::Usecase;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// CORS from the configured origins, or the localhost defaults when none are set.
pub fn configure_cors(config: &AppConfig) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        origins = DEV_ORIGINS.into_iter().map(HeaderValue::from_static).collect();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

/// Create and configure the application router.
pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    let cors = configure_cors(config);
    tracing::info!("CORS configured");

    Router::new()
        .route("/", get(routes::health::api_up))
        .route(
            "/get/advertisement/all_info",
            get(routes::advertisement::get_advertisement_all_info),
        )
        .route(
            "/get/profile/all_info",
            get(routes::profile::get_profile_all_info),
        )
        .route(
            "/get/profile/statistics",
            get(routes::profile::get_profile_statistics),
        )
        .route(
            "/get/profile/my_advertisements",
            get(routes::profile::get_profile_my_advertisements),
        )
        .route(
            "/get/profile/reviews",
            get(routes::profile::get_profile_reviews),
        )
        .route("/user/create", post(routes::user::create_user))
        .route("/health", get(routes::health::health_ping))
        .route("/health/database", get(routes::health::health_database))
        .route("/health/ready", get(routes::health::health_ready))
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // 2 MB body cap
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();

    // Held until the server stops; dropping them loses buffered lines.
    let _log_guards = logging::init(&config);

    routes::health::init_start_time();

    tracing::info!(database = %config.db.redacted_url(), "connecting to database");
    let pool = db::init_pool(&config.db).await.map_err(|e| {
        tracing::error!(error = %e, "failed to initialize database pool");
        e
    })?;
    db::run_migrations(&pool).await.map_err(|e| {
        tracing::error!(error = %e, "failed to run database migrations");
        e
    })?;

    let usecase = Usecase::new(Arc::new(PgRepository::new(pool)));
    let app = create_app(AppState::new(usecase), &config);

    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
