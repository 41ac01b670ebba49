//! Route configuration and setup

use crate::constants::{API_PREFIX, ASSETS_ROUTE, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::middleware::error_details_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use reelvault_core::{Config, StorageBackend};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let thumbnail_limit = config.max_thumbnail_size_bytes() + MULTIPART_OVERHEAD_BYTES;
    let video_limit = config.max_video_size_bytes() + MULTIPART_OVERHEAD_BYTES;

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/thumbnail_upload/{video_id}",
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer::<_, Infallible>(DefaultBodyLimit::max(thumbnail_limit)),
        )
        .route(
            "/video_upload/{video_id}",
            // Oversized bodies are refused before multipart parsing starts
            post(handlers::video_upload::upload_video)
                .layer::<_, Infallible>(DefaultBodyLimit::max(video_limit))
                .layer::<_, Infallible>(RequestBodyLimitLayer::new(video_limit)),
        )
        .route("/videos/{video_id}", get(handlers::video_get::get_video));

    let mut app = Router::new().nest(API_PREFIX, api_routes);

    if config.storage_backend() == StorageBackend::Local {
        tracing::info!(
            path = %config.local_storage_path(),
            route = ASSETS_ROUTE,
            "Serving local assets"
        );
        app = app.nest_service(ASSETS_ROUTE, ServeDir::new(config.local_storage_path()));
    }

    let app = app
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            error_details_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
