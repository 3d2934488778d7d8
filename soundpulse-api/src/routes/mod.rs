//! REST API Routes Module
//!
//! Includes:
//! - Catalog routes under `/api` (search, songs, artists, albums, playlists, discovery)
//! - Cache flush (`POST /api/clear-cache`)
//! - Service index and health check
//! - Prometheus metrics and the OpenAPI document
//! - CORS support for browser-based clients

pub mod cache;
pub mod catalog;
pub mod health;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, Uri},
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// JSON 404 for every unknown path.
async fn fallback(uri: Uri) -> ApiError {
    ApiError::endpoint_not_found(uri.path())
}

/// Build CORS layer based on configuration.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.is_restricted() {
        tracing::info!("CORS: allowing origins {:?}", config.cors_origins);
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    } else {
        tracing::info!("CORS: allowing all origins");
        cors.allow_origin(Any)
    }
}

/// Create the complete API router.
///
/// Layers, outermost first: CORS, compression (when enabled),
/// observability.
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let api_routes = catalog::create_router(state.clone()).merge(cache::create_router(state.clone()));

    let router = Router::new()
        .nest("/api", api_routes)
        .merge(health::create_router(state))
        .route("/metrics", get(metrics_handler))
        .route("/openapi.json", get(openapi_json))
        .fallback(fallback)
        .layer(from_fn(observability_middleware));

    let router = if config.compression_enabled {
        router.layer(CompressionLayer::new())
    } else {
        router
    };

    router.layer(build_cors_layer(config))
}
