//! Cache Administration
//!
//! `POST /api/clear-cache` drops every cached response.

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::{ApiCache, AppState};
use crate::telemetry::metrics;

/// Result of a cache flush
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClearCacheResponse {
    pub status: String,
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

/// POST /api/clear-cache - Flush the response cache
#[utoipa::path(
    post,
    path = "/api/clear-cache",
    tag = "Cache",
    responses(
        (status = 200, description = "Cache cleared", body = ClearCacheResponse),
    ),
)]
pub async fn clear_cache(State(cache): State<ApiCache>) -> impl IntoResponse {
    let removed = cache.clear();
    if let Some(m) = metrics() {
        m.set_cache_entries(cache.len());
    }
    tracing::info!(removed, "Response cache cleared");

    Json(ClearCacheResponse {
        status: "success".to_string(),
        message: "cache cleared".to_string(),
        removed,
    })
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/clear-cache", post(clear_cache))
        .with_state(state)
}
