//! Health Check and Service Index
//!
//! - `/` - service index listing every catalog endpoint
//! - `/health` - liveness, always 200
//!
//! Neither endpoint touches the catalog provider.

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::constants::SERVICE_DISPLAY_NAME;
use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Online,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Initialized,
    Error,
}

/// Service index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceIndex {
    pub service: String,
    /// `degraded` when the catalog provider failed to initialize
    pub status: ServiceStatus,
    pub version: String,
    pub provider: ProviderStatus,
    pub uptime_seconds: u64,
    pub endpoints: BTreeMap<String, String>,
}

/// Endpoint name and path template shown on the index.
const ENDPOINTS: &[(&str, &str)] = &[
    ("health", "/health"),
    ("search", "/api/search?q=query&filter=songs&limit=20"),
    ("search_suggestions", "/api/search/suggestions?q=query"),
    ("song", "/api/song/{video_id}"),
    ("related", "/api/song/{video_id}/related"),
    ("lyrics", "/api/lyrics/{browse_id}"),
    ("artist", "/api/artist/{channel_id}"),
    ("artist_albums", "/api/artist/{channel_id}/albums"),
    ("album", "/api/album/{browse_id}"),
    ("playlist", "/api/playlist/{playlist_id}?limit=100"),
    ("watch_playlist", "/api/watch/{video_id}"),
    ("charts", "/api/charts?country=ZZ"),
    ("home", "/api/home"),
    ("mood_categories", "/api/moods"),
    ("mood_playlists", "/api/moods/{params}"),
    ("clear_cache", "POST /api/clear-cache"),
    ("metrics", "/metrics"),
    ("openapi", "/openapi.json"),
];

// ============================================================================
// HANDLERS
// ============================================================================

/// GET / - Service index
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service index", body = ServiceIndex),
    ),
)]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.provider_ready();
    let response = ServiceIndex {
        service: SERVICE_DISPLAY_NAME.to_string(),
        status: if ready {
            ServiceStatus::Online
        } else {
            ServiceStatus::Degraded
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: if ready {
            ProviderStatus::Initialized
        } else {
            ProviderStatus::Error
        },
        uptime_seconds: state.start_time.elapsed().as_secs(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(name, path)| (name.to_string(), path.to_string()))
            .collect(),
    };
    (StatusCode::OK, Json(response))
}

/// GET /health - Process liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
)]
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .with_state(state)
}
