//! OpenAPI Specification for the SoundPulse API
//!
//! Generated with utoipa from route annotations and response types.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::cache::{self, ClearCacheResponse};
use crate::routes::catalog;
use crate::routes::health::{self, HealthResponse, HealthStatus, ProviderStatus, ServiceIndex, ServiceStatus};
use crate::telemetry::metrics;

/// OpenAPI document for the SoundPulse API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SoundPulse API",
        version = "0.1.0",
        description = "Caching proxy in front of a music catalog: search, songs, artists, albums, playlists and discovery feeds",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local Development")
    ),
    tags(
        (name = "Search", description = "Catalog search and autocomplete"),
        (name = "Songs", description = "Songs, related tracks and lyrics"),
        (name = "Artists", description = "Artist records and discographies"),
        (name = "Albums", description = "Album details"),
        (name = "Playlists", description = "Playlists and watch queues"),
        (name = "Discovery", description = "Charts, home feed and moods"),
        (name = "Cache", description = "Response cache administration"),
        (name = "Health", description = "Liveness and service index"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        // === Catalog Routes ===
        catalog::search,
        catalog::search_suggestions,
        catalog::get_song,
        catalog::get_related,
        catalog::get_lyrics,
        catalog::get_artist,
        catalog::get_artist_albums,
        catalog::get_album,
        catalog::get_playlist,
        catalog::get_watch_playlist,
        catalog::get_charts,
        catalog::get_home,
        catalog::get_mood_categories,
        catalog::get_mood_playlists,

        // === Operations ===
        cache::clear_cache,
        health::index,
        health::health,
        metrics::metrics_handler,
    ),
    components(
        schemas(
            ApiError, ErrorCode,
            ClearCacheResponse,
            HealthResponse, HealthStatus, ServiceIndex, ServiceStatus, ProviderStatus,
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
