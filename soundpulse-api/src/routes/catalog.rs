//! Catalog REST Routes
//!
//! Thin handlers: each one turns path and query input into a
//! [`CatalogQuery`] and hands it to the dispatcher. Query values are taken
//! as raw strings so that malformed numbers surface as `INVALID_INPUT`
//! instead of an extractor rejection.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::dispatch::{CatalogQuery, DispatchOutcome, Dispatcher};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Header reporting whether the body came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

// ============================================================================
// RESPONSE
// ============================================================================

/// Dispatched payload rendered as JSON.
#[derive(Debug)]
pub struct CatalogResponse(pub DispatchOutcome);

impl IntoResponse for CatalogResponse {
    fn into_response(self) -> Response {
        let DispatchOutcome { payload, source } = self.0;
        let mut response = Json(&*payload).into_response();
        response.headers_mut().insert(
            HeaderName::from_static(CACHE_STATUS_HEADER),
            HeaderValue::from_static(source.as_str()),
        );
        response
    }
}

async fn run(dispatcher: &Dispatcher, query: CatalogQuery) -> ApiResult<CatalogResponse> {
    dispatcher.dispatch(query).await.map(CatalogResponse)
}

// ============================================================================
// QUERY PARAMETERS
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub filter: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionParams {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistAlbumsParams {
    pub params: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WatchParams {
    pub limit: Option<String>,
    pub playlist_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartsParams {
    pub country: Option<String>,
}

// ============================================================================
// SEARCH
// ============================================================================

/// GET /api/search - Search the catalog
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "Search",
    params(
        ("q" = String, Query, description = "Search text"),
        ("filter" = Option<String>, Query, description = "Result type filter (default: songs)"),
        ("limit" = Option<u32>, Query, description = "Maximum number of results (default: 20)"),
    ),
    responses(
        (status = 200, description = "Search results: {query, filter, count, results}", body = serde_json::Value),
        (status = 400, description = "Missing q or invalid limit", body = ApiError),
        (status = 503, description = "Catalog provider not initialized", body = ApiError),
    ),
)]
pub async fn search(
    State(dispatcher): State<Arc<Dispatcher>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<CatalogResponse> {
    run(
        &dispatcher,
        CatalogQuery::Search {
            q: params.q,
            filter: params.filter,
            limit: params.limit,
        },
    )
    .await
}

/// GET /api/search/suggestions - Autocomplete suggestions
#[utoipa::path(
    get,
    path = "/api/search/suggestions",
    tag = "Search",
    params(
        ("q" = String, Query, description = "Partial search text"),
    ),
    responses(
        (status = 200, description = "Suggestions: {query, suggestions}", body = serde_json::Value),
        (status = 400, description = "Missing q", body = ApiError),
    ),
)]
pub async fn search_suggestions(
    State(dispatcher): State<Arc<Dispatcher>>,
    Query(params): Query<SuggestionParams>,
) -> ApiResult<CatalogResponse> {
    run(&dispatcher, CatalogQuery::SearchSuggestions { q: params.q }).await
}

// ============================================================================
// SONGS AND LYRICS
// ============================================================================

/// GET /api/song/{id} - Song details
#[utoipa::path(
    get,
    path = "/api/song/{id}",
    tag = "Songs",
    params(
        ("id" = String, Path, description = "Video id"),
    ),
    responses(
        (status = 200, description = "Song record", body = serde_json::Value),
        (status = 404, description = "Song not found", body = ApiError),
        (status = 504, description = "Provider timed out", body = ApiError),
    ),
)]
pub async fn get_song(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(id): Path<String>,
) -> ApiResult<CatalogResponse> {
    run(&dispatcher, CatalogQuery::Song { id }).await
}

/// GET /api/song/{id}/related - Songs related to a track
#[utoipa::path(
    get,
    path = "/api/song/{id}/related",
    tag = "Songs",
    params(
        ("id" = String, Path, description = "Video id of the seed track"),
    ),
    responses(
        (status = 200, description = "Related tracks: {related, count}", body = serde_json::Value),
        (status = 404, description = "Song not found", body = ApiError),
    ),
)]
pub async fn get_related(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(id): Path<String>,
) -> ApiResult<CatalogResponse> {
    run(&dispatcher, CatalogQuery::SongRelated { id }).await
}

/// GET /api/lyrics/{id} - Lyrics
#[utoipa::path(
    get,
    path = "/api/lyrics/{id}",
    tag = "Songs",
    params(
        ("id" = String, Path, description = "Lyrics browse id"),
    ),
    responses(
        (status = 200, description = "Lyrics record", body = serde_json::Value),
        (status = 404, description = "Lyrics not found", body = ApiError),
    ),
)]
pub async fn get_lyrics(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(id): Path<String>,
) -> ApiResult<CatalogResponse> {
    run(&dispatcher, CatalogQuery::Lyrics { id }).await
}

// ============================================================================
// ARTISTS AND ALBUMS
// ============================================================================

/// GET /api/artist/{id} - Artist record with reconciled identifiers
#[utoipa::path(
    get,
    path = "/api/artist/{id}",
    tag = "Artists",
    params(
        ("id" = String, Path, description = "Artist channel or browse id"),
    ),
    responses(
        (status = 200, description = "Artist record with _debug provenance", body = serde_json::Value),
        (status = 400, description = "Empty artist id", body = ApiError),
        (status = 404, description = "Artist not found", body = ApiError),
    ),
)]
pub async fn get_artist(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(id): Path<String>,
) -> ApiResult<CatalogResponse> {
    run(&dispatcher, CatalogQuery::Artist { id }).await
}

/// GET /api/artist/{id}/albums - Artist discography
///
/// Provider failures answer 200 with an empty result list.
#[utoipa::path(
    get,
    path = "/api/artist/{id}/albums",
    tag = "Artists",
    params(
        ("id" = String, Path, description = "Artist channel id"),
        ("params" = Option<String>, Query, description = "Provider continuation params"),
        ("limit" = Option<u32>, Query, description = "Maximum number of albums (default: 50)"),
    ),
    responses(
        (status = 200, description = "Album list, empty when unavailable", body = serde_json::Value),
        (status = 400, description = "Invalid limit", body = ApiError),
    ),
)]
pub async fn get_artist_albums(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(id): Path<String>,
    Query(params): Query<ArtistAlbumsParams>,
) -> ApiResult<CatalogResponse> {
    run(
        &dispatcher,
        CatalogQuery::ArtistAlbums {
            id,
            params: params.params,
            limit: params.limit,
        },
    )
    .await
}

/// GET /api/album/{id} - Album details
#[utoipa::path(
    get,
    path = "/api/album/{id}",
    tag = "Albums",
    params(
        ("id" = String, Path, description = "Album browse id"),
    ),
    responses(
        (status = 200, description = "Album record", body = serde_json::Value),
        (status = 404, description = "Album not found", body = ApiError),
    ),
)]
pub async fn get_album(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(id): Path<String>,
) -> ApiResult<CatalogResponse> {
    run(&dispatcher, CatalogQuery::Album { id }).await
}

// ============================================================================
// PLAYLISTS
// ============================================================================

/// GET /api/playlist/{id} - Playlist contents
#[utoipa::path(
    get,
    path = "/api/playlist/{id}",
    tag = "Playlists",
    params(
        ("id" = String, Path, description = "Playlist id"),
        ("limit" = Option<u32>, Query, description = "Maximum number of tracks (default: 100)"),
    ),
    responses(
        (status = 200, description = "Playlist record", body = serde_json::Value),
        (status = 404, description = "Playlist not found", body = ApiError),
    ),
)]
pub async fn get_playlist(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(id): Path<String>,
    Query(params): Query<LimitParams>,
) -> ApiResult<CatalogResponse> {
    run(
        &dispatcher,
        CatalogQuery::Playlist {
            id,
            limit: params.limit,
        },
    )
    .await
}

/// GET /api/watch/{id} - "Up next" queue for a track
#[utoipa::path(
    get,
    path = "/api/watch/{id}",
    tag = "Playlists",
    params(
        ("id" = String, Path, description = "Video id"),
        ("limit" = Option<u32>, Query, description = "Maximum number of tracks (default: 25)"),
        ("playlist_id" = Option<String>, Query, description = "Playlist the track is played from"),
    ),
    responses(
        (status = 200, description = "Watch playlist", body = serde_json::Value),
        (status = 404, description = "Track not found", body = ApiError),
    ),
)]
pub async fn get_watch_playlist(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(id): Path<String>,
    Query(params): Query<WatchParams>,
) -> ApiResult<CatalogResponse> {
    run(
        &dispatcher,
        CatalogQuery::Watch {
            id,
            limit: params.limit,
            playlist_id: params.playlist_id,
        },
    )
    .await
}

// ============================================================================
// DISCOVERY
// ============================================================================

/// GET /api/charts - Charts for a country
///
/// Provider failures answer 200 with empty lists.
#[utoipa::path(
    get,
    path = "/api/charts",
    tag = "Discovery",
    params(
        ("country" = Option<String>, Query, description = "ISO country code (default: ZZ, global)"),
    ),
    responses(
        (status = 200, description = "Charts, empty when unavailable", body = serde_json::Value),
    ),
)]
pub async fn get_charts(
    State(dispatcher): State<Arc<Dispatcher>>,
    Query(params): Query<ChartsParams>,
) -> ApiResult<CatalogResponse> {
    run(
        &dispatcher,
        CatalogQuery::Charts {
            country: params.country,
        },
    )
    .await
}

/// GET /api/home - Home feed
#[utoipa::path(
    get,
    path = "/api/home",
    tag = "Discovery",
    params(
        ("limit" = Option<u32>, Query, description = "Number of shelves (default: 20)"),
    ),
    responses(
        (status = 200, description = "Home feed shelves", body = serde_json::Value),
    ),
)]
pub async fn get_home(
    State(dispatcher): State<Arc<Dispatcher>>,
    Query(params): Query<LimitParams>,
) -> ApiResult<CatalogResponse> {
    run(
        &dispatcher,
        CatalogQuery::Home {
            limit: params.limit,
        },
    )
    .await
}

/// GET /api/moods - Mood and genre categories
#[utoipa::path(
    get,
    path = "/api/moods",
    tag = "Discovery",
    responses(
        (status = 200, description = "Mood categories", body = serde_json::Value),
    ),
)]
pub async fn get_mood_categories(
    State(dispatcher): State<Arc<Dispatcher>>,
) -> ApiResult<CatalogResponse> {
    run(&dispatcher, CatalogQuery::MoodCategories).await
}

/// GET /api/moods/{params} - Playlists for one mood category
#[utoipa::path(
    get,
    path = "/api/moods/{params}",
    tag = "Discovery",
    params(
        ("params" = String, Path, description = "Category params from /api/moods"),
    ),
    responses(
        (status = 200, description = "Mood playlists", body = serde_json::Value),
        (status = 404, description = "Category not found", body = ApiError),
    ),
)]
pub async fn get_mood_playlists(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(params): Path<String>,
) -> ApiResult<CatalogResponse> {
    run(&dispatcher, CatalogQuery::MoodPlaylists { params }).await
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the catalog router, mounted under `/api`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/search/suggestions", get(search_suggestions))
        .route("/song/:id", get(get_song))
        .route("/song/:id/related", get(get_related))
        .route("/lyrics/:id", get(get_lyrics))
        .route("/artist/:id", get(get_artist))
        .route("/artist/:id/albums", get(get_artist_albums))
        .route("/album/:id", get(get_album))
        .route("/playlist/:id", get(get_playlist))
        .route("/watch/:id", get(get_watch_playlist))
        .route("/charts", get(get_charts))
        .route("/home", get(get_home))
        .route("/moods", get(get_mood_categories))
        .route("/moods/:params", get(get_mood_playlists))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::PayloadSource;
    use serde_json::json;

    #[test]
    fn test_catalog_response_sets_cache_header() {
        let response = CatalogResponse(DispatchOutcome {
            payload: Arc::new(json!({ "ok": true })),
            source: PayloadSource::Cache,
        })
        .into_response();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()[CACHE_STATUS_HEADER], "HIT");
    }
}
