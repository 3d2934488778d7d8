//! Request Dispatcher
//!
//! Per-route orchestration of every catalog request. Each request runs the
//! same ordered stages:
//!
//! 1. `RequireProvider` - 503 when the provider failed to initialize
//! 2. `Validate` - raw parameters become a typed [`CatalogRequest`]
//! 3. `CacheLookup` - a fresh entry is returned unchanged
//! 4. `Fetch` - provider call (artist ids go through the identity resolver)
//! 5. `Store` - successful payloads are cached with the route's TTL
//!
//! Fetch failures follow the route's [`FailurePolicy`]. Soft fallbacks and
//! errors are never stored.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};
use soundpulse_core::{
    CacheTtlConfig, CatalogProvider, ProviderOperation, RouteId, ValidationError,
};
use soundpulse_storage::{CacheKey, CachePayload};

use crate::constants::{
    DEFAULT_ARTIST_ALBUMS_LIMIT, DEFAULT_CHARTS_COUNTRY, DEFAULT_HOME_LIMIT,
    DEFAULT_PLAYLIST_LIMIT, DEFAULT_SEARCH_FILTER, DEFAULT_SEARCH_LIMIT, DEFAULT_WATCH_LIMIT,
    RELATED_WATCH_LIMIT,
};
use crate::error::{ApiError, ApiResult};
use crate::providers::observed;
use crate::services::ArtistIdentityResolver;
use crate::state::ApiCache;
use crate::telemetry::metrics;

// ============================================================================
// STAGES AND POLICIES
// ============================================================================

/// Dispatch pipeline stage, as it appears in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RequireProvider,
    Validate,
    CacheLookup,
    Fetch,
    Store,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::RequireProvider => "require_provider",
            Stage::Validate => "validate",
            Stage::CacheLookup => "cache_lookup",
            Stage::Fetch => "fetch",
            Stage::Store => "store",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a route does when the provider call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Translate the failure into an error response.
    Hard,
    /// Answer 200 with an empty, well-formed payload.
    Soft,
}

/// Where a dispatched payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    Cache,
    Provider,
    Fallback,
}

impl PayloadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadSource::Cache => "HIT",
            PayloadSource::Provider => "MISS",
            PayloadSource::Fallback => "FALLBACK",
        }
    }
}

/// Payload plus provenance.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub payload: CachePayload,
    pub source: PayloadSource,
}

// ============================================================================
// INBOUND QUERY
// ============================================================================

/// A catalog request as received: path segments and raw query strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    Search {
        q: Option<String>,
        filter: Option<String>,
        limit: Option<String>,
    },
    SearchSuggestions {
        q: Option<String>,
    },
    Song {
        id: String,
    },
    SongRelated {
        id: String,
    },
    Lyrics {
        id: String,
    },
    Artist {
        id: String,
    },
    ArtistAlbums {
        id: String,
        params: Option<String>,
        limit: Option<String>,
    },
    Album {
        id: String,
    },
    Playlist {
        id: String,
        limit: Option<String>,
    },
    Watch {
        id: String,
        limit: Option<String>,
        playlist_id: Option<String>,
    },
    Charts {
        country: Option<String>,
    },
    Home {
        limit: Option<String>,
    },
    MoodCategories,
    MoodPlaylists {
        params: String,
    },
}

impl CatalogQuery {
    pub fn route(&self) -> RouteId {
        match self {
            CatalogQuery::Search { .. } => RouteId::Search,
            CatalogQuery::SearchSuggestions { .. } => RouteId::SearchSuggestions,
            CatalogQuery::Song { .. } => RouteId::Song,
            CatalogQuery::SongRelated { .. } => RouteId::SongRelated,
            CatalogQuery::Lyrics { .. } => RouteId::Lyrics,
            CatalogQuery::Artist { .. } => RouteId::Artist,
            CatalogQuery::ArtistAlbums { .. } => RouteId::ArtistAlbums,
            CatalogQuery::Album { .. } => RouteId::Album,
            CatalogQuery::Playlist { .. } => RouteId::Playlist,
            CatalogQuery::Watch { .. } => RouteId::Watch,
            CatalogQuery::Charts { .. } => RouteId::Charts,
            CatalogQuery::Home { .. } => RouteId::Home,
            CatalogQuery::MoodCategories => RouteId::MoodCategories,
            CatalogQuery::MoodPlaylists { .. } => RouteId::MoodPlaylists,
        }
    }

    /// Check required parameters and apply defaults.
    ///
    /// # Errors
    /// - `MissingParameter` when `q` is absent or blank
    /// - `InvalidParameter` for a blank path id or a non-numeric `limit`
    pub fn validate(self) -> Result<CatalogRequest, ValidationError> {
        let request = match self {
            CatalogQuery::Search { q, filter, limit } => CatalogRequest::Search {
                query: required_query(q)?,
                filter: or_default(filter, DEFAULT_SEARCH_FILTER),
                limit: parse_limit(limit, DEFAULT_SEARCH_LIMIT)?,
            },
            CatalogQuery::SearchSuggestions { q } => CatalogRequest::SearchSuggestions {
                query: required_query(q)?,
            },
            CatalogQuery::Song { id } => CatalogRequest::Song {
                video_id: path_param("id", id)?,
            },
            CatalogQuery::SongRelated { id } => CatalogRequest::SongRelated {
                video_id: path_param("id", id)?,
            },
            CatalogQuery::Lyrics { id } => CatalogRequest::Lyrics {
                browse_id: path_param("id", id)?,
            },
            CatalogQuery::Artist { id } => CatalogRequest::Artist {
                channel_id: path_param("id", id)?,
            },
            CatalogQuery::ArtistAlbums { id, params, limit } => CatalogRequest::ArtistAlbums {
                channel_id: path_param("id", id)?,
                params,
                limit: parse_limit(limit, DEFAULT_ARTIST_ALBUMS_LIMIT)?,
            },
            CatalogQuery::Album { id } => CatalogRequest::Album {
                browse_id: path_param("id", id)?,
            },
            CatalogQuery::Playlist { id, limit } => CatalogRequest::Playlist {
                playlist_id: path_param("id", id)?,
                limit: parse_limit(limit, DEFAULT_PLAYLIST_LIMIT)?,
            },
            CatalogQuery::Watch {
                id,
                limit,
                playlist_id,
            } => CatalogRequest::Watch {
                video_id: path_param("id", id)?,
                limit: parse_limit(limit, DEFAULT_WATCH_LIMIT)?,
                playlist_id,
            },
            CatalogQuery::Charts { country } => CatalogRequest::Charts {
                country: or_default(country, DEFAULT_CHARTS_COUNTRY),
            },
            CatalogQuery::Home { limit } => CatalogRequest::Home {
                limit: parse_limit(limit, DEFAULT_HOME_LIMIT)?,
            },
            CatalogQuery::MoodCategories => CatalogRequest::MoodCategories,
            CatalogQuery::MoodPlaylists { params } => CatalogRequest::MoodPlaylists {
                params: path_param("params", params)?,
            },
        };
        Ok(request)
    }
}

fn required_query(q: Option<String>) -> Result<String, ValidationError> {
    q.filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ValidationError::MissingParameter {
            name: "q".to_string(),
        })
}

fn path_param(name: &str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidParameter {
            name: name.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_limit(raw: Option<String>, default: u32) -> Result<u32, ValidationError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s.parse().map_err(|_| ValidationError::InvalidParameter {
            name: "limit".to_string(),
            reason: format!("must be a non-negative integer, got {:?}", s),
        }),
    }
}

// ============================================================================
// VALIDATED REQUEST
// ============================================================================

/// A validated catalog request with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    Search {
        query: String,
        filter: String,
        limit: u32,
    },
    SearchSuggestions {
        query: String,
    },
    Song {
        video_id: String,
    },
    SongRelated {
        video_id: String,
    },
    Lyrics {
        browse_id: String,
    },
    Artist {
        channel_id: String,
    },
    ArtistAlbums {
        channel_id: String,
        params: Option<String>,
        limit: u32,
    },
    Album {
        browse_id: String,
    },
    Playlist {
        playlist_id: String,
        limit: u32,
    },
    Watch {
        video_id: String,
        limit: u32,
        playlist_id: Option<String>,
    },
    Charts {
        country: String,
    },
    Home {
        limit: u32,
    },
    MoodCategories,
    MoodPlaylists {
        params: String,
    },
}

impl CatalogRequest {
    pub fn route(&self) -> RouteId {
        match self {
            CatalogRequest::Search { .. } => RouteId::Search,
            CatalogRequest::SearchSuggestions { .. } => RouteId::SearchSuggestions,
            CatalogRequest::Song { .. } => RouteId::Song,
            CatalogRequest::SongRelated { .. } => RouteId::SongRelated,
            CatalogRequest::Lyrics { .. } => RouteId::Lyrics,
            CatalogRequest::Artist { .. } => RouteId::Artist,
            CatalogRequest::ArtistAlbums { .. } => RouteId::ArtistAlbums,
            CatalogRequest::Album { .. } => RouteId::Album,
            CatalogRequest::Playlist { .. } => RouteId::Playlist,
            CatalogRequest::Watch { .. } => RouteId::Watch,
            CatalogRequest::Charts { .. } => RouteId::Charts,
            CatalogRequest::Home { .. } => RouteId::Home,
            CatalogRequest::MoodCategories => RouteId::MoodCategories,
            CatalogRequest::MoodPlaylists { .. } => RouteId::MoodPlaylists,
        }
    }

    /// Cache key over every parameter that changes the response.
    pub fn cache_key(&self) -> CacheKey {
        let key = CacheKey::new(self.route());
        match self {
            CatalogRequest::Search {
                query,
                filter,
                limit,
            } => key
                .with_param("q", query.as_str())
                .with_param("filter", filter.as_str())
                .with_param("limit", limit.to_string()),
            CatalogRequest::SearchSuggestions { query } => key.with_param("q", query.as_str()),
            CatalogRequest::Song { video_id } | CatalogRequest::SongRelated { video_id } => {
                key.with_param("id", video_id.as_str())
            }
            CatalogRequest::Lyrics { browse_id } | CatalogRequest::Album { browse_id } => {
                key.with_param("id", browse_id.as_str())
            }
            CatalogRequest::Artist { channel_id } => key.with_param("id", channel_id.as_str()),
            CatalogRequest::ArtistAlbums {
                channel_id,
                params,
                limit,
            } => key
                .with_param("id", channel_id.as_str())
                .with_optional_param("params", params.as_deref())
                .with_param("limit", limit.to_string()),
            CatalogRequest::Playlist { playlist_id, limit } => key
                .with_param("id", playlist_id.as_str())
                .with_param("limit", limit.to_string()),
            CatalogRequest::Watch {
                video_id,
                limit,
                playlist_id,
            } => key
                .with_param("id", video_id.as_str())
                .with_param("limit", limit.to_string())
                .with_optional_param("playlist_id", playlist_id.as_deref()),
            CatalogRequest::Charts { country } => key.with_param("country", country.as_str()),
            CatalogRequest::Home { limit } => key.with_param("limit", limit.to_string()),
            CatalogRequest::MoodCategories => key,
            CatalogRequest::MoodPlaylists { params } => key.with_param("params", params.as_str()),
        }
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        match self {
            CatalogRequest::ArtistAlbums { .. } | CatalogRequest::Charts { .. } => {
                FailurePolicy::Soft
            }
            _ => FailurePolicy::Hard,
        }
    }

    /// Empty payload returned by soft routes when the provider fails.
    pub fn soft_fallback(&self) -> Option<Value> {
        match self {
            CatalogRequest::ArtistAlbums { channel_id, .. } => Some(json!({
                "browseId": channel_id,
                "results": [],
                "params": null,
            })),
            CatalogRequest::Charts { country } => Some(json!({
                "country": country,
                "videos": [],
                "trending": [],
                "message": format!("charts not available for {}", country),
            })),
            _ => None,
        }
    }
}

/// True when an album listing carries at least one result.
fn has_results(value: &Value) -> bool {
    let results = match value {
        Value::Array(_) => Some(value),
        _ => value.get("results"),
    };
    results
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty())
}

// ============================================================================
// DISPATCHER
// ============================================================================

/// Runs catalog requests through the stage pipeline.
pub struct Dispatcher {
    provider: Option<Arc<dyn CatalogProvider>>,
    cache: ApiCache,
    ttls: CacheTtlConfig,
}

impl Dispatcher {
    pub fn new(
        provider: Option<Arc<dyn CatalogProvider>>,
        cache: ApiCache,
        ttls: CacheTtlConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            ttls,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn cache(&self) -> &ApiCache {
        &self.cache
    }

    pub fn ttls(&self) -> &CacheTtlConfig {
        &self.ttls
    }

    /// Run `query` through every stage.
    pub async fn dispatch(&self, query: CatalogQuery) -> ApiResult<DispatchOutcome> {
        let route = query.route();

        let Some(provider) = self.provider.as_deref() else {
            tracing::debug!(route = %route, stage = %Stage::RequireProvider, "No catalog provider");
            return Err(ApiError::provider_unavailable());
        };

        let request = query.validate().map_err(|e| {
            tracing::debug!(route = %route, stage = %Stage::Validate, error = %e, "Rejected");
            ApiError::from(e)
        })?;

        let key = request.cache_key();
        if let Some(read) = self.cache.get(&key) {
            record_cache_lookup(route, true);
            tracing::debug!(
                route = %route,
                stage = %Stage::CacheLookup,
                key = %key,
                age_secs = read.age().as_secs(),
                "Cache hit"
            );
            return Ok(DispatchOutcome {
                payload: read.into_value(),
                source: PayloadSource::Cache,
            });
        }
        record_cache_lookup(route, false);
        tracing::debug!(route = %route, stage = %Stage::CacheLookup, key = %key, "Cache miss");

        let value = match self.fetch(provider, &request).await {
            Ok(value) => value,
            Err(err) => {
                return match (request.failure_policy(), request.soft_fallback()) {
                    (FailurePolicy::Soft, Some(fallback)) => {
                        tracing::warn!(
                            route = %route,
                            stage = %Stage::Fetch,
                            error = %err,
                            "Provider failed, serving empty fallback"
                        );
                        Ok(DispatchOutcome {
                            payload: Arc::new(fallback),
                            source: PayloadSource::Fallback,
                        })
                    }
                    _ => {
                        tracing::debug!(route = %route, stage = %Stage::Fetch, error = %err, "Fetch failed");
                        Err(err)
                    }
                };
            }
        };

        let ttl = self.ttls.ttl_for(route);
        let payload = self.cache.put(key, value, ttl);
        if let Some(m) = metrics() {
            m.set_cache_entries(self.cache.len());
        }
        tracing::debug!(
            route = %route,
            stage = %Stage::Store,
            ttl_secs = ttl.as_secs(),
            "Stored response"
        );

        Ok(DispatchOutcome {
            payload,
            source: PayloadSource::Provider,
        })
    }

    async fn fetch(&self, provider: &dyn CatalogProvider, request: &CatalogRequest) -> ApiResult<Value> {
        let value = match request {
            CatalogRequest::Search {
                query,
                filter,
                limit,
            } => {
                let results = observed(
                    ProviderOperation::Search,
                    provider.search(query, filter, *limit),
                )
                .await?;
                let count = results.as_array().map_or(0, Vec::len);
                json!({
                    "query": query,
                    "filter": filter,
                    "count": count,
                    "results": results,
                })
            }
            CatalogRequest::SearchSuggestions { query } => {
                let suggestions = observed(
                    ProviderOperation::SearchSuggestions,
                    provider.search_suggestions(query),
                )
                .await?;
                json!({ "query": query, "suggestions": suggestions })
            }
            CatalogRequest::Song { video_id } => {
                observed(ProviderOperation::Song, provider.song(video_id)).await?
            }
            CatalogRequest::SongRelated { video_id } => {
                let watch = observed(
                    ProviderOperation::WatchPlaylist,
                    provider.watch_playlist(video_id, RELATED_WATCH_LIMIT, None),
                )
                .await?;
                // The first track is the seed song itself.
                let related: Vec<Value> = watch
                    .get("tracks")
                    .and_then(Value::as_array)
                    .map(|tracks| tracks.iter().skip(1).cloned().collect())
                    .unwrap_or_default();
                json!({ "count": related.len(), "related": related })
            }
            CatalogRequest::Lyrics { browse_id } => {
                observed(ProviderOperation::Lyrics, provider.lyrics(browse_id)).await?
            }
            CatalogRequest::Artist { channel_id } => {
                ArtistIdentityResolver::new(provider)
                    .resolve(channel_id)
                    .await?
                    .into_payload()?
            }
            CatalogRequest::ArtistAlbums {
                channel_id,
                params,
                limit,
            } => {
                let albums = observed(
                    ProviderOperation::ArtistAlbums,
                    provider.artist_albums(channel_id, params.as_deref(), *limit),
                )
                .await?;
                if params.is_some() && !has_results(&albums) {
                    tracing::debug!(
                        channel_id = %channel_id,
                        stage = %Stage::Fetch,
                        "No albums with params, retrying without"
                    );
                    observed(
                        ProviderOperation::ArtistAlbums,
                        provider.artist_albums(channel_id, None, *limit),
                    )
                    .await?
                } else {
                    albums
                }
            }
            CatalogRequest::Album { browse_id } => {
                observed(ProviderOperation::Album, provider.album(browse_id)).await?
            }
            CatalogRequest::Playlist { playlist_id, limit } => {
                observed(
                    ProviderOperation::Playlist,
                    provider.playlist(playlist_id, *limit),
                )
                .await?
            }
            CatalogRequest::Watch {
                video_id,
                limit,
                playlist_id,
            } => {
                observed(
                    ProviderOperation::WatchPlaylist,
                    provider.watch_playlist(video_id, *limit, playlist_id.as_deref()),
                )
                .await?
            }
            CatalogRequest::Charts { country } => {
                observed(ProviderOperation::Charts, provider.charts(country)).await?
            }
            CatalogRequest::Home { limit } => {
                observed(ProviderOperation::Home, provider.home(*limit)).await?
            }
            CatalogRequest::MoodCategories => {
                observed(ProviderOperation::MoodCategories, provider.mood_categories()).await?
            }
            CatalogRequest::MoodPlaylists { params } => {
                observed(
                    ProviderOperation::MoodPlaylists,
                    provider.mood_playlists(params),
                )
                .await?
            }
        };
        Ok(value)
    }
}

fn record_cache_lookup(route: RouteId, hit: bool) {
    if let Some(m) = metrics() {
        m.record_cache_lookup(route.as_str(), hit);
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use soundpulse_core::ProviderError;
    use soundpulse_storage::ManualClock;
    use soundpulse_test_utils::fixtures::{self, CHANNEL_ID};
    use soundpulse_test_utils::MockCatalogProvider;
    use std::time::Duration;

    fn dispatcher(provider: MockCatalogProvider) -> (Dispatcher, Arc<MockCatalogProvider>) {
        let provider = Arc::new(provider);
        let cache = ApiCache::in_memory_with_clock(Arc::new(ManualClock::starting_now()));
        let dispatcher = Dispatcher::new(
            Some(provider.clone() as Arc<dyn CatalogProvider>),
            cache,
            CacheTtlConfig::default(),
        );
        (dispatcher, provider)
    }

    fn search(q: Option<&str>, limit: Option<&str>) -> CatalogQuery {
        CatalogQuery::Search {
            q: q.map(str::to_string),
            filter: None,
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_search_defaults() {
        let request = search(Some("test"), None).validate().unwrap();
        assert_eq!(
            request,
            CatalogRequest::Search {
                query: "test".into(),
                filter: "songs".into(),
                limit: 20,
            }
        );
    }

    #[test]
    fn test_missing_or_blank_query_rejected() {
        for q in [None, Some(""), Some("   ")] {
            let err = search(q, None).validate().unwrap_err();
            assert!(matches!(err, ValidationError::MissingParameter { ref name } if name == "q"));
        }
    }

    #[test]
    fn test_non_numeric_limit_rejected() {
        for limit in ["ten", "-1", "2.5"] {
            let err = search(Some("test"), Some(limit)).validate().unwrap_err();
            assert!(matches!(err, ValidationError::InvalidParameter { ref name, .. } if name == "limit"));
        }
    }

    #[test]
    fn test_limit_is_part_of_key() {
        let a = search(Some("test"), Some("3")).validate().unwrap().cache_key();
        let b = search(Some("test"), Some("4")).validate().unwrap().cache_key();
        let c = search(Some("test"), Some("3")).validate().unwrap().cache_key();
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_absent_and_empty_optional_params_differ() {
        let key = |params: Option<&str>| {
            CatalogQuery::ArtistAlbums {
                id: CHANNEL_ID.into(),
                params: params.map(str::to_string),
                limit: None,
            }
            .validate()
            .unwrap()
            .cache_key()
        };
        assert_ne!(key(None), key(Some("")));
    }

    #[test]
    fn test_blank_path_id_rejected() {
        let err = CatalogQuery::Song { id: " ".into() }.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidParameter { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_blank_mood_params_names_params() {
        let err = CatalogQuery::MoodPlaylists { params: "".into() }
            .validate()
            .unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidParameter { ref name, .. } if name == "params")
        );
    }

    #[test]
    fn test_failure_policies() {
        let charts = CatalogQuery::Charts { country: None }.validate().unwrap();
        assert_eq!(charts.failure_policy(), FailurePolicy::Soft);
        assert_eq!(charts.soft_fallback().unwrap()["country"], "ZZ");

        let song = CatalogQuery::Song { id: "abc".into() }.validate().unwrap();
        assert_eq!(song.failure_policy(), FailurePolicy::Hard);
        assert!(song.soft_fallback().is_none());
    }

    #[tokio::test]
    async fn test_second_dispatch_is_cache_hit() {
        let (dispatcher, provider) = dispatcher(MockCatalogProvider::new().with_response(
            ProviderOperation::Search,
            "test",
            fixtures::search_results(3),
        ));

        let first = dispatcher.dispatch(search(Some("test"), Some("3"))).await.unwrap();
        let second = dispatcher.dispatch(search(Some("test"), Some("3"))).await.unwrap();

        assert_eq!(first.source, PayloadSource::Provider);
        assert_eq!(second.source, PayloadSource::Cache);
        assert!(Arc::ptr_eq(&first.payload, &second.payload));
        assert_eq!(first.payload["count"], 3);
        assert_eq!(provider.call_count(ProviderOperation::Search), 1);
    }

    #[tokio::test]
    async fn test_no_provider_is_unavailable_even_for_soft_routes() {
        let dispatcher = Dispatcher::new(None, ApiCache::in_memory(), CacheTtlConfig::default());
        let err = dispatcher
            .dispatch(CatalogQuery::Charts { country: None })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn test_soft_fallback_is_not_cached() {
        let (dispatcher, provider) = dispatcher(
            MockCatalogProvider::new()
                .with_failure(ProviderOperation::Charts, "US", ProviderError::upstream("boom"))
                .with_response(ProviderOperation::Charts, "US", fixtures::charts("US")),
        );
        let query = || CatalogQuery::Charts {
            country: Some("US".into()),
        };

        let first = dispatcher.dispatch(query()).await.unwrap();
        assert_eq!(first.source, PayloadSource::Fallback);
        assert_eq!(first.payload["message"], "charts not available for US");
        assert!(dispatcher.cache().is_empty());

        let second = dispatcher.dispatch(query()).await.unwrap();
        assert_eq!(second.source, PayloadSource::Provider);
        assert_eq!(provider.call_count(ProviderOperation::Charts), 2);
    }

    #[tokio::test]
    async fn test_hard_failure_is_not_cached() {
        let (dispatcher, provider) = dispatcher(
            MockCatalogProvider::new()
                .with_failure(ProviderOperation::Song, "abc", ProviderError::timeout("slow"))
                .with_response(ProviderOperation::Song, "abc", fixtures::song("abc")),
        );

        let err = dispatcher
            .dispatch(CatalogQuery::Song { id: "abc".into() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Timeout);

        let ok = dispatcher
            .dispatch(CatalogQuery::Song { id: "abc".into() })
            .await
            .unwrap();
        assert_eq!(ok.payload["videoDetails"]["videoId"], "abc");
        assert_eq!(provider.call_count(ProviderOperation::Song), 2);
    }

    #[tokio::test]
    async fn test_artist_albums_retries_without_params() {
        let (dispatcher, provider) = dispatcher(
            MockCatalogProvider::new()
                .with_response(ProviderOperation::ArtistAlbums, CHANNEL_ID, json!({ "results": [] }))
                .with_response(ProviderOperation::ArtistAlbums, CHANNEL_ID, fixtures::artist_albums(2)),
        );

        let outcome = dispatcher
            .dispatch(CatalogQuery::ArtistAlbums {
                id: CHANNEL_ID.into(),
                params: Some("ggMIegYIARoCAQI".into()),
                limit: None,
            })
            .await
            .unwrap();

        assert_eq!(outcome.payload["results"].as_array().unwrap().len(), 2);
        let calls = provider.calls_for(ProviderOperation::ArtistAlbums);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].arg("params"), Some("ggMIegYIARoCAQI"));
        assert_eq!(calls[1].arg("params"), None);
        assert_eq!(calls[1].arg("limit"), Some("50"));
    }

    #[tokio::test]
    async fn test_song_related_drops_seed_track() {
        let (dispatcher, provider) = dispatcher(MockCatalogProvider::new().with_response(
            ProviderOperation::WatchPlaylist,
            "seed",
            fixtures::watch_playlist("seed", 4),
        ));

        let outcome = dispatcher
            .dispatch(CatalogQuery::SongRelated { id: "seed".into() })
            .await
            .unwrap();

        assert_eq!(outcome.payload["count"], 3);
        assert_eq!(outcome.payload["related"][0]["videoId"], "seed-next1");
        let calls = provider.calls_for(ProviderOperation::WatchPlaylist);
        assert_eq!(calls[0].arg("limit"), Some("25"));
    }

    #[tokio::test]
    async fn test_entry_expires_after_route_ttl() {
        let provider = Arc::new(MockCatalogProvider::new().with_response(
            ProviderOperation::Home,
            "",
            json!([{ "title": "Quick picks" }]),
        ));
        let clock = Arc::new(ManualClock::starting_now());
        let dispatcher = Dispatcher::new(
            Some(provider.clone() as Arc<dyn CatalogProvider>),
            ApiCache::in_memory_with_clock(clock.clone()),
            CacheTtlConfig::default().with_ttl(RouteId::Home, Duration::from_secs(30)),
        );
        let home = || CatalogQuery::Home { limit: None };

        dispatcher.dispatch(home()).await.unwrap();
        clock.advance(Duration::from_secs(29));
        dispatcher.dispatch(home()).await.unwrap();
        assert_eq!(provider.call_count(ProviderOperation::Home), 1);

        clock.advance(Duration::from_secs(1));
        dispatcher.dispatch(home()).await.unwrap();
        assert_eq!(provider.call_count(ProviderOperation::Home), 2);
    }
}
