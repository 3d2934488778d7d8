//! End-to-end tests for the SoundPulse HTTP surface.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use soundpulse_core::{ProviderError, ProviderOperation};
use soundpulse_test_utils::{fixtures, MockCatalogProvider};

#[path = "support/app.rs"]
mod test_app_support;
use test_app_support::{get, post, test_app, test_app_without_provider};

// ============================================================================
// CACHING
// ============================================================================

#[tokio::test]
async fn search_twice_returns_identical_bytes_with_one_provider_call() {
    let app = test_app(MockCatalogProvider::new().with_response(
        ProviderOperation::Search,
        "test",
        fixtures::search_results(3),
    ));

    let first = get(&app.router, "/api/search?q=test&filter=songs&limit=3").await;
    let second = get(&app.router, "/api/search?q=test&filter=songs&limit=3").await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);
    assert_eq!(first.cache_status(), Some("MISS"));
    assert_eq!(second.cache_status(), Some("HIT"));
    assert_eq!(app.provider.call_count(ProviderOperation::Search), 1);

    let body = first.json();
    assert_eq!(body["query"], "test");
    assert_eq!(body["filter"], "songs");
    assert_eq!(body["count"], 3);

    let call = &app.provider.calls_for(ProviderOperation::Search)[0];
    assert_eq!(call.arg("limit"), Some("3"));
}

#[tokio::test]
async fn differing_limit_never_shares_an_entry() {
    let app = test_app(
        MockCatalogProvider::new()
            .with_default(ProviderOperation::Search, Ok(fixtures::search_results(2))),
    );

    get(&app.router, "/api/search?q=test&limit=3").await;
    let other = get(&app.router, "/api/search?q=test&limit=4").await;

    assert_eq!(other.cache_status(), Some("MISS"));
    assert_eq!(app.provider.call_count(ProviderOperation::Search), 2);
    assert_eq!(app.cache.len(), 2);
}

#[tokio::test]
async fn entry_expires_after_route_ttl() {
    let app = test_app(MockCatalogProvider::new().with_response(
        ProviderOperation::Song,
        "abc",
        fixtures::song("abc"),
    ));

    get(&app.router, "/api/song/abc").await;
    app.clock.advance(Duration::from_secs(599));
    let cached = get(&app.router, "/api/song/abc").await;
    assert_eq!(cached.cache_status(), Some("HIT"));
    assert_eq!(app.provider.call_count(ProviderOperation::Song), 1);

    app.clock.advance(Duration::from_secs(1));
    let refreshed = get(&app.router, "/api/song/abc").await;
    assert_eq!(refreshed.cache_status(), Some("MISS"));
    assert_eq!(app.provider.call_count(ProviderOperation::Song), 2);
}

#[tokio::test]
async fn clear_cache_forces_refetch() {
    let app = test_app(MockCatalogProvider::new().with_response(
        ProviderOperation::Album,
        fixtures::BROWSE_ID,
        json!({ "title": "Album" }),
    ));
    let uri = format!("/api/album/{}", fixtures::BROWSE_ID);

    get(&app.router, &uri).await;
    let cleared = post(&app.router, "/api/clear-cache").await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert_eq!(
        cleared.json(),
        json!({ "status": "success", "message": "cache cleared", "removed": 1 })
    );

    get(&app.router, &uri).await;
    assert_eq!(app.provider.call_count(ProviderOperation::Album), 2);
}

// ============================================================================
// VALIDATION
// ============================================================================

#[tokio::test]
async fn missing_query_is_rejected_without_provider_call() {
    let app = test_app(MockCatalogProvider::new());

    for uri in ["/api/search", "/api/search?q=", "/api/search/suggestions"] {
        let response = get(&app.router, uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        let body = response.json();
        assert_eq!(body["error"], "MISSING_PARAMETER");
        assert!(body["message"].as_str().unwrap().contains("\"q\""));
        assert!(body["timestamp"].is_string());
    }
    assert_eq!(app.provider.total_calls(), 0);
}

#[tokio::test]
async fn non_numeric_limit_is_invalid_input() {
    let app = test_app(MockCatalogProvider::new());

    let response = get(&app.router, "/api/playlist/PL123?limit=lots").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "INVALID_INPUT");
    assert_eq!(response.json()["details"]["parameter"], "limit");
    assert_eq!(app.provider.total_calls(), 0);
}

// ============================================================================
// FAILURE TRANSLATION
// ============================================================================

#[tokio::test]
async fn provider_failures_map_to_status_codes() {
    let app = test_app(
        MockCatalogProvider::new()
            .with_failure(ProviderOperation::Song, "slow", ProviderError::upstream("Read TIMEOUT"))
            .with_failure(ProviderOperation::Song, "gone", ProviderError::upstream("Video not found"))
            .with_failure(ProviderOperation::Song, "down", ProviderError::unavailable("bridge down"))
            .with_failure(ProviderOperation::Song, "odd", ProviderError::upstream("bad shape")),
    );

    let cases = [
        ("slow", StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", "timeout fetching data"),
        ("gone", StatusCode::NOT_FOUND, "NOT_FOUND", "content not found"),
        ("down", StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", "bridge down"),
        ("odd", StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "bad shape"),
    ];
    for (id, status, code, message) in cases {
        let response = get(&app.router, &format!("/api/song/{id}")).await;
        assert_eq!(response.status, status, "{id}");
        assert_eq!(response.json()["error"], code, "{id}");
        assert_eq!(response.json()["message"], message, "{id}");
    }
    assert!(app.cache.is_empty());
}

#[tokio::test]
async fn charts_failure_is_soft() {
    let app = test_app(MockCatalogProvider::new().with_failure(
        ProviderOperation::Charts,
        "BR",
        ProviderError::upstream("boom"),
    ));

    let response = get(&app.router, "/api/charts?country=BR").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.cache_status(), Some("FALLBACK"));
    assert_eq!(
        response.json(),
        json!({
            "country": "BR",
            "videos": [],
            "trending": [],
            "message": "charts not available for BR",
        })
    );
    assert!(app.cache.is_empty());
}

#[tokio::test]
async fn artist_albums_failure_is_soft() {
    let app = test_app(MockCatalogProvider::new().with_failure(
        ProviderOperation::ArtistAlbums,
        fixtures::CHANNEL_ID,
        ProviderError::timeout("timed out"),
    ));

    let response = get(&app.router, &format!("/api/artist/{}/albums", fixtures::CHANNEL_ID)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "browseId": fixtures::CHANNEL_ID, "results": [], "params": null })
    );
}

#[tokio::test]
async fn missing_provider_is_unavailable() {
    let router = test_app_without_provider();

    for uri in ["/api/song/abc", "/api/charts", "/api/search?q=test"] {
        let response = get(&router, uri).await;
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(response.json()["error"], "SERVICE_UNAVAILABLE");
        assert_eq!(response.json()["message"], "provider not initialized");
    }

    let index = get(&router, "/").await;
    assert_eq!(index.status, StatusCode::OK);
    assert_eq!(index.json()["status"], "degraded");
    assert_eq!(index.json()["provider"], "error");

    let health = get(&router, "/health").await;
    assert_eq!(health.json(), json!({ "status": "healthy" }));
}

// ============================================================================
// ROUTE SHAPES
// ============================================================================

#[tokio::test]
async fn related_drops_seed_track() {
    let app = test_app(MockCatalogProvider::new().with_response(
        ProviderOperation::WatchPlaylist,
        "seed",
        fixtures::watch_playlist("seed", 5),
    ));

    let response = get(&app.router, "/api/song/seed/related").await;
    let body = response.json();
    assert_eq!(body["count"], 4);
    assert!(body["related"]
        .as_array()
        .unwrap()
        .iter()
        .all(|track| track["videoId"] != "seed"));
}

#[tokio::test]
async fn suggestions_are_wrapped() {
    let app = test_app(MockCatalogProvider::new().with_response(
        ProviderOperation::SearchSuggestions,
        "queen",
        fixtures::suggestions("queen"),
    ));

    let body = get(&app.router, "/api/search/suggestions?q=queen").await.json();
    assert_eq!(body["query"], "queen");
    assert_eq!(body["suggestions"][0], "queen live");
}

#[tokio::test]
async fn index_lists_endpoints() {
    let app = test_app(MockCatalogProvider::new());
    let body = get(&app.router, "/").await.json();
    assert_eq!(body["service"], "SoundPulse Web API");
    assert_eq!(body["status"], "online");
    assert_eq!(body["provider"], "initialized");
    assert_eq!(body["endpoints"]["health"], "/health");
}

#[tokio::test]
async fn unknown_path_is_json_not_found() {
    let app = test_app(MockCatalogProvider::new());
    let response = get(&app.router, "/api/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let body = response.json();
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "endpoint not found");
    assert_eq!(body["details"]["path"], "/api/nope");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_text() {
    let app = test_app(MockCatalogProvider::new().with_response(
        ProviderOperation::Lyrics,
        "MPLYt_x",
        json!({ "lyrics": "la la" }),
    ));
    get(&app.router, "/api/lyrics/MPLYt_x").await;

    let response = get(&app.router, "/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    let text = String::from_utf8(response.body).unwrap();
    assert!(text.contains("soundpulse_http_requests_total"));
}
