//! Shared HTTP test harness: a full router over a scripted provider and a
//! manually driven clock.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use soundpulse_api::{create_api_router, ApiCache, ApiConfig, AppState};
use soundpulse_core::{CacheTtlConfig, CatalogProvider};
use soundpulse_storage::ManualClock;
use soundpulse_test_utils::MockCatalogProvider;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MockCatalogProvider>,
    pub clock: Arc<ManualClock>,
    pub cache: ApiCache,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn cache_status(&self) -> Option<&str> {
        self.headers.get("x-cache").and_then(|v| v.to_str().ok())
    }
}

pub fn test_app(provider: MockCatalogProvider) -> TestApp {
    test_app_with_ttls(provider, CacheTtlConfig::default())
}

pub fn test_app_with_ttls(provider: MockCatalogProvider, ttls: CacheTtlConfig) -> TestApp {
    let provider = Arc::new(provider);
    let clock = Arc::new(ManualClock::starting_now());
    let cache = ApiCache::in_memory_with_clock(clock.clone());
    let state = AppState::new(
        Some(provider.clone() as Arc<dyn CatalogProvider>),
        cache.clone(),
        ttls,
    );
    TestApp {
        router: create_api_router(state, &ApiConfig::default()),
        provider,
        clock,
        cache,
    }
}

/// Router whose provider failed to initialize.
pub fn test_app_without_provider() -> Router {
    let state = AppState::new(None, ApiCache::in_memory(), CacheTtlConfig::default());
    create_api_router(state, &ApiConfig::default())
}

pub async fn send(router: &Router, method: Method, uri: &str) -> TestResponse {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable")
        .to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, Method::GET, uri).await
}

pub async fn post(router: &Router, uri: &str) -> TestResponse {
    send(router, Method::POST, uri).await
}
