//! Prometheus metrics
//!
//! HTTP traffic, cache lookups and provider calls, registered once in the
//! default registry and exposed at `/metrics`.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Encoder, Gauge,
    HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Provider call latency buckets (seconds), up to the default client timeout
const PROVIDER_LATENCY_BUCKETS: &[f64] =
    &[0.010, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0, 15.0];

/// Global metrics instance - initialized once at startup
pub static METRICS: Lazy<ApiResult<SoundPulseMetrics>> = Lazy::new(SoundPulseMetrics::new);

/// Registered metrics, or `None` if registration failed (already logged).
pub fn metrics() -> Option<&'static SoundPulseMetrics> {
    METRICS.as_ref().ok()
}

/// Container for all SoundPulse metrics.
#[derive(Clone)]
pub struct SoundPulseMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Cache lookup counter - labels: route, outcome (hit/miss)
    pub cache_lookups_total: CounterVec,

    /// Provider call counter - labels: operation, outcome
    pub provider_calls_total: CounterVec,

    /// Provider call duration histogram - labels: operation
    pub provider_call_duration_seconds: HistogramVec,

    /// Entries currently held by the response cache (expired ones included)
    pub cache_entries: Gauge,
}

fn registration_failed(name: &'static str) -> impl Fn(prometheus::Error) -> ApiError {
    move |e| ApiError::internal_error(format!("failed to register {}: {}", name, e))
}

impl SoundPulseMetrics {
    /// Register every metric in the default registry.
    pub fn new() -> ApiResult<Self> {
        let metrics = Self {
            http_requests_total: register_counter_vec!(
                "soundpulse_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(registration_failed("http_requests_total"))?,

            http_request_duration_seconds: register_histogram_vec!(
                "soundpulse_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(registration_failed("http_request_duration_seconds"))?,

            cache_lookups_total: register_counter_vec!(
                "soundpulse_cache_lookups_total",
                "Total number of response cache lookups",
                &["route", "outcome"]
            )
            .map_err(registration_failed("cache_lookups_total"))?,

            provider_calls_total: register_counter_vec!(
                "soundpulse_provider_calls_total",
                "Total number of catalog provider calls",
                &["operation", "outcome"]
            )
            .map_err(registration_failed("provider_calls_total"))?,

            provider_call_duration_seconds: register_histogram_vec!(
                "soundpulse_provider_call_duration_seconds",
                "Catalog provider call duration in seconds",
                &["operation"],
                PROVIDER_LATENCY_BUCKETS.to_vec()
            )
            .map_err(registration_failed("provider_call_duration_seconds"))?,

            cache_entries: register_gauge!(
                "soundpulse_cache_entries",
                "Current number of entries in the response cache"
            )
            .map_err(registration_failed("cache_entries"))?,
        };
        Ok(metrics)
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a cache lookup for a route.
    pub fn record_cache_lookup(&self, route: &str, hit: bool) {
        let outcome = if hit { "hit" } else { "miss" };
        self.cache_lookups_total
            .with_label_values(&[route, outcome])
            .inc();
    }

    /// Record a provider call. `outcome` is `ok` or the failure kind.
    pub fn record_provider_call(&self, operation: &str, outcome: &str, duration_secs: f64) {
        self.provider_calls_total
            .with_label_values(&[operation, outcome])
            .inc();
        self.provider_call_duration_seconds
            .with_label_values(&[operation])
            .observe(duration_secs);
    }

    /// Set the cache entry gauge.
    pub fn set_cache_entries(&self, count: usize) {
        self.cache_entries.set(count as f64);
    }
}

/// GET /metrics - Prometheus text exposition
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
)]
pub async fn metrics_handler() -> impl IntoResponse {
    // Touch the registry so the families exist even before the first request.
    let _ = metrics();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
