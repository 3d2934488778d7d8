//! Catalog Provider Implementations
//!
//! - `HttpCatalogProvider` - JSON bridge client used in production
//! - `observed` - wraps any provider call with metrics and a debug log
//!
//! The provider trait itself lives in `soundpulse_core::provider`.

mod http;

pub use http::HttpCatalogProvider;

use std::future::Future;
use std::time::Instant;

use serde_json::Value;
use soundpulse_core::{ProviderOperation, ProviderResult};

use crate::telemetry::metrics;

/// Outcome label for a successful provider call.
const OUTCOME_OK: &str = "ok";

/// Await a provider call, recording its duration and outcome.
///
/// The outcome label is `ok` or the effective error kind
/// (`not_found`, `timeout`, `unavailable`, `upstream`).
pub async fn observed<F>(operation: ProviderOperation, call: F) -> ProviderResult<Value>
where
    F: Future<Output = ProviderResult<Value>>,
{
    let start = Instant::now();
    let result = call.await;
    let elapsed = start.elapsed();

    let outcome = match &result {
        Ok(_) => OUTCOME_OK.to_string(),
        Err(e) => e.effective_kind().to_string(),
    };

    if let Some(m) = metrics() {
        m.record_provider_call(operation.as_str(), &outcome, elapsed.as_secs_f64());
    }

    tracing::debug!(
        operation = %operation,
        outcome = %outcome,
        duration_ms = elapsed.as_millis() as u64,
        "Provider call finished"
    );

    result
}
