//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use soundpulse_core::{CacheTtlConfig, CatalogProvider};
use soundpulse_storage::ResponseCache;

use crate::dispatch::Dispatcher;

/// Response cache used by the API: in-memory backend, wall clock in
/// production and a manual clock in tests.
pub type ApiCache = ResponseCache;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Per-route orchestration over the provider and the cache.
    pub dispatcher: Arc<Dispatcher>,
    /// The same cache the dispatcher reads and writes. Exposed for the
    /// flush endpoint and the sweep job.
    pub cache: ApiCache,
    pub start_time: Instant,
}

impl AppState {
    /// Build state around an optional provider. `None` means the provider
    /// failed to initialize; catalog routes then answer 503.
    pub fn new(
        provider: Option<Arc<dyn CatalogProvider>>,
        cache: ApiCache,
        ttls: CacheTtlConfig,
    ) -> Self {
        let dispatcher = Dispatcher::new(provider, cache.clone(), ttls);
        Self {
            dispatcher: Arc::new(dispatcher),
            cache,
            start_time: Instant::now(),
        }
    }

    pub fn provider_ready(&self) -> bool {
        self.dispatcher.has_provider()
    }
}

crate::impl_from_ref!(Arc<Dispatcher>, dispatcher);
crate::impl_from_ref!(ApiCache, cache);
crate::impl_from_ref!(Instant, start_time);
