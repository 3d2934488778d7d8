//! Read-through response cache with per-call TTL.
//!
//! The TTL belongs to the caller (it is a property of the route), so the
//! cache itself has no configuration beyond its backend and clock.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::clock::{Clock, SystemClock};
use super::entry::{CacheEntry, CachePayload, CacheRead};
use super::key::CacheKey;
use super::memory_backend::InMemoryCacheBackend;
use super::traits::{CacheBackend, CacheStats};

/// Shared response cache.
///
/// Cloning is cheap and every clone sees the same entries and counters.
///
/// # Example
///
/// ```ignore
/// let cache = ResponseCache::in_memory();
/// let key = CacheKey::new(RouteId::Song).with_param("id", "abc");
///
/// if let Some(read) = cache.get(&key) {
///     return Ok(read.into_value());
/// }
/// let payload = cache.put(key, provider.song("abc").await?, Duration::from_secs(600));
/// ```
pub struct ResponseCache<C: CacheBackend = InMemoryCacheBackend> {
    backend: Arc<C>,
    clock: Arc<dyn Clock>,
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl ResponseCache<InMemoryCacheBackend> {
    /// In-memory cache on the wall clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCacheBackend::new()), Arc::new(SystemClock))
    }

    /// In-memory cache on a caller-supplied clock.
    pub fn in_memory_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(Arc::new(InMemoryCacheBackend::new()), clock)
    }
}

impl<C: CacheBackend> ResponseCache<C> {
    pub fn new(backend: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn backend(&self) -> &C {
        &self.backend
    }

    /// Look up a fresh entry. Expired entries read as absent and stay in
    /// place until overwritten or purged.
    pub fn get(&self, key: &CacheKey) -> Option<CacheRead> {
        let now = self.clock.now();
        match self.backend.get(key) {
            Some(entry) if entry.is_fresh(now) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(CacheRead::from_entry(entry, now))
            }
            _ => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// Returns the shared payload so the caller can respond with exactly
    /// what later hits will return.
    pub fn put(&self, key: CacheKey, value: Value, ttl: Duration) -> CachePayload {
        let payload: CachePayload = Arc::new(value);
        let entry = CacheEntry::new(Arc::clone(&payload), self.clock.now(), ttl);
        self.backend.put(key, entry);
        payload
    }

    /// Return the fresh entry for `key`, or run `fetch` and store its
    /// success. Errors are passed through and never stored.
    ///
    /// The boolean is `true` when the value came from the cache.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: CacheKey,
        ttl: Duration,
        fetch: F,
    ) -> Result<(CachePayload, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(read) = self.get(&key) {
            return Ok((read.into_value(), true));
        }
        let value = fetch().await?;
        Ok((self.put(key, value, ttl), false))
    }

    /// Drop every entry. Returns the number removed.
    pub fn clear(&self) -> usize {
        let removed = self.backend.clear();
        self.counters
            .evictions
            .fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    /// Drop entries that are no longer fresh. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let removed = self.backend.remove_where(&|_, entry| !entry.is_fresh(now));
        self.counters
            .evictions
            .fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    pub fn len(&self) -> usize {
        self.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            entry_count: self.backend.len() as u64,
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }
}

impl<C: CacheBackend> Clone for ResponseCache<C> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            clock: Arc::clone(&self.clock),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl<C: CacheBackend> std::fmt::Debug for ResponseCache<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("backend", &self.backend.name())
            .field("entries", &self.backend.len())
            .field("clock", &self.clock)
            .finish()
    }
}
