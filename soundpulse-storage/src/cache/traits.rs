//! Cache backend trait and statistics.

use super::entry::CacheEntry;
use super::key::CacheKey;

/// Cache backend trait for pluggable storage of entries.
///
/// Backends store and return whole entries; freshness is judged by
/// [`super::ResponseCache`], not by the backend. Implementations must be
/// thread-safe and must never expose a partially written entry.
///
/// Methods are synchronous: a backend must not block on I/O or hold a lock
/// long enough to stall the async runtime.
pub trait CacheBackend: Send + Sync {
    /// A name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Get the stored entry for `key`, fresh or not.
    fn get(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Insert or replace the entry for `key`.
    fn put(&self, key: CacheKey, entry: CacheEntry);

    /// Remove every entry matching `predicate`. Returns how many were removed.
    fn remove_where(&self, predicate: &dyn Fn(&CacheKey, &CacheEntry) -> bool) -> usize;

    /// Remove everything. Returns how many entries were removed.
    fn clear(&self) -> usize;

    /// Number of stored entries, expired ones included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses (absent or expired).
    pub misses: u64,
    /// Number of entries currently stored.
    pub entry_count: u64,
    /// Number of entries removed by flushes or expiry sweeps.
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.8).abs() < 0.001);

        let empty_stats = CacheStats::default();
        assert!((empty_stats.hit_rate() - 0.0).abs() < 0.001);
    }
}
