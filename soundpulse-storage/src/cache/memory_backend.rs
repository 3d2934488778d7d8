//! In-memory cache backend on a sharded concurrent map.

use dashmap::DashMap;

use super::entry::CacheEntry;
use super::key::CacheKey;
use super::traits::CacheBackend;

/// Process-lifetime backend. Grows with the number of distinct keys; only
/// [`CacheBackend::clear`] and [`CacheBackend::remove_where`] shrink it.
#[derive(Debug, Default)]
pub struct InMemoryCacheBackend {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl InMemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBackend for InMemoryCacheBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        // Clone out so the shard guard is released before returning.
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn put(&self, key: CacheKey, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }

    fn remove_where(&self, predicate: &dyn Fn(&CacheKey, &CacheEntry) -> bool) -> usize {
        let mut removed = 0;
        self.entries.retain(|key, entry| {
            let matched = predicate(key, entry);
            removed += usize::from(matched);
            !matched
        });
        removed
    }

    fn clear(&self) -> usize {
        self.remove_where(&|_, _| true)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use soundpulse_core::RouteId;
    use std::sync::Arc;
    use std::time::Duration;

    fn entry(n: i64) -> CacheEntry {
        CacheEntry::new(Arc::new(json!({ "n": n })), Utc::now(), Duration::from_secs(60))
    }

    #[test]
    fn test_put_replaces_whole_entry() {
        let backend = InMemoryCacheBackend::new();
        let key = CacheKey::new(RouteId::Home).with_param("limit", "20");
        backend.put(key.clone(), entry(1));
        backend.put(key.clone(), entry(2));

        assert_eq!(backend.len(), 1);
        let stored = backend.get(&key).unwrap();
        assert_eq!(stored.value()["n"], 2);
    }

    #[test]
    fn test_remove_where_counts_removed() {
        let backend = InMemoryCacheBackend::new();
        for i in 0..5 {
            backend.put(
                CacheKey::new(RouteId::Song).with_param("id", i.to_string()),
                entry(i),
            );
        }
        let removed = backend.remove_where(&|_, entry| entry.value()["n"].as_i64() < Some(2));
        assert_eq!(removed, 2);
        assert_eq!(backend.len(), 3);
    }

    #[test]
    fn test_remove_where_count_ignores_concurrent_inserts() {
        let backend = InMemoryCacheBackend::new();
        for i in 0..500 {
            backend.put(
                CacheKey::new(RouteId::Song).with_param("id", i.to_string()),
                entry(i),
            );
        }

        let removed = std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..2_000 {
                    backend.put(
                        CacheKey::new(RouteId::Home).with_param("limit", i.to_string()),
                        entry(i),
                    );
                }
            });
            backend.remove_where(&|key, _| key.route() == RouteId::Song)
        });

        assert_eq!(removed, 500);
        assert_eq!(backend.len(), 2_000);
    }

    #[test]
    fn test_clear_empties() {
        let backend = InMemoryCacheBackend::new();
        backend.put(CacheKey::new(RouteId::MoodCategories), entry(0));
        assert_eq!(backend.clear(), 1);
        assert!(backend.is_empty());
    }
}
