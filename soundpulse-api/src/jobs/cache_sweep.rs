//! Cache Sweep Background Task
//!
//! Expiry in the response cache is lazy: an expired entry reads as absent
//! but keeps its memory until the same key is fetched again. This task
//! periodically purges expired entries so that keys which are never
//! requested again do not accumulate.
//!
//! Disabled unless `SOUNDPULSE_CACHE_SWEEP_SECS` is set to a non-zero value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::constants::DEFAULT_CACHE_SWEEP_INTERVAL_SECS;
use crate::state::ApiCache;
use crate::telemetry::metrics;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the cache sweep task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSweepConfig {
    /// Time between sweeps. Zero disables the task.
    pub interval: Duration,
}

impl Default for CacheSweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_CACHE_SWEEP_INTERVAL_SECS),
        }
    }
}

impl CacheSweepConfig {
    /// Create CacheSweepConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `SOUNDPULSE_CACHE_SWEEP_SECS`: Seconds between sweeps (default: 0, disabled)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let interval = Duration::from_secs(
            lookup("SOUNDPULSE_CACHE_SWEEP_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_CACHE_SWEEP_INTERVAL_SECS),
        );
        Self { interval }
    }

    pub fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// Counters for sweep activity since startup.
#[derive(Debug, Default)]
pub struct CacheSweepMetrics {
    pub sweep_cycles: AtomicU64,
    pub entries_purged: AtomicU64,
}

impl CacheSweepMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CacheSweepSnapshot {
        CacheSweepSnapshot {
            sweep_cycles: self.sweep_cycles.load(Ordering::Relaxed),
            entries_purged: self.entries_purged.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of sweep metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSweepSnapshot {
    pub sweep_cycles: u64,
    pub entries_purged: u64,
}

// ============================================================================
// BACKGROUND TASK
// ============================================================================

/// Purge expired cache entries every `config.interval` until shutdown.
///
/// Returns immediately when the sweep is disabled.
pub async fn cache_sweep_task(
    cache: ApiCache,
    config: CacheSweepConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Arc<CacheSweepMetrics> {
    let sweep_metrics = Arc::new(CacheSweepMetrics::new());

    if !config.is_enabled() {
        tracing::debug!("Cache sweep disabled");
        return sweep_metrics;
    }

    let mut sweep_interval = interval(config.interval);
    sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        interval_secs = config.interval.as_secs(),
        "Cache sweep task started"
    );

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    tracing::info!("Cache sweep task shutting down");
                    break;
                }
            }

            _ = sweep_interval.tick() => {
                sweep_once(&cache, &sweep_metrics);
            }
        }
    }

    let snapshot = sweep_metrics.snapshot();
    tracing::info!(
        sweep_cycles = snapshot.sweep_cycles,
        entries_purged = snapshot.entries_purged,
        "Cache sweep task completed"
    );

    sweep_metrics
}

fn sweep_once(cache: &ApiCache, sweep_metrics: &CacheSweepMetrics) {
    let purged = cache.purge_expired();
    sweep_metrics.sweep_cycles.fetch_add(1, Ordering::Relaxed);
    sweep_metrics
        .entries_purged
        .fetch_add(purged as u64, Ordering::Relaxed);

    let remaining = cache.len();
    if let Some(m) = metrics() {
        m.set_cache_entries(remaining);
    }

    if purged > 0 {
        tracing::debug!(purged, remaining, "Purged expired cache entries");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use soundpulse_core::RouteId;
    use soundpulse_storage::{CacheKey, ManualClock};

    #[test]
    fn test_config_default_is_disabled() {
        let config = CacheSweepConfig::from_lookup(|_| None);
        assert_eq!(config, CacheSweepConfig::default());
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_config_from_lookup() {
        let config = CacheSweepConfig::from_lookup(|key| {
            (key == "SOUNDPULSE_CACHE_SWEEP_SECS").then(|| "300".to_string())
        });
        assert_eq!(config.interval, Duration::from_secs(300));
        assert!(config.is_enabled());

        let garbage = CacheSweepConfig::from_lookup(|_| Some("often".to_string()));
        assert!(!garbage.is_enabled());
    }

    #[test]
    fn test_sweep_once_counts_purged() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = ApiCache::in_memory_with_clock(clock.clone());
        cache.put(
            CacheKey::new(RouteId::Song).with_param("id", "a"),
            json!(1),
            Duration::from_secs(5),
        );
        cache.put(
            CacheKey::new(RouteId::Song).with_param("id", "b"),
            json!(2),
            Duration::from_secs(500),
        );
        clock.advance(Duration::from_secs(10));

        let sweep_metrics = CacheSweepMetrics::new();
        sweep_once(&cache, &sweep_metrics);

        assert_eq!(
            sweep_metrics.snapshot(),
            CacheSweepSnapshot {
                sweep_cycles: 1,
                entries_purged: 1,
            }
        );
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_task_returns_immediately() {
        let (_tx, rx) = watch::channel(false);
        let sweep_metrics =
            cache_sweep_task(ApiCache::in_memory(), CacheSweepConfig::default(), rx).await;
        assert_eq!(sweep_metrics.snapshot().sweep_cycles, 0);
    }

    #[tokio::test]
    async fn test_task_sweeps_until_shutdown() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = ApiCache::in_memory_with_clock(clock.clone());
        cache.put(
            CacheKey::new(RouteId::Home).with_param("limit", "20"),
            json!([]),
            Duration::from_secs(1),
        );
        clock.advance(Duration::from_secs(2));

        let (tx, rx) = watch::channel(false);
        let config = CacheSweepConfig {
            interval: Duration::from_millis(10),
        };
        let handle = tokio::spawn(cache_sweep_task(cache.clone(), config, rx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();
        let sweep_metrics = handle.await.unwrap();

        let snapshot = sweep_metrics.snapshot();
        assert!(snapshot.sweep_cycles >= 1);
        assert_eq!(snapshot.entries_purged, 1);
        assert!(cache.is_empty());
    }
}
