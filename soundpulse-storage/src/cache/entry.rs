//! Stored entries and what a cache read hands back.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Shared, immutable response document.
///
/// Every hit for a key hands out the same allocation, so repeated reads are
/// byte-identical by construction.
pub type CachePayload = Arc<Value>;

/// One stored response. Replaced wholesale, never mutated.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: CachePayload,
    stored_at: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    pub fn new(value: CachePayload, stored_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            stored_at,
            ttl,
        }
    }

    pub fn value(&self) -> &CachePayload {
        &self.value
    }

    pub fn stored_at(&self) -> DateTime<Utc> {
        self.stored_at
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Age at `now`. A clock that went backwards yields zero.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.stored_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Fresh while `age < ttl`; a zero TTL is never fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.age(now) < self.ttl
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        TimeDelta::from_std(self.ttl)
            .ok()
            .and_then(|ttl| self.stored_at.checked_add_signed(ttl))
    }
}

/// Result of a cache hit, carrying staleness metadata.
#[derive(Debug, Clone)]
pub struct CacheRead {
    value: CachePayload,
    stored_at: DateTime<Utc>,
    age: Duration,
}

impl CacheRead {
    pub(crate) fn from_entry(entry: CacheEntry, now: DateTime<Utc>) -> Self {
        let age = entry.age(now);
        Self {
            value: entry.value,
            stored_at: entry.stored_at,
            age,
        }
    }

    pub fn value(&self) -> &CachePayload {
        &self.value
    }

    pub fn into_value(self) -> CachePayload {
        self.value
    }

    pub fn stored_at(&self) -> DateTime<Utc> {
        self.stored_at
    }

    pub fn age(&self) -> Duration {
        self.age
    }
}
