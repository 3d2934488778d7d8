//! SoundPulse Storage - Response Cache
//!
//! Process-lifetime, in-memory storage for provider responses. Nothing here
//! touches disk; a restart starts from an empty cache.

pub mod cache;

pub use cache::{
    CacheBackend, CacheEntry, CacheKey, CachePayload, CacheRead, CacheStats, Clock,
    InMemoryCacheBackend, ManualClock, ResponseCache, SystemClock,
};
