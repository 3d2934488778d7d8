//! Time-bounded response cache.
//!
//! Every cached catalog route stores its payload under a [`CacheKey`] built
//! from the route identity and its significant query parameters. Entries carry
//! their own TTL (chosen by the route) and expire lazily: an entry whose age
//! has reached its TTL is reported as absent by [`ResponseCache::get`] and is
//! replaced by the next `put` for the same key.
//!
//! # Concurrency
//!
//! The in-memory backend is a sharded concurrent map. A lookup racing a write
//! for the same key observes either the old or the new entry, never a torn
//! one. There is no single-flight de-duplication: two concurrent misses may
//! both fetch and both write.
//!
//! # Example
//!
//! ```ignore
//! let cache = ResponseCache::in_memory();
//! let key = CacheKey::new(RouteId::Search).with_param("q", "test");
//!
//! if let Some(read) = cache.get(&key) {
//!     return Ok(read.into_value());
//! }
//! let payload = cache.put(key, fetched, Duration::from_secs(3600));
//! ```

pub mod clock;
pub mod entry;
pub mod key;
pub mod memory_backend;
pub mod read_through;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, CachePayload, CacheRead};
pub use key::CacheKey;
pub use memory_backend::InMemoryCacheBackend;
pub use read_through::ResponseCache;
pub use traits::{CacheBackend, CacheStats};
