//! Constants for SoundPulse API
//!
//! Centralizing constants makes them easy to find, modify, and test.

// ============================================================================
// SERVER
// ============================================================================

/// Default bind host
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Service name reported by the index endpoint
pub const SERVICE_DISPLAY_NAME: &str = "SoundPulse Web API";

// ============================================================================
// CORS
// ============================================================================

/// Default CORS max age in seconds (24 hours)
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86400;

// ============================================================================
// CATALOG PROVIDER
// ============================================================================

/// Default provider request timeout in seconds
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;

// ============================================================================
// QUERY DEFAULTS
// ============================================================================

/// Default search filter
pub const DEFAULT_SEARCH_FILTER: &str = "songs";

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Default number of artist albums
pub const DEFAULT_ARTIST_ALBUMS_LIMIT: u32 = 50;

/// Default number of playlist tracks
pub const DEFAULT_PLAYLIST_LIMIT: u32 = 100;

/// Default watch playlist length
pub const DEFAULT_WATCH_LIMIT: u32 = 25;

/// Watch playlist length requested for related songs
pub const RELATED_WATCH_LIMIT: u32 = 25;

/// Default number of home shelves
pub const DEFAULT_HOME_LIMIT: u32 = 20;

/// Default charts country (global)
pub const DEFAULT_CHARTS_COUNTRY: &str = "ZZ";

// ============================================================================
// BACKGROUND JOBS
// ============================================================================

/// Default cache sweep interval in seconds (0 = disabled)
pub const DEFAULT_CACHE_SWEEP_INTERVAL_SECS: u64 = 0;
