//! Route identities and their cache validity windows.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// Every cached catalog route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteId {
    Search,
    SearchSuggestions,
    Song,
    SongRelated,
    Lyrics,
    Artist,
    ArtistAlbums,
    Album,
    Playlist,
    Watch,
    Charts,
    Home,
    MoodCategories,
    MoodPlaylists,
}

impl RouteId {
    pub const ALL: [RouteId; 14] = [
        RouteId::Search,
        RouteId::SearchSuggestions,
        RouteId::Song,
        RouteId::SongRelated,
        RouteId::Lyrics,
        RouteId::Artist,
        RouteId::ArtistAlbums,
        RouteId::Album,
        RouteId::Playlist,
        RouteId::Watch,
        RouteId::Charts,
        RouteId::Home,
        RouteId::MoodCategories,
        RouteId::MoodPlaylists,
    ];

    /// Stable snake_case name, used in cache keys, metrics labels and env vars.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteId::Search => "search",
            RouteId::SearchSuggestions => "search_suggestions",
            RouteId::Song => "song",
            RouteId::SongRelated => "song_related",
            RouteId::Lyrics => "lyrics",
            RouteId::Artist => "artist",
            RouteId::ArtistAlbums => "artist_albums",
            RouteId::Album => "album",
            RouteId::Playlist => "playlist",
            RouteId::Watch => "watch",
            RouteId::Charts => "charts",
            RouteId::Home => "home",
            RouteId::MoodCategories => "mood_categories",
            RouteId::MoodPlaylists => "mood_playlists",
        }
    }

    /// Default validity window for cached responses of this route.
    pub fn default_ttl(&self) -> Duration {
        let secs = match self {
            RouteId::SearchSuggestions => 300,
            RouteId::Song | RouteId::SongRelated | RouteId::Watch | RouteId::Home => 600,
            RouteId::Artist => 600,
            RouteId::Playlist => 900,
            RouteId::Album | RouteId::ArtistAlbums | RouteId::MoodPlaylists => 1800,
            RouteId::Search | RouteId::Lyrics | RouteId::Charts => 3600,
            RouteId::MoodCategories => 7200,
        };
        Duration::from_secs(secs)
    }

    /// Environment variable that overrides this route's TTL.
    pub fn ttl_env_var(&self) -> String {
        format!("SOUNDPULSE_TTL_{}_SECS", self.as_str().to_uppercase())
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TTL CONFIGURATION
// ============================================================================

/// Per-route cache TTL table.
///
/// TTL belongs to the route, never to the store: the dispatcher looks the
/// route up here and hands the duration to the cache on every `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheTtlConfig {
    ttls: HashMap<RouteId, Duration>,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            ttls: RouteId::ALL
                .iter()
                .map(|route| (*route, route.default_ttl()))
                .collect(),
        }
    }
}

impl CacheTtlConfig {
    /// Load defaults, then apply `SOUNDPULSE_TTL_<ROUTE>_SECS` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CacheTtlConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for route in RouteId::ALL {
            let key = route.ttl_env_var();
            if let Some(raw) = lookup(&key) {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    field: key.clone(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                config.ttls.insert(route, Duration::from_secs(secs));
            }
        }
        Ok(config)
    }

    /// Replace the TTL for one route.
    pub fn with_ttl(mut self, route: RouteId, ttl: Duration) -> Self {
        self.ttls.insert(route, ttl);
        self
    }

    pub fn ttl_for(&self, route: RouteId) -> Duration {
        self.ttls
            .get(&route)
            .copied()
            .unwrap_or_else(|| route.default_ttl())
    }
}
