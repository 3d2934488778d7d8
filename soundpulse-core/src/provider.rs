//! Catalog provider seam.
//!
//! The proxy never interprets provider documents beyond the few artist
//! identity fields; everything else is passed through as `serde_json::Value`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::ProviderResult;

/// Operations exposed by the catalog provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOperation {
    Search,
    SearchSuggestions,
    Song,
    Lyrics,
    Artist,
    ArtistAlbums,
    Album,
    Playlist,
    WatchPlaylist,
    Charts,
    Home,
    MoodCategories,
    MoodPlaylists,
}

impl ProviderOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderOperation::Search => "search",
            ProviderOperation::SearchSuggestions => "search_suggestions",
            ProviderOperation::Song => "song",
            ProviderOperation::Lyrics => "lyrics",
            ProviderOperation::Artist => "artist",
            ProviderOperation::ArtistAlbums => "artist_albums",
            ProviderOperation::Album => "album",
            ProviderOperation::Playlist => "playlist",
            ProviderOperation::WatchPlaylist => "watch_playlist",
            ProviderOperation::Charts => "charts",
            ProviderOperation::Home => "home",
            ProviderOperation::MoodCategories => "mood_categories",
            ProviderOperation::MoodPlaylists => "mood_playlists",
        }
    }
}

impl fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External music catalog.
///
/// Implementations must be thread-safe; one instance is shared by every
/// request for the lifetime of the process.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn search(&self, query: &str, filter: &str, limit: u32) -> ProviderResult<Value>;

    async fn search_suggestions(&self, query: &str) -> ProviderResult<Value>;

    async fn song(&self, video_id: &str) -> ProviderResult<Value>;

    async fn lyrics(&self, browse_id: &str) -> ProviderResult<Value>;

    async fn artist(&self, channel_id: &str) -> ProviderResult<Value>;

    async fn artist_albums(
        &self,
        channel_id: &str,
        params: Option<&str>,
        limit: u32,
    ) -> ProviderResult<Value>;

    async fn album(&self, browse_id: &str) -> ProviderResult<Value>;

    async fn playlist(&self, playlist_id: &str, limit: u32) -> ProviderResult<Value>;

    /// "Up next" queue seeded by a track. The first track is the seed itself.
    async fn watch_playlist(
        &self,
        video_id: &str,
        limit: u32,
        playlist_id: Option<&str>,
    ) -> ProviderResult<Value>;

    async fn charts(&self, country: &str) -> ProviderResult<Value>;

    async fn home(&self, limit: u32) -> ProviderResult<Value>;

    async fn mood_categories(&self) -> ProviderResult<Value>;

    async fn mood_playlists(&self, params: &str) -> ProviderResult<Value>;
}
