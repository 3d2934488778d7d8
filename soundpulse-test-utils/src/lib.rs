//! SoundPulse Test Utilities
//!
//! Shared test infrastructure for the SoundPulse workspace:
//! - A scriptable mock catalog provider with call recording
//! - JSON fixtures shaped like provider documents
//! - Proptest generators for identifiers and queries

// Re-export core types for convenience
pub use soundpulse_core::{
    CatalogProvider, ProviderError, ProviderErrorKind, ProviderOperation, ProviderResult,
};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

// ============================================================================
// MOCK PROVIDER
// ============================================================================

/// One recorded provider invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub operation: ProviderOperation,
    /// Named arguments in call order. Absent optional arguments are omitted.
    pub args: Vec<(&'static str, String)>,
}

impl RecordedCall {
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

type Script = VecDeque<ProviderResult<Value>>;

/// Mock catalog provider for testing (async).
///
/// Responses are scripted per operation and "subject" (the operation's main
/// identifier: the query for searches, the id for lookups, the country for
/// charts, the params token for mood playlists, empty for home and mood
/// categories). A subject may have several queued results; they are consumed
/// in order and the last one repeats. Unscripted calls fall back to the
/// operation-wide default, then to a NotFound error.
#[derive(Debug, Default)]
pub struct MockCatalogProvider {
    scripts: Mutex<HashMap<(ProviderOperation, String), Script>>,
    defaults: Mutex<HashMap<ProviderOperation, ProviderResult<Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCatalogProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for `operation(subject)`.
    pub fn with_response(
        self,
        operation: ProviderOperation,
        subject: impl Into<String>,
        value: Value,
    ) -> Self {
        self.push(operation, subject.into(), Ok(value));
        self
    }

    /// Queue a failure for `operation(subject)`.
    pub fn with_failure(
        self,
        operation: ProviderOperation,
        subject: impl Into<String>,
        error: ProviderError,
    ) -> Self {
        self.push(operation, subject.into(), Err(error));
        self
    }

    /// Result for any subject without its own script.
    pub fn with_default(self, operation: ProviderOperation, result: ProviderResult<Value>) -> Self {
        lock(&self.defaults).insert(operation, result);
        self
    }

    /// Total calls to `operation`.
    pub fn call_count(&self, operation: ProviderOperation) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    /// Total calls across all operations.
    pub fn total_calls(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Recorded calls to `operation`, oldest first.
    pub fn calls_for(&self, operation: ProviderOperation) -> Vec<RecordedCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.operation == operation)
            .cloned()
            .collect()
    }

    pub fn reset_calls(&self) {
        lock(&self.calls).clear();
    }

    fn push(&self, operation: ProviderOperation, subject: String, result: ProviderResult<Value>) {
        lock(&self.scripts)
            .entry((operation, subject))
            .or_default()
            .push_back(result);
    }

    fn answer(
        &self,
        operation: ProviderOperation,
        subject: &str,
        args: Vec<(&'static str, String)>,
    ) -> ProviderResult<Value> {
        lock(&self.calls).push(RecordedCall { operation, args });

        let mut scripts = lock(&self.scripts);
        if let Some(queue) = scripts.get_mut(&(operation, subject.to_string())) {
            if queue.len() > 1 {
                if let Some(next) = queue.pop_front() {
                    return next;
                }
            }
            if let Some(last) = queue.front() {
                return last.clone();
            }
        }
        drop(scripts);

        match lock(&self.defaults).get(&operation) {
            Some(result) => result.clone(),
            None => Err(ProviderError::not_found(format!(
                "{} not found: {}",
                operation, subject
            ))),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl CatalogProvider for MockCatalogProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str, filter: &str, limit: u32) -> ProviderResult<Value> {
        self.answer(
            ProviderOperation::Search,
            query,
            vec![
                ("query", query.to_string()),
                ("filter", filter.to_string()),
                ("limit", limit.to_string()),
            ],
        )
    }

    async fn search_suggestions(&self, query: &str) -> ProviderResult<Value> {
        self.answer(
            ProviderOperation::SearchSuggestions,
            query,
            vec![("query", query.to_string())],
        )
    }

    async fn song(&self, video_id: &str) -> ProviderResult<Value> {
        self.answer(
            ProviderOperation::Song,
            video_id,
            vec![("video_id", video_id.to_string())],
        )
    }

    async fn lyrics(&self, browse_id: &str) -> ProviderResult<Value> {
        self.answer(
            ProviderOperation::Lyrics,
            browse_id,
            vec![("browse_id", browse_id.to_string())],
        )
    }

    async fn artist(&self, channel_id: &str) -> ProviderResult<Value> {
        self.answer(
            ProviderOperation::Artist,
            channel_id,
            vec![("channel_id", channel_id.to_string())],
        )
    }

    async fn artist_albums(
        &self,
        channel_id: &str,
        params: Option<&str>,
        limit: u32,
    ) -> ProviderResult<Value> {
        let mut args = vec![("channel_id", channel_id.to_string())];
        if let Some(params) = params {
            args.push(("params", params.to_string()));
        }
        args.push(("limit", limit.to_string()));
        self.answer(ProviderOperation::ArtistAlbums, channel_id, args)
    }

    async fn album(&self, browse_id: &str) -> ProviderResult<Value> {
        self.answer(
            ProviderOperation::Album,
            browse_id,
            vec![("browse_id", browse_id.to_string())],
        )
    }

    async fn playlist(&self, playlist_id: &str, limit: u32) -> ProviderResult<Value> {
        self.answer(
            ProviderOperation::Playlist,
            playlist_id,
            vec![
                ("playlist_id", playlist_id.to_string()),
                ("limit", limit.to_string()),
            ],
        )
    }

    async fn watch_playlist(
        &self,
        video_id: &str,
        limit: u32,
        playlist_id: Option<&str>,
    ) -> ProviderResult<Value> {
        let mut args = vec![
            ("video_id", video_id.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(playlist_id) = playlist_id {
            args.push(("playlist_id", playlist_id.to_string()));
        }
        self.answer(ProviderOperation::WatchPlaylist, video_id, args)
    }

    async fn charts(&self, country: &str) -> ProviderResult<Value> {
        self.answer(
            ProviderOperation::Charts,
            country,
            vec![("country", country.to_string())],
        )
    }

    async fn home(&self, limit: u32) -> ProviderResult<Value> {
        self.answer(
            ProviderOperation::Home,
            "",
            vec![("limit", limit.to_string())],
        )
    }

    async fn mood_categories(&self) -> ProviderResult<Value> {
        self.answer(ProviderOperation::MoodCategories, "", Vec::new())
    }

    async fn mood_playlists(&self, params: &str) -> ProviderResult<Value> {
        self.answer(
            ProviderOperation::MoodPlaylists,
            params,
            vec![("params", params.to_string())],
        )
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Provider-shaped JSON documents.

    use serde_json::{json, Value};

    /// A valid channel-style artist id (24 chars, `UC` prefix).
    pub const CHANNEL_ID: &str = "UCmMUZbaYdNH0bEd1PAlAqsA";

    /// A second channel-style id, used as the drifted id.
    pub const OTHER_CHANNEL_ID: &str = "UC9vrvNSL3xcWGSkV86REBSg";

    /// A browse-style id.
    pub const BROWSE_ID: &str = "MPREb_4pL8gzRtw1p";

    /// `n` song search results.
    pub fn search_results(n: usize) -> Value {
        Value::Array(
            (0..n)
                .map(|i| {
                    json!({
                        "resultType": "song",
                        "videoId": format!("video{i:03}"),
                        "title": format!("Track {i}"),
                        "artists": [{ "name": "Test Artist", "id": CHANNEL_ID }],
                        "duration": "3:30"
                    })
                })
                .collect(),
        )
    }

    pub fn suggestions(query: &str) -> Value {
        json!([format!("{query} live"), format!("{query} remix"), format!("{query} lyrics")])
    }

    pub fn song(video_id: &str) -> Value {
        json!({
            "videoDetails": {
                "videoId": video_id,
                "title": "Test Song",
                "author": "Test Artist",
                "lengthSeconds": "210"
            }
        })
    }

    /// An artist record carrying the given ids. `None` fields are omitted.
    pub fn artist(
        name: &str,
        channel_id: Option<&str>,
        browse_id: Option<&str>,
        id: Option<&str>,
    ) -> Value {
        let mut record = json!({
            "name": name,
            "description": format!("{name} is a test artist"),
            "songs": { "results": [] }
        });
        if let Some(map) = record.as_object_mut() {
            if let Some(channel_id) = channel_id {
                map.insert("channelId".into(), json!(channel_id));
            }
            if let Some(browse_id) = browse_id {
                map.insert("browseId".into(), json!(browse_id));
            }
            if let Some(id) = id {
                map.insert("id".into(), json!(id));
            }
        }
        record
    }

    pub fn artist_albums(n: usize) -> Value {
        json!({
            "results": (0..n)
                .map(|i| json!({ "title": format!("Album {i}"), "browseId": format!("MPREb_album{i}") }))
                .collect::<Vec<_>>()
        })
    }

    /// A watch playlist of `n` tracks; the first is the seed track.
    pub fn watch_playlist(seed: &str, n: usize) -> Value {
        let tracks: Vec<Value> = (0..n)
            .map(|i| {
                let video_id = if i == 0 {
                    seed.to_string()
                } else {
                    format!("{seed}-next{i}")
                };
                json!({ "videoId": video_id, "title": format!("Up next {i}") })
            })
            .collect();
        json!({ "tracks": tracks, "playlistId": format!("RDAMVM{seed}") })
    }

    pub fn charts(country: &str) -> Value {
        json!({
            "countries": { "selected": { "text": country } },
            "videos": [{ "title": "Top video", "playlistId": "PLchart" }],
            "trending": [{ "title": "Trending", "videoId": "trend1" }]
        })
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for identifiers and queries.

    use proptest::prelude::*;

    /// A channel-style artist id: `UC` + 22 id characters.
    pub fn arb_channel_id() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_-]{22}".prop_map(|tail| format!("UC{tail}"))
    }

    /// A browse-style id.
    pub fn arb_browse_id() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_]{8,20}".prop_map(|tail| format!("MPRE{tail}"))
    }

    /// An id matching neither recognized shape.
    pub fn arb_unrecognized_id() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,30}".prop_filter("must not look like a browse id", |id| {
            !id.starts_with("MPRE")
        })
    }

    pub fn arb_query() -> impl Strategy<Value = String> {
        "[a-z]{1,12}( [a-z]{1,12}){0,3}"
    }

    pub fn arb_limit() -> impl Strategy<Value = u32> {
        1u32..=200
    }
}
