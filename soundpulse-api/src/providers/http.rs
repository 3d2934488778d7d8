//! HTTP catalog provider.
//!
//! Talks to a JSON bridge that exposes one `GET {base}/<operation>` endpoint
//! per provider operation, with query parameters named after the operation's
//! arguments.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use soundpulse_core::{CatalogProvider, ProviderError, ProviderOperation, ProviderResult};

use crate::config::ProviderConfig;

/// Catalog provider backed by the HTTP bridge.
pub struct HttpCatalogProvider {
    client: Client,
    base_url: Url,
}

impl HttpCatalogProvider {
    /// Build a provider from configuration.
    ///
    /// Returns `None` when no URL is configured, the URL does not parse, or
    /// the HTTP client cannot be built. Callers treat that as "provider failed
    /// to initialize".
    pub fn from_config(config: &ProviderConfig) -> Option<Self> {
        let raw = config.base_url.as_deref()?;

        let base_url = match Url::parse(&format!("{}/", raw)) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            Ok(url) => {
                tracing::error!(url = %raw, scheme = %url.scheme(), "Unsupported provider URL scheme");
                return None;
            }
            Err(e) => {
                tracing::error!(url = %raw, error = %e, "Invalid provider URL");
                return None;
            }
        };

        let client = match Client::builder().timeout(config.timeout).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build provider HTTP client");
                return None;
            }
        };

        Some(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    async fn call(
        &self,
        operation: ProviderOperation,
        params: &[(&str, String)],
    ) -> ProviderResult<Value> {
        let url = self.base_url.join(operation.as_str()).map_err(|e| {
            ProviderError::upstream(format!("Invalid URL for {}: {}", operation, e))
        })?;

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, body));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::timeout(format!("{} timed out reading body: {}", operation, e))
            } else {
                ProviderError::upstream(format!("Failed to parse {} response: {}", operation, e))
            }
        })
    }
}

/// Map a failed send to a provider error kind.
fn transport_error(operation: ProviderOperation, err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(format!("{} request timed out: {}", operation, err))
    } else if err.is_connect() {
        ProviderError::unavailable(format!("Cannot reach catalog bridge: {}", err))
    } else {
        ProviderError::classify(format!("{} request failed: {}", operation, err))
    }
}

/// Map a non-2xx bridge answer to a provider error kind.
fn status_error(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::NOT_FOUND => ProviderError::not_found(body),
        StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => ProviderError::timeout(body),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => {
            ProviderError::unavailable(body)
        }
        _ if body.trim().is_empty() => {
            ProviderError::upstream(format!("catalog bridge returned {}", status))
        }
        _ => ProviderError::classify(body),
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    fn name(&self) -> &str {
        "http-bridge"
    }

    async fn search(&self, query: &str, filter: &str, limit: u32) -> ProviderResult<Value> {
        self.call(
            ProviderOperation::Search,
            &[
                ("query", query.to_string()),
                ("filter", filter.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn search_suggestions(&self, query: &str) -> ProviderResult<Value> {
        self.call(
            ProviderOperation::SearchSuggestions,
            &[("query", query.to_string())],
        )
        .await
    }

    async fn song(&self, video_id: &str) -> ProviderResult<Value> {
        self.call(ProviderOperation::Song, &[("video_id", video_id.to_string())])
            .await
    }

    async fn lyrics(&self, browse_id: &str) -> ProviderResult<Value> {
        self.call(ProviderOperation::Lyrics, &[("browse_id", browse_id.to_string())])
            .await
    }

    async fn artist(&self, channel_id: &str) -> ProviderResult<Value> {
        self.call(ProviderOperation::Artist, &[("channel_id", channel_id.to_string())])
            .await
    }

    async fn artist_albums(
        &self,
        channel_id: &str,
        params: Option<&str>,
        limit: u32,
    ) -> ProviderResult<Value> {
        let mut query = vec![
            ("channel_id", channel_id.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(params) = params {
            query.push(("params", params.to_string()));
        }
        self.call(ProviderOperation::ArtistAlbums, &query).await
    }

    async fn album(&self, browse_id: &str) -> ProviderResult<Value> {
        self.call(ProviderOperation::Album, &[("browse_id", browse_id.to_string())])
            .await
    }

    async fn playlist(&self, playlist_id: &str, limit: u32) -> ProviderResult<Value> {
        self.call(
            ProviderOperation::Playlist,
            &[
                ("playlist_id", playlist_id.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn watch_playlist(
        &self,
        video_id: &str,
        limit: u32,
        playlist_id: Option<&str>,
    ) -> ProviderResult<Value> {
        let mut query = vec![
            ("video_id", video_id.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(playlist_id) = playlist_id {
            query.push(("playlist_id", playlist_id.to_string()));
        }
        self.call(ProviderOperation::WatchPlaylist, &query).await
    }

    async fn charts(&self, country: &str) -> ProviderResult<Value> {
        self.call(ProviderOperation::Charts, &[("country", country.to_string())])
            .await
    }

    async fn home(&self, limit: u32) -> ProviderResult<Value> {
        self.call(ProviderOperation::Home, &[("limit", limit.to_string())])
            .await
    }

    async fn mood_categories(&self) -> ProviderResult<Value> {
        self.call(ProviderOperation::MoodCategories, &[]).await
    }

    async fn mood_playlists(&self, params: &str) -> ProviderResult<Value> {
        self.call(ProviderOperation::MoodPlaylists, &[("params", params.to_string())])
            .await
    }
}

impl std::fmt::Debug for HttpCatalogProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogProvider")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
