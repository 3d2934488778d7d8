//! API Configuration Module
//!
//! Configuration for CORS, response compression and the catalog provider
//! bridge. Everything is loaded from environment variables with defaults
//! suitable for local development.

use std::time::Duration;

use crate::constants::{DEFAULT_CORS_MAX_AGE_SECS, DEFAULT_PROVIDER_TIMEOUT_SECS};

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// HTTP surface configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Whether responses are gzip-compressed when the client accepts it.
    pub compression_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: DEFAULT_CORS_MAX_AGE_SECS,
            compression_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `SOUNDPULSE_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `SOUNDPULSE_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `SOUNDPULSE_COMPRESSION`: "true" or "false" (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values fall back to
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cors_origins = lookup("SOUNDPULSE_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = lookup("SOUNDPULSE_CORS_MAX_AGE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CORS_MAX_AGE_SECS);

        let compression_enabled = lookup("SOUNDPULSE_COMPRESSION")
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);

        Self {
            cors_origins,
            cors_max_age_secs,
            compression_enabled,
        }
    }

    /// True when only configured origins are allowed.
    pub fn is_restricted(&self) -> bool {
        !self.cors_origins.is_empty()
    }
}

// ============================================================================
// PROVIDER CONFIGURATION
// ============================================================================

/// Catalog provider bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Base URL of the JSON bridge. `None` means no provider is configured.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }
}

impl ProviderConfig {
    /// Create ProviderConfig from environment variables.
    ///
    /// Environment variables:
    /// - `SOUNDPULSE_PROVIDER_URL`: Base URL of the catalog bridge (no default)
    /// - `SOUNDPULSE_PROVIDER_TIMEOUT_SECS`: Request timeout (default: 15)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("SOUNDPULSE_PROVIDER_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let timeout = Duration::from_secs(
            lookup("SOUNDPULSE_PROVIDER_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS),
        );

        Self { base_url, timeout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::from_lookup(lookup(&[]));
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.cors_max_age_secs, 86400);
        assert!(config.compression_enabled);
        assert!(!config.is_restricted());
    }

    #[test]
    fn test_cors_origins_parsing() {
        let config = ApiConfig::from_lookup(lookup(&[(
            "SOUNDPULSE_CORS_ORIGINS",
            "https://soundpulse.app, ,https://www.soundpulse.app",
        )]));
        assert_eq!(
            config.cors_origins,
            vec!["https://soundpulse.app", "https://www.soundpulse.app"]
        );
        assert!(config.is_restricted());
    }

    #[test]
    fn test_compression_toggle() {
        let config = ApiConfig::from_lookup(lookup(&[("SOUNDPULSE_COMPRESSION", "FALSE")]));
        assert!(!config.compression_enabled);
    }

    #[test]
    fn test_provider_config_defaults() {
        let config = ProviderConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ProviderConfig::default());
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_provider_url_normalized() {
        let config = ProviderConfig::from_lookup(lookup(&[
            ("SOUNDPULSE_PROVIDER_URL", " http://localhost:8000/ "),
            ("SOUNDPULSE_PROVIDER_TIMEOUT_SECS", "3"),
        ]));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.timeout, Duration::from_secs(3));

        let blank = ProviderConfig::from_lookup(lookup(&[("SOUNDPULSE_PROVIDER_URL", "  ")]));
        assert!(blank.base_url.is_none());
    }
}
