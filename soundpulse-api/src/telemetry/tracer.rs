//! Tracing Subscriber Initialization
//!
//! Installs the global `tracing` subscriber: an `EnvFilter` driven by
//! `RUST_LOG` and a fmt layer emitting either JSON lines or human-readable
//! text.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ApiError, ApiResult};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "soundpulse_api=debug,tower_http=debug,info";

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to startup logs
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (production, staging, development)
    pub environment: String,
    /// Emit JSON log lines instead of text
    pub log_json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl TelemetryConfig {
    /// Environment variables:
    /// - `SOUNDPULSE_SERVICE_NAME` (default: "soundpulse-api")
    /// - `SOUNDPULSE_SERVICE_VERSION` (default: crate version)
    /// - `SOUNDPULSE_ENVIRONMENT` (default: "development")
    /// - `SOUNDPULSE_LOG_JSON`: "true"/"1" for JSON output (default: JSON outside development)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment =
            lookup("SOUNDPULSE_ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let log_json = lookup("SOUNDPULSE_LOG_JSON")
            .map(|s| s == "true" || s == "1")
            .unwrap_or_else(|| environment != "development");

        Self {
            service_name: lookup("SOUNDPULSE_SERVICE_NAME")
                .unwrap_or_else(|| "soundpulse-api".to_string()),
            service_version: lookup("SOUNDPULSE_SERVICE_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            environment,
            log_json,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Must be called once at startup, before any spans are created. A second
/// call fails because a global subscriber is already installed.
pub fn init_tracing(config: &TelemetryConfig) -> ApiResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    result.map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;

    tracing::info!(
        service_name = %config.service_name,
        service_version = %config.service_version,
        environment = %config.environment,
        log_json = config.log_json,
        "Telemetry initialized"
    );

    Ok(())
}
