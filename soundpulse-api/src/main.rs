//! SoundPulse API Server Entry Point
//!
//! Loads configuration from the environment, connects the catalog provider
//! bridge and starts the Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use soundpulse_api::constants::{DEFAULT_BIND_HOST, DEFAULT_PORT};
use soundpulse_api::jobs::{cache_sweep_task, CacheSweepConfig};
use soundpulse_api::telemetry::{init_tracing, TelemetryConfig};
use soundpulse_api::{
    create_api_router, ApiCache, ApiConfig, ApiError, ApiResult, AppState, HttpCatalogProvider,
    ProviderConfig,
};
use soundpulse_core::{CacheTtlConfig, CatalogProvider};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let api_config = ApiConfig::from_env();
    let provider_config = ProviderConfig::from_env();
    let ttls = CacheTtlConfig::from_env()?;
    let sweep_config = CacheSweepConfig::from_env();

    let provider: Option<Arc<dyn CatalogProvider>> =
        match HttpCatalogProvider::from_config(&provider_config) {
            Some(provider) => {
                tracing::info!(
                    base_url = %provider.base_url(),
                    timeout_secs = provider_config.timeout.as_secs(),
                    "Catalog provider initialized"
                );
                Some(Arc::new(provider))
            }
            None => {
                tracing::warn!(
                    "Catalog provider not initialized (set SOUNDPULSE_PROVIDER_URL); catalog routes will answer 503"
                );
                None
            }
        };

    let state = AppState::new(provider, ApiCache::in_memory(), ttls);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweep_handle = sweep_config
        .is_enabled()
        .then(|| tokio::spawn(cache_sweep_task(state.cache.clone(), sweep_config, shutdown_rx)));

    let app: Router = create_api_router(state, &api_config);

    let addr = resolve_bind_addr(|key| std::env::var(key).ok())?;
    tracing::info!(
        %addr,
        service = %telemetry_config.service_name,
        version = %telemetry_config.service_version,
        "Starting SoundPulse API server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    let _ = shutdown_tx.send(true);
    if let Some(handle) = sweep_handle {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Cache sweep task did not shut down cleanly");
        }
    }

    Ok(())
}

/// Bind address from `SOUNDPULSE_API_BIND` and `PORT` (or
/// `SOUNDPULSE_API_PORT`).
fn resolve_bind_addr<F>(lookup: F) -> ApiResult<SocketAddr>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("SOUNDPULSE_API_BIND").unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());
    let port_str = lookup("PORT")
        .or_else(|| lookup("SOUNDPULSE_API_PORT"))
        .unwrap_or_else(|| DEFAULT_PORT.to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
