//! Background Jobs for the SoundPulse API
//!
//! - `cache_sweep`: Drops expired response cache entries
//!
//! # Usage
//!
//! ```ignore
//! use soundpulse_api::jobs::{cache_sweep_task, CacheSweepConfig};
//! use tokio::sync::watch;
//!
//! let (shutdown_tx, shutdown_rx) = watch::channel(false);
//! let config = CacheSweepConfig::from_env();
//! if config.is_enabled() {
//!     tokio::spawn(cache_sweep_task(state.cache.clone(), config, shutdown_rx));
//! }
//!
//! // On shutdown
//! let _ = shutdown_tx.send(true);
//! ```

pub mod cache_sweep;

pub use cache_sweep::{cache_sweep_task, CacheSweepConfig, CacheSweepMetrics, CacheSweepSnapshot};
