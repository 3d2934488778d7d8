//! SoundPulse API - Catalog Proxy HTTP Layer
//!
//! Axum server in front of an external music catalog. Every catalog request
//! goes through the [`dispatch::Dispatcher`] stage pipeline, which consults
//! the shared response cache before calling the provider and translates
//! provider failures into HTTP outcomes.

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod jobs;
pub mod macros;
pub mod openapi;
pub mod providers;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ApiConfig, ProviderConfig};
pub use dispatch::{
    CatalogQuery, CatalogRequest, DispatchOutcome, Dispatcher, FailurePolicy, PayloadSource,
    Stage,
};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use providers::HttpCatalogProvider;
pub use routes::create_api_router;
pub use services::{ArtistIdentityResolver, ResolvedArtist};
pub use state::{ApiCache, AppState};
