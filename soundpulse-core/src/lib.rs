//! SoundPulse Core - Shared Types
//!
//! Route identities, the catalog provider seam, artist identity types and the
//! error taxonomy. No I/O lives here; every other crate depends on this one.

pub mod error;
pub mod identity;
pub mod provider;
pub mod route;

pub use error::{
    ConfigError, ProviderError, ProviderErrorKind, ProviderResult, PulseError, PulseResult,
    ValidationError,
};
pub use identity::{
    non_empty_str, ArtistIdShape, ArtistIdentity, ReturnedIds, BROWSE_ID_PREFIX,
    CHANNEL_ID_LEN, CHANNEL_ID_PREFIX,
};
pub use provider::{CatalogProvider, ProviderOperation};
pub use route::{CacheTtlConfig, RouteId};

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
