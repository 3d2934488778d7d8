//! Error types for SoundPulse operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Category of a catalog provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// The requested object does not exist upstream.
    NotFound,
    /// The provider did not answer in time.
    Timeout,
    /// The provider could not be reached at all.
    Unavailable,
    /// Any other upstream failure.
    Upstream,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderErrorKind::NotFound => "not_found",
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::Unavailable => "unavailable",
            ProviderErrorKind::Upstream => "upstream",
        };
        f.write_str(label)
    }
}

/// Failure raised by a [`crate::CatalogProvider`] operation.
///
/// Providers should pick a precise `kind` whenever they know it. Providers that
/// only have an error message can fall back to [`ProviderError::classify`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{detail}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub detail: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NotFound, detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, detail)
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, detail)
    }

    pub fn upstream(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Upstream, detail)
    }

    /// Build an error from free text, inferring the kind from its content.
    ///
    /// Matching is case-insensitive: "not found" wins over "timeout"/"timed out",
    /// and anything else is an upstream failure.
    pub fn classify(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let kind = infer_kind(&detail);
        Self { kind, detail }
    }

    /// Kind after applying the text heuristic to untyped upstream failures.
    ///
    /// Typed kinds are returned unchanged.
    pub fn effective_kind(&self) -> ProviderErrorKind {
        match self.kind {
            ProviderErrorKind::Upstream => infer_kind(&self.detail),
            kind => kind,
        }
    }
}

fn infer_kind(detail: &str) -> ProviderErrorKind {
    let lowered = detail.to_lowercase();
    if lowered.contains("not found") {
        ProviderErrorKind::NotFound
    } else if lowered.contains("timeout") || lowered.contains("timed out") {
        ProviderErrorKind::Timeout
    } else {
        ProviderErrorKind::Upstream
    }
}

/// Request validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Query parameter \"{name}\" is required")]
    MissingParameter { name: String },

    #[error("Invalid value for \"{name}\": {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all SoundPulse errors.
#[derive(Debug, Clone, Error)]
pub enum PulseError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for catalog provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result type alias for SoundPulse operations.
pub type PulseResult<T> = Result<T, PulseError>;

// =============================================================================
// TESTS
// =============================================================================
