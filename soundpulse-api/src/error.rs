//! HTTP error outcomes
//!
//! Every failure on the request path ends up as one [`ApiError`]: a stable
//! [`ErrorCode`], a message, a UTC timestamp and optional details. Provider
//! failures are translated here, in `From<ProviderError>`.
//!
//! Wire shape:
//! `{"error": "<CODE>", "message": "...", "timestamp": "...", "details"?: {...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use soundpulse_core::{
    ConfigError, ProviderError, ProviderErrorKind, PulseError, ValidationError,
};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Stable error taxonomy. One status code per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Required query parameter is missing
    MissingParameter,

    /// Parameter is present but malformed
    InvalidInput,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested catalog object (or endpoint) does not exist
    NotFound,

    // ========================================================================
    // Server Errors (500, 503, 504)
    // ========================================================================
    /// Catalog provider did not answer in time
    Timeout,

    /// Catalog provider is not initialized or cannot be reached
    ServiceUnavailable,

    /// Any other failure
    InternalError,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::MissingParameter | ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message used when the caller supplies none.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::MissingParameter => "Required query parameter is missing",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::NotFound => "content not found",
            ErrorCode::Timeout => "timeout fetching data",
            ErrorCode::ServiceUnavailable => "provider not initialized",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// JSON error body returned by every failing route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    #[serde(rename = "error")]
    pub code: ErrorCode,

    pub message: String,

    /// When the error was produced (UTC)
    pub timestamp: DateTime<Utc>,

    /// Structured context, e.g. the offending parameter or path
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            timestamp: Utc::now(),
            details: None,
        }
    }

    /// Error carrying the code's default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Constructors for the outcomes the routes produce
    // ========================================================================

    /// 400 naming the absent query parameter.
    pub fn missing_parameter(name: &str) -> Self {
        Self::new(
            ErrorCode::MissingParameter,
            format!("Query parameter \"{}\" is required", name),
        )
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// 404 for a catalog object the provider does not know.
    pub fn not_found() -> Self {
        Self::from_code(ErrorCode::NotFound)
    }

    /// 404 for a path no route matches.
    pub fn endpoint_not_found(path: &str) -> Self {
        Self::new(ErrorCode::NotFound, "endpoint not found")
            .with_details(serde_json::json!({ "path": path }))
    }

    pub fn timeout() -> Self {
        Self::from_code(ErrorCode::Timeout)
    }

    /// 503 when the provider failed to initialize at startup.
    pub fn provider_unavailable() -> Self {
        Self::from_code(ErrorCode::ServiceUnavailable)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Lets handlers return `ApiResult<T>` directly.
///
/// ```ignore
/// async fn handler() -> ApiResult<Json<Value>> {
///     Err(ApiError::missing_parameter("q"))
/// }
/// ```
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

/// Translate a provider failure into exactly one HTTP outcome.
///
/// Typed kinds decide first; the "not found" / "timeout" text heuristic only
/// applies to untyped upstream failures.
impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err.effective_kind() {
            ProviderErrorKind::NotFound => {
                tracing::debug!(detail = %err.detail, "Provider reported not found");
                ApiError::not_found()
            }
            ProviderErrorKind::Timeout => {
                tracing::warn!(detail = %err.detail, "Provider timed out");
                ApiError::timeout()
            }
            ProviderErrorKind::Unavailable => {
                tracing::warn!(detail = %err.detail, "Provider unavailable");
                ApiError::service_unavailable(err.detail)
            }
            ProviderErrorKind::Upstream => {
                tracing::error!(detail = %err.detail, "Provider failure");
                ApiError::internal_error(err.detail)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::MissingParameter { name } => ApiError::missing_parameter(name),
            ValidationError::InvalidParameter { name, .. } => {
                ApiError::invalid_input(err.to_string())
                    .with_details(serde_json::json!({ "parameter": name }))
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal_error(format!("Configuration error: {}", err))
    }
}

impl From<PulseError> for ApiError {
    fn from(err: PulseError) -> Self {
        match err {
            PulseError::Provider(e) => e.into(),
            PulseError::Validation(e) => e.into(),
            PulseError::Config(e) => e.into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!(error = %err, "Payload serialization failed");
        ApiError::internal_error(format!("payload serialization failed: {}", err))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

pub type ApiResult<T> = Result<T, ApiError>;
