//! # Store Error Types
//!
//! Typed errors for the fallible edges of souq-pricing: loading storefront
//! configuration and talking to upstream settings / exchange-rate services.
//!
//! The pricing engine and settings adapter never return these; they degrade
//! to zero-valued results instead.

use thiserror::Error;

/// Core error type for settings, storefront and upstream operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration errors (missing env vars, bad storefront file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Storefront not registered or inactive
    #[error("Storefront not found: {site_id}")]
    StorefrontNotFound { site_id: String },

    /// No settings provider registered for a storefront
    #[error("No settings provider for storefront: {site_id}")]
    ProviderMissing { site_id: String },

    /// Upstream service answered with an error status
    #[error("Upstream error [{service}]: HTTP {status}: {message}")]
    Upstream {
        service: String,
        status: u16,
        message: String,
    },

    /// Network/HTTP error reaching an upstream service
    #[error("Network error: {0}")]
    Network(String),

    /// Exchange-rate lookups are not configured
    #[error("Exchange rates are not configured")]
    FxDisabled,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Network(_) => true,
            StoreError::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Configuration(_) => 500,
            StoreError::InvalidRequest(_) => 400,
            StoreError::StorefrontNotFound { .. } => 404,
            StoreError::ProviderMissing { .. } => 500,
            StoreError::Upstream { .. } => 502,
            StoreError::Network(_) => 503,
            StoreError::FxDisabled => 503,
            StoreError::Serialization(_) => 502,
            StoreError::Internal(_) => 500,
        }
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Configuration(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
