//! Error types for the Pixshop application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Pixshop application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Variant identity is the
/// dispatch key; message text is diagnostic payload only.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PixshopError {
    /// No authenticated access to the generation API is configured.
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    /// The requested operation needs a source image and none is available.
    #[error("Missing source image: {0}")]
    MissingSource(String),

    /// A generation request is already in flight.
    #[error("A generation request is already in flight")]
    Busy,

    /// The downstream generation service failed.
    #[error("Generation service error: {message}")]
    Service {
        /// HTTP status, when the failure surfaced as an HTTP error.
        status: Option<u16>,
        message: String,
        /// Whether a later retry could plausibly succeed (rate limit, 5xx).
        retryable: bool,
    },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PixshopError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an AuthenticationRequired error
    pub fn authentication_required(message: impl Into<String>) -> Self {
        Self::AuthenticationRequired(message.into())
    }

    /// Creates a MissingSource error
    pub fn missing_source(message: impl Into<String>) -> Self {
        Self::MissingSource(message.into())
    }

    /// Creates a non-retryable Service error with no HTTP status
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            status: None,
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an AuthenticationRequired error
    pub fn is_authentication_required(&self) -> bool {
        matches!(self, Self::AuthenticationRequired(_))
    }

    /// Check if this is a MissingSource error
    pub fn is_missing_source(&self) -> bool {
        matches!(self, Self::MissingSource(_))
    }

    /// Check if this is a Busy error
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// Check if this is a Service error
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this error indicates a file/entity was not found.
    ///
    /// Returns true for:
    /// - `NotFound` errors
    /// - `Io` errors with "not found" in the message
    pub fn is_not_found_or_missing(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io { message } => message.to_lowercase().contains("not found"),
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PixshopError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PixshopError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PixshopError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PixshopError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (transitional, should be removed eventually)
impl From<anyhow::Error> for PixshopError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, PixshopError>`.
pub type Result<T> = std::result::Result<T, PixshopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_predicates() {
        assert!(PixshopError::Busy.is_busy());
        assert!(PixshopError::authentication_required("no key").is_authentication_required());
        assert!(PixshopError::missing_source("no image").is_missing_source());
        assert!(PixshopError::service("boom").is_service());
        assert!(!PixshopError::service("boom").is_busy());
    }

    #[test]
    fn test_not_found_or_missing() {
        assert!(PixshopError::not_found("preset", "abc").is_not_found_or_missing());
        assert!(PixshopError::io("File not found: session.json").is_not_found_or_missing());
        assert!(!PixshopError::io("permission denied").is_not_found_or_missing());
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PixshopError = io_err.into();
        assert!(err.is_io());
    }

    #[test]
    fn test_service_error_display() {
        let err = PixshopError::Service {
            status: Some(429),
            message: "rate limited".to_string(),
            retryable: true,
        };
        assert!(err.to_string().contains("rate limited"));
    }
}
