//! Domain error types
//!
//! This module defines the error hierarchy for Medtally.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Medtally error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum MedTallyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Procurement API errors
    #[error("Order source error: {0}")]
    Source(#[from] SourceError),

    /// Quantity coercion errors
    #[error("Quantity error: {0}")]
    Quantity(#[from] QuantityFormatError),

    /// Output (CSV) errors
    #[error("Output error: {0}")]
    Output(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Procurement API errors
///
/// Errors that occur when talking to the purchase-order API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to connect to the API
    #[error("Failed to connect to procurement API: {0}")]
    ConnectionFailed(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Order not found
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl SourceError {
    /// Whether retrying the request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SourceError::ConnectionFailed(_)
                | SourceError::RateLimitExceeded(_)
                | SourceError::ServerError { .. }
                | SourceError::Timeout(_)
        )
    }
}

/// A quantity value that is not a floating-point literal once commas
/// have been turned into periods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quantity '{raw}'")]
pub struct QuantityFormatError {
    /// The offending value, as rendered before comma replacement
    pub raw: String,
}

impl QuantityFormatError {
    /// Creates a new quantity format error
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for MedTallyError {
    fn from(err: std::io::Error) -> Self {
        MedTallyError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MedTallyError {
    fn from(err: serde_json::Error) -> Self {
        MedTallyError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MedTallyError {
    fn from(err: toml::de::Error) -> Self {
        MedTallyError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for MedTallyError {
    fn from(err: csv::Error) -> Self {
        MedTallyError::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medtally_error_display() {
        let err = MedTallyError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_source_error_conversion() {
        let source_err = SourceError::ConnectionFailed("Network error".to_string());
        let err: MedTallyError = source_err.into();
        assert!(matches!(err, MedTallyError::Source(_)));
    }

    #[test]
    fn test_quantity_error_conversion() {
        let err: MedTallyError = QuantityFormatError::new("abc").into();
        assert!(matches!(err, MedTallyError::Quantity(_)));
        assert_eq!(err.to_string(), "Quantity error: invalid quantity 'abc'");
    }

    #[test]
    fn test_source_error_retryable() {
        assert!(SourceError::Timeout("60s".to_string()).is_retryable());
        assert!(SourceError::ServerError {
            status: 503,
            message: "unavailable".to_string()
        }
        .is_retryable());
        assert!(!SourceError::ClientError {
            status: 401,
            message: "bad ticket".to_string()
        }
        .is_retryable());
        assert!(!SourceError::InvalidResponse("not json".to_string()).is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: MedTallyError = io_err.into();
        assert!(matches!(err, MedTallyError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: MedTallyError = json_err.into();
        assert!(matches!(err, MedTallyError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: MedTallyError = toml_err.into();
        assert!(matches!(err, MedTallyError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = MedTallyError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
        let err = SourceError::Timeout("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
