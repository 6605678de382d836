//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout Duckgate.
//! All errors are structured and map to stable error codes.
//!
//! # Error Categories
//! - `ConfigError`: Contradictory or incomplete inputs, detected before any I/O
//! - `ConnectionFailed`: Failures while establishing or attaching a database
//! - `QueryFailed`: Statement execution errors on an otherwise healthy client

use thiserror::Error;

/// Main error type for Duckgate operations
#[derive(Error, Debug)]
pub enum DuckgateError {
    /// Invalid or contradictory configuration (no I/O was attempted)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Database connection or attachment failed during initialization
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),
}

impl DuckgateError {
    /// Convert error to a stable error code string
    ///
    /// Error codes are stable and suitable for programmatic handling.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::QueryFailed(_) => "QUERY_FAILED",
        }
    }

    /// Get the human-readable error message
    ///
    /// Carries the underlying engine message verbatim; credentials never
    /// appear in error text.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }
}

/// Result type alias for Duckgate operations
pub type Result<T> = std::result::Result<T, DuckgateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DuckgateError::config_error("test").error_code(), "CONFIG_ERROR");
        assert_eq!(DuckgateError::connection_failed("test").error_code(), "CONNECTION_FAILED");
        assert_eq!(DuckgateError::query_failed("test").error_code(), "QUERY_FAILED");
    }

    #[test]
    fn test_error_messages() {
        let err = DuckgateError::config_error("missing motherduck token");
        assert!(err.message().contains("missing motherduck token"));

        let err = DuckgateError::connection_failed("connection timeout");
        assert!(err.message().contains("connection timeout"));
    }

    #[test]
    fn test_error_constructors() {
        let err = DuckgateError::config_error("test");
        assert!(matches!(err, DuckgateError::ConfigError(_)));

        let err = DuckgateError::connection_failed("test");
        assert!(matches!(err, DuckgateError::ConnectionFailed(_)));

        let err = DuckgateError::query_failed("test");
        assert!(matches!(err, DuckgateError::QueryFailed(_)));
    }
}
