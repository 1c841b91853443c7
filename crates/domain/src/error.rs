//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The HTTP method is not allowed for the request type.
    #[error("method {method} is not allowed for {request_type} requests")]
    MethodNotAllowed {
        /// The rejected method.
        method: String,
        /// The request type that rejected it.
        request_type: String,
    },

    /// An imported configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
