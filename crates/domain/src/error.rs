//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request path is not absolute.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A header name is empty or contains invalid characters.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
