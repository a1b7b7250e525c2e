//! Server error types

use thiserror::Error;

/// Errors raised while configuring or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Host and port do not form a socket address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
