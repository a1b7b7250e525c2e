//! HTTP client port

use async_trait::async_trait;
use hello_domain::{HttpExchange, RequestSpec};

/// Errors raised while performing a request, before any expectation is
/// checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpClientError {
    /// The request did not complete within its timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that was exceeded.
        timeout_ms: u64,
    },

    /// Nothing is listening where the application was expected.
    #[error("connection refused: {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be read.
    #[error("failed to read body: {0}")]
    Body(String),

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// Port for performing a request against the application under test.
///
/// Adapters decide how the application is reached: through an in-process
/// router or over a socket.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes a request and returns the completed exchange.
    ///
    /// Non-2xx statuses are not errors at this level; they are reported in
    /// the exchange and left to expectations.
    ///
    /// # Errors
    ///
    /// Returns an error if the application cannot be reached, the request
    /// cannot be built, or the response cannot be read in time.
    async fn execute(&self, request: &RequestSpec) -> Result<HttpExchange, HttpClientError>;
}
