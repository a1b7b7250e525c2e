//! HTTP exchange
//!
//! The request/response pair produced by one simulated call. Exchanges are
//! ephemeral: they live until the case that issued them has asserted on them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::request::HttpMethod;

/// A completed request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpExchange {
    /// Method that was sent.
    pub method: HttpMethod,
    /// Path that was requested.
    pub path: String,
    /// Status code received.
    pub status: u16,
    /// Response headers in wire order. Names are lowercase.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Raw response body.
    #[serde(default)]
    pub body: Vec<u8>,
    /// Time between dispatch and the full body being read.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl HttpExchange {
    /// Creates a new exchange.
    #[must_use]
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        status: u16,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            status,
            headers,
            body,
            duration,
        }
    }

    /// Returns the body as text. Invalid UTF-8 is replaced.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Gets the first header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the Content-Type header, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Short form used in logs and failure messages, e.g. `GET / -> 200`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} {} -> {}", self.method, self.path, self.status)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
