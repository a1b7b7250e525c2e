//! Request specification
//!
//! Describes a single request sent against the application under test.
//! Requests are addressed by path only; the client adapter decides where
//! the application lives.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::HttpMethod;

use crate::error::{DomainError, DomainResult};

/// A request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name as given by the caller.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a header, validating its name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidHeaderName` when the name is empty or
    /// contains whitespace, control characters or a colon.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_graphic() && c != ':');
        if !valid {
            return Err(DomainError::InvalidHeaderName(name));
        }
        Ok(Self {
            name,
            value: value.into(),
        })
    }
}

/// A request against the application under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute path, including any query string.
    pub path: String,
    /// Headers in the order they were set.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Request body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Per-request timeout enforced by the client adapter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    /// Creates a request for `method` and `path`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPath` if `path` does not start with `/`.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> DomainResult<Self> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(DomainError::InvalidPath(path));
        }
        Ok(Self {
            method,
            path,
            headers: Vec::new(),
            body: None,
            timeout: None,
        })
    }

    /// Shorthand for a GET request.
    ///
    /// # Errors
    ///
    /// Same as [`RequestSpec::new`].
    pub fn get(path: impl Into<String>) -> DomainResult<Self> {
        Self::new(HttpMethod::Get, path)
    }

    /// Sets a header, replacing an existing one with the same name.
    pub fn set_header(&mut self, header: Header) {
        if let Some(existing) = self
            .headers
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case(&header.name))
        {
            existing.value = header.value;
        } else {
            self.headers.push(header);
        }
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns the body that should go on the wire for this method.
    #[must_use]
    pub fn effective_body(&self) -> Option<&str> {
        if self.method.carries_body() {
            self.body.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn path_must_be_absolute() {
        assert!(RequestSpec::get("/").is_ok());
        assert_eq!(
            RequestSpec::get("hello").unwrap_err(),
            DomainError::InvalidPath("hello".to_string())
        );
    }

    #[test]
    fn header_names_are_validated() {
        assert!(Header::new("X-Trace", "1").is_ok());
        assert!(Header::new("", "1").is_err());
        assert!(Header::new("Bad Name", "1").is_err());
        assert!(Header::new("Bad:Name", "1").is_err());
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut request = RequestSpec::get("/").unwrap();
        request.set_header(Header::new("Accept", "text/plain").unwrap());
        request.set_header(Header::new("accept", "application/json").unwrap());

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("ACCEPT"), Some("application/json"));
    }

    #[test]
    fn body_dropped_for_get() {
        let mut request = RequestSpec::get("/").unwrap();
        request.body = Some("ignored".to_string());
        assert_eq!(request.effective_body(), None);

        request.method = HttpMethod::Post;
        assert_eq!(request.effective_body(), Some("ignored"));
    }
}
