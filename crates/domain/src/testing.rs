//! Expectations and case configuration.
//!
//! Expectations are declared on a request before it is sent and checked
//! against the resulting exchange. Case options configure how the harness
//! runs a single test case.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A check declared against the response of a simulated request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Check response status code.
    Status {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check header exists and optionally its exact value.
    Header {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value.
        value: Option<String>,
    },
    /// Check header value matches a regex.
    HeaderMatches {
        /// Header name.
        name: String,
        /// Regex pattern.
        pattern: String,
    },
    /// Check body text is exactly the expected value.
    BodyEquals {
        /// Expected body text.
        expected: String,
    },
    /// Check body text contains a fragment.
    BodyContains {
        /// Text to search for.
        text: String,
    },
    /// Check body text matches a regex.
    BodyMatches {
        /// Regex pattern.
        pattern: String,
    },
}

impl Expectation {
    /// Get a human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Status { expected } => format!("status {}", expected.description()),
            Self::Header {
                name,
                value: Some(v),
            } => format!("header '{name}' equals '{v}'"),
            Self::Header { name, value: None } => format!("header '{name}' exists"),
            Self::HeaderMatches { name, pattern } => format!("header '{name}' matches /{pattern}/"),
            Self::BodyEquals { expected } => format!("body equals {expected:?}"),
            Self::BodyContains { text } => format!("body contains {text:?}"),
            Self::BodyMatches { pattern } => format!("body matches /{pattern}/"),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Inclusive range of status codes.
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of several status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => code.to_string(),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes.join(", "))
            }
        }
    }

    /// Any 2xx status.
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

impl From<u16> for StatusExpectation {
    fn from(code: u16) -> Self {
        Self::Exact(code)
    }
}

/// Result of checking one expectation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpectationResult {
    /// The expectation that was checked.
    pub expectation: Expectation,
    /// Whether it held.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl ExpectationResult {
    /// Create a passed result with the value that satisfied it.
    #[must_use]
    pub fn pass(expectation: Expectation, actual: impl Into<String>) -> Self {
        Self {
            expectation,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result without an actual value.
    #[must_use]
    pub fn fail(expectation: Expectation, error: impl Into<String>) -> Self {
        Self {
            expectation,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        expectation: Expectation,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            expectation,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }
}

/// Per-case configuration given at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOptions {
    /// Longest the case may run before it is reported as timed out.
    /// `None` falls back to the harness default.
    #[serde(
        default,
        with = "optional_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
    /// Skip the case entirely.
    #[serde(default)]
    pub skip: bool,
}

impl CaseOptions {
    /// Options with a timeout in milliseconds.
    #[must_use]
    pub const fn timeout_ms(millis: u64) -> Self {
        Self {
            timeout: Some(Duration::from_millis(millis)),
            skip: false,
        }
    }

    /// Options for a skipped case.
    #[must_use]
    pub const fn skipped() -> Self {
        Self {
            timeout: None,
            skip: true,
        }
    }
}

mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation, clippy::ref_option)]
    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
