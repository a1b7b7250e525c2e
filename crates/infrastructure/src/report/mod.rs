//! Run reporters.
//!
//! Render a finished [`RunReport`] for people (TAP, the format tape prints)
//! or for machines (JSON).

mod json;
mod tap;

use std::fmt;
use std::str::FromStr;

use hello_domain::RunReport;
use serde::{Deserialize, Serialize};

pub use json::JsonReporter;
pub use tap::TapReporter;

/// Errors raised while rendering a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The requested format is not known.
    #[error("unsupported report format: {0}")]
    UnsupportedFormat(String),

    /// The report could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Output format of a run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Test Anything Protocol, version 13.
    #[default]
    Tap,
    /// Pretty-printed JSON.
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap => f.write_str("tap"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tap" => Ok(Self::Tap),
            "json" => Ok(Self::Json),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Renders `report` in `format`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(format: ReportFormat, report: &RunReport) -> Result<String, ReportError> {
    match format {
        ReportFormat::Tap => Ok(TapReporter::new().render(report)),
        ReportFormat::Json => JsonReporter::new().render(report),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_formats() {
        assert_eq!("TAP".parse::<ReportFormat>().unwrap(), ReportFormat::Tap);
        assert_eq!(
            " json ".parse::<ReportFormat>().unwrap(),
            ReportFormat::Json
        );
        assert!(matches!(
            "xml".parse::<ReportFormat>(),
            Err(ReportError::UnsupportedFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn default_is_tap() {
        assert_eq!(ReportFormat::default(), ReportFormat::Tap);
        assert_eq!(ReportFormat::Json.to_string(), "json");
    }
}
