//! JSON reporter.

use hello_domain::RunReport;

use super::ReportError;

/// Renders a run report as pretty-printed JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReporter;

impl JsonReporter {
    /// Creates a JSON reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders the report.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Serialization` if the report cannot be
    /// serialized.
    pub fn render(&self, report: &RunReport) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
