//! TAP reporter.
//!
//! Output follows TAP version 13 as tape prints it: a `#` comment line per
//! case, one numbered `ok` / `not ok` line per assertion with a YAML block
//! under failures, and a summary after the plan line.

use hello_domain::{AssertionRecord, CaseOutcome, CaseReport, RunReport};

/// Renders a run report as TAP.
#[derive(Debug, Default, Clone, Copy)]
pub struct TapReporter;

impl TapReporter {
    /// Creates a TAP reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders the report.
    #[must_use]
    pub fn render(&self, report: &RunReport) -> String {
        let mut lines = vec!["TAP version 13".to_string()];
        let mut number = 0usize;
        let mut passed = 0usize;
        let mut failed = 0usize;

        for case in &report.cases {
            if case.outcome == CaseOutcome::Skipped {
                lines.push(format!("# SKIP {}", case.name));
                continue;
            }
            lines.push(format!("# {}", case.name));

            for record in &case.assertions {
                number += 1;
                if record.ok {
                    passed += 1;
                } else {
                    failed += 1;
                }
                push_assertion(&mut lines, number, record);
            }

            if let Some(note) = harness_failure(case) {
                number += 1;
                failed += 1;
                lines.push(format!("not ok {number} {note}"));
                lines.push("  ---".to_string());
                lines.push("    operator: fail".to_string());
                lines.push("  ...".to_string());
            }
        }

        lines.push(String::new());
        lines.push(format!("1..{number}"));
        lines.push(format!("# tests {number}"));
        lines.push(format!("# pass  {passed}"));
        if failed > 0 {
            lines.push(format!("# fail  {failed}"));
        } else {
            lines.push(String::new());
            lines.push("# ok".to_string());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn push_assertion(lines: &mut Vec<String>, number: usize, record: &AssertionRecord) {
    if record.ok {
        lines.push(format!("ok {number} {}", record.message));
        return;
    }
    lines.push(format!("not ok {number} {}", record.message));
    lines.push("  ---".to_string());
    lines.push(format!("    operator: {}", record.operator));
    if let Some(expected) = &record.expected {
        lines.push(format!("    expected: {expected}"));
    }
    if let Some(actual) = &record.actual {
        lines.push(format!("    actual:   {actual}"));
    }
    lines.push("  ...".to_string());
}

/// A line for failures that no assertion accounts for.
fn harness_failure(case: &CaseReport) -> Option<String> {
    match case.outcome {
        CaseOutcome::TimedOut { after_ms } => Some(
            case.diagnostic
                .clone()
                .unwrap_or_else(|| format!("test timed out after {after_ms}ms")),
        ),
        CaseOutcome::Failed => case.diagnostic.clone(),
        CaseOutcome::Passed | CaseOutcome::Skipped => None,
    }
}
