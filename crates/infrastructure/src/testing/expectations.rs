//! Expectation checking.
//!
//! Evaluates declared expectations against a completed exchange.

use hello_domain::{Expectation, ExpectationResult, HttpExchange, StatusExpectation};
use regex::Regex;

const PREVIEW_CHARS: usize = 100;

/// Checks expectations against exchanges.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpectationChecker {
    stop_on_failure: bool,
}

impl ExpectationChecker {
    /// Create a checker that evaluates every expectation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: false,
        }
    }

    /// Set whether to stop at the first failing expectation.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Check expectations in order.
    #[must_use]
    pub fn check_all(
        &self,
        expectations: &[Expectation],
        exchange: &HttpExchange,
    ) -> Vec<ExpectationResult> {
        let mut results = Vec::with_capacity(expectations.len());
        for expectation in expectations {
            let result = self.check(expectation, exchange);
            let failed = !result.passed;
            results.push(result);
            if failed && self.stop_on_failure {
                break;
            }
        }
        results
    }

    /// Check a single expectation.
    #[must_use]
    pub fn check(&self, expectation: &Expectation, exchange: &HttpExchange) -> ExpectationResult {
        match expectation {
            Expectation::Status { expected } => check_status(expectation, exchange, expected),
            Expectation::Header { name, value } => {
                check_header(expectation, exchange, name, value.as_deref())
            }
            Expectation::HeaderMatches { name, pattern } => {
                check_header_matches(expectation, exchange, name, pattern)
            }
            Expectation::BodyEquals { expected } => {
                check_body_equals(expectation, exchange, expected)
            }
            Expectation::BodyContains { text } => check_body_contains(expectation, exchange, text),
            Expectation::BodyMatches { pattern } => {
                check_body_matches(expectation, exchange, pattern)
            }
        }
    }
}

fn check_status(
    expectation: &Expectation,
    exchange: &HttpExchange,
    expected: &StatusExpectation,
) -> ExpectationResult {
    let actual = exchange.status;
    if expected.matches(actual) {
        ExpectationResult::pass(expectation.clone(), actual.to_string())
    } else {
        ExpectationResult::fail_with_value(
            expectation.clone(),
            actual.to_string(),
            format!("expected status {}, got {actual}", expected.description()),
        )
    }
}

fn check_header(
    expectation: &Expectation,
    exchange: &HttpExchange,
    name: &str,
    expected: Option<&str>,
) -> ExpectationResult {
    let Some(actual) = exchange.header(name) else {
        return ExpectationResult::fail(
            expectation.clone(),
            format!("expected header '{name}' on response"),
        );
    };
    match expected {
        Some(expected) if actual != expected => ExpectationResult::fail_with_value(
            expectation.clone(),
            actual,
            format!("expected header '{name}' of '{expected}', got '{actual}'"),
        ),
        _ => ExpectationResult::pass(expectation.clone(), actual),
    }
}

fn check_header_matches(
    expectation: &Expectation,
    exchange: &HttpExchange,
    name: &str,
    pattern: &str,
) -> ExpectationResult {
    let Some(actual) = exchange.header(name) else {
        return ExpectationResult::fail(
            expectation.clone(),
            format!("expected header '{name}' on response"),
        );
    };
    match Regex::new(pattern) {
        Ok(regex) if regex.is_match(actual) => ExpectationResult::pass(expectation.clone(), actual),
        Ok(_) => ExpectationResult::fail_with_value(
            expectation.clone(),
            actual,
            format!("expected header '{name}' matching /{pattern}/, got '{actual}'"),
        ),
        Err(e) => ExpectationResult::fail(
            expectation.clone(),
            format!("invalid regex pattern '{pattern}': {e}"),
        ),
    }
}

fn check_body_equals(
    expectation: &Expectation,
    exchange: &HttpExchange,
    expected: &str,
) -> ExpectationResult {
    let body = exchange.text();
    if body == expected {
        ExpectationResult::pass(expectation.clone(), body)
    } else {
        let preview = preview(&body);
        ExpectationResult::fail_with_value(
            expectation.clone(),
            preview.clone(),
            format!("expected {expected:?} response body, got {preview:?}"),
        )
    }
}

fn check_body_contains(
    expectation: &Expectation,
    exchange: &HttpExchange,
    text: &str,
) -> ExpectationResult {
    let body = exchange.text();
    if body.contains(text) {
        ExpectationResult::pass(expectation.clone(), preview(&body))
    } else {
        ExpectationResult::fail_with_value(
            expectation.clone(),
            preview(&body),
            format!("expected response body to contain {text:?}"),
        )
    }
}

fn check_body_matches(
    expectation: &Expectation,
    exchange: &HttpExchange,
    pattern: &str,
) -> ExpectationResult {
    let body = exchange.text();
    match Regex::new(pattern) {
        Ok(regex) if regex.is_match(&body) => {
            ExpectationResult::pass(expectation.clone(), preview(&body))
        }
        Ok(_) => ExpectationResult::fail_with_value(
            expectation.clone(),
            preview(&body),
            format!("expected body matching /{pattern}/"),
        ),
        Err(e) => ExpectationResult::fail(
            expectation.clone(),
            format!("invalid regex pattern '{pattern}': {e}"),
        ),
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}
