//! Assertion context handed to each case.

use std::fmt;
use std::sync::Arc;

use hello_domain::{AssertionRecord, Operator};
use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct CaseState {
    records: Vec<AssertionRecord>,
    ended: bool,
}

/// Handle a case asserts through.
///
/// Clones share the same state, so a context can be moved into a spawned
/// task or a callback. Once [`end`](Self::end) has been called, later
/// assertions are recorded as failures.
#[derive(Debug, Clone)]
pub struct TestContext {
    name: Arc<str>,
    state: Arc<Mutex<CaseState>>,
    done: Arc<Notify>,
}

impl TestContext {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            state: Arc::new(Mutex::new(CaseState::default())),
            done: Arc::new(Notify::new()),
        }
    }

    /// Name of the case this context belongs to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Asserts `actual == expected`.
    pub fn equal<A, E>(&self, actual: A, expected: E, message: impl Into<String>) -> bool
    where
        A: PartialEq<E> + fmt::Debug,
        E: fmt::Debug,
    {
        let message = or_default(message.into(), "should be equal");
        let record = if actual == expected {
            AssertionRecord::pass(Operator::Equal, message)
        } else {
            AssertionRecord::fail(Operator::Equal, message)
                .with_values(format!("{actual:?}"), format!("{expected:?}"))
        };
        self.record(record)
    }

    /// Alias of [`equal`](Self::equal).
    pub fn equals<A, E>(&self, actual: A, expected: E, message: impl Into<String>) -> bool
    where
        A: PartialEq<E> + fmt::Debug,
        E: fmt::Debug,
    {
        self.equal(actual, expected, message)
    }

    /// Asserts `actual != expected`.
    pub fn not_equal<A, E>(&self, actual: A, expected: E, message: impl Into<String>) -> bool
    where
        A: PartialEq<E> + fmt::Debug,
        E: fmt::Debug,
    {
        let message = or_default(message.into(), "should not be equal");
        let record = if actual == expected {
            AssertionRecord::fail(Operator::NotEqual, message)
                .with_values(format!("{actual:?}"), format!("{expected:?}"))
        } else {
            AssertionRecord::pass(Operator::NotEqual, message)
        };
        self.record(record)
    }

    /// Asserts that `value` is true.
    pub fn ok(&self, value: bool, message: impl Into<String>) -> bool {
        let message = or_default(message.into(), "should be truthy");
        let record = if value {
            AssertionRecord::pass(Operator::Ok, message)
        } else {
            AssertionRecord::fail(Operator::Ok, message).with_values("false", "true")
        };
        self.record(record)
    }

    /// Asserts that no error is present.
    ///
    /// A present error becomes a failed assertion carrying the error text;
    /// it is never propagated.
    pub fn error<E: fmt::Display>(&self, err: Option<E>, message: impl Into<String>) -> bool {
        let message = message.into();
        let record = match err {
            None => AssertionRecord::pass(Operator::Error, or_default(message, "no error")),
            Some(err) => {
                let text = err.to_string();
                let message = or_default(message, &text);
                AssertionRecord::fail(Operator::Error, message).with_values(text, "no error")
            }
        };
        self.record(record)
    }

    /// Records an unconditional pass.
    pub fn pass(&self, message: impl Into<String>) {
        let message = or_default(message.into(), "(unnamed assert)");
        self.record(AssertionRecord::pass(Operator::Pass, message));
    }

    /// Records an unconditional failure.
    pub fn fail(&self, message: impl Into<String>) {
        let message = or_default(message.into(), "(unnamed assert)");
        self.record(AssertionRecord::fail(Operator::Fail, message));
    }

    /// Signals that the case is complete.
    ///
    /// A second call is recorded as a failed assertion.
    pub fn end(&self) {
        {
            let mut state = self.state.lock();
            if state.ended {
                state.records.push(AssertionRecord::fail(
                    Operator::End,
                    "end called multiple times",
                ));
                return;
            }
            state.ended = true;
        }
        self.done.notify_one();
    }

    /// Returns true once [`end`](Self::end) has been called.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.state.lock().ended
    }

    /// Number of assertions recorded so far.
    #[must_use]
    pub fn assertion_count(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Resolves once the case has signalled completion.
    pub(crate) async fn ended(&self) {
        if self.is_ended() {
            return;
        }
        self.done.notified().await;
    }

    pub(crate) fn records(&self) -> Vec<AssertionRecord> {
        self.state.lock().records.clone()
    }

    fn record(&self, mut record: AssertionRecord) -> bool {
        let mut state = self.state.lock();
        if state.ended {
            record.ok = false;
            record.message = format!("{} (assertion after end)", record.message);
        }
        let ok = record.ok;
        state.records.push(record);
        ok
    }
}

fn or_default(message: String, default: &str) -> String {
    if message.is_empty() {
        default.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn equal_records_values_on_failure() {
        let t = TestContext::new("case");
        assert!(t.equal(1 + 1, 2, "should be 2"));
        assert!(!t.equals(String::from("Bye"), "Hello, world!", ""));

        let records = t.records();
        assert_eq!(
            records[0],
            AssertionRecord::pass(Operator::Equal, "should be 2")
        );
        assert_eq!(
            records[1],
            AssertionRecord::fail(Operator::Equal, "should be equal")
                .with_values("\"Bye\"", "\"Hello, world!\"")
        );
    }

    #[test]
    fn not_equal_and_ok() {
        let t = TestContext::new("case");
        assert!(t.not_equal(1, 2, ""));
        assert!(!t.not_equal(3, 3, "same"));
        assert!(t.ok(true, ""));
        assert!(!t.ok(false, "flag"));
        assert_eq!(t.assertion_count(), 4);
        assert_eq!(t.records().iter().filter(|r| r.ok).count(), 2);
    }

    #[test]
    fn error_passes_on_none_and_fails_with_text() {
        let t = TestContext::new("case");
        assert!(t.error(None::<String>, ""));
        assert!(!t.error(Some("expected 200, got 500"), ""));

        let records = t.records();
        assert_eq!(records[0].message, "no error");
        assert_eq!(records[1].message, "expected 200, got 500");
        assert_eq!(records[1].actual.as_deref(), Some("expected 200, got 500"));
    }

    #[test]
    fn pass_and_fail_are_unconditional() {
        let t = TestContext::new("case");
        t.pass("reached");
        t.fail("");
        let records = t.records();
        assert!(records[0].ok);
        assert!(!records[1].ok);
        assert_eq!(records[1].message, "(unnamed assert)");
    }

    #[test]
    fn assertions_after_end_fail() {
        let t = TestContext::new("case");
        t.end();
        assert!(t.is_ended());
        assert!(!t.ok(true, "late"));
        assert_eq!(t.records()[0].message, "late (assertion after end)");
    }

    #[test]
    fn double_end_is_recorded() {
        let t = TestContext::new("case");
        t.end();
        t.end();
        let records = t.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operator, Operator::End);
        assert!(!records[0].ok);
    }

    #[test]
    fn clones_share_state() {
        let t = TestContext::new("shared");
        let other = t.clone();
        other.pass("from clone");
        other.end();
        assert_eq!(t.assertion_count(), 1);
        assert!(t.is_ended());
        assert_eq!(t.name(), "shared");
    }

    #[tokio::test]
    async fn ended_resolves_after_signal_from_task() {
        let t = TestContext::new("async");
        let signaller = t.clone();
        tokio::spawn(async move {
            signaller.pass("in task");
            signaller.end();
        });
        t.ended().await;
        assert_eq!(t.assertion_count(), 1);
    }
}
