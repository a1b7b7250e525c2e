//! Harness that runs registered cases.
//!
//! Cases run one after another, each in its own task so that a panic stays
//! local to the case that raised it. A case is complete when it calls
//! `end()`; if that does not happen within its timeout the case is reported
//! as timed out and its task is aborted.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hello_domain::{CaseOptions, CaseOutcome, CaseReport, RunReport};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{FnCase, TestCase, TestContext};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::Clock;

/// How a case's wait finished, short of timing out.
enum Completion {
    Ended,
    Panicked(String),
}

/// An explicit, ordered list of test cases and the settings to run them.
pub struct Harness {
    cases: Vec<Arc<dyn TestCase>>,
    default_timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl Harness {
    /// Timeout applied to cases that don't set their own.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates an empty harness.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            cases: Vec::new(),
            default_timeout: Self::DEFAULT_TIMEOUT,
            clock,
        }
    }

    /// Sets the timeout for cases without one of their own.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Adds a case.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::DuplicateCase` if a case with the same
    /// name is already registered.
    pub fn register(&mut self, case: impl TestCase + 'static) -> ApplicationResult<&mut Self> {
        if self.cases.iter().any(|c| c.name() == case.name()) {
            return Err(ApplicationError::DuplicateCase(case.name().to_string()));
        }
        self.cases.push(Arc::new(case));
        Ok(self)
    }

    /// Adds a case built from a closure.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub fn case<F, Fut>(
        &mut self,
        name: impl Into<String>,
        options: CaseOptions,
        body: F,
    ) -> ApplicationResult<&mut Self>
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.register(FnCase::new(name, options, body))
    }

    /// Number of registered cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true if no case is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Names of the registered cases, in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|c| c.name())
    }

    /// Runs every case and collects the report.
    ///
    /// Each call starts from fresh case state.
    pub async fn run(&self) -> RunReport {
        let started_at = self.clock.now();
        let start = Instant::now();
        info!(cases = self.cases.len(), "starting test run");

        let mut reports = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            reports.push(self.run_case(case).await);
        }

        let report = RunReport::new(started_at, reports, elapsed_ms(start));
        info!(
            passed = report.passed,
            failed = report.failed,
            skipped = report.skipped,
            duration_ms = report.duration_ms,
            "test run finished"
        );
        report
    }

    async fn run_case(&self, case: &Arc<dyn TestCase>) -> CaseReport {
        let name = case.name().to_string();
        let options = case.options();
        if options.skip {
            info!(case = %name, "skipping case");
            return CaseReport::skipped(name);
        }

        let limit = options.timeout.unwrap_or(self.default_timeout);
        debug!(case = %name, timeout_ms = limit.as_millis(), "running case");

        let context = TestContext::new(&name);
        let start = Instant::now();
        let task = {
            let case = Arc::clone(case);
            let t = context.clone();
            tokio::spawn(async move { case.run(t).await })
        };
        let handle = task.abort_handle();

        let waited = tokio::time::timeout(limit, wait_for_end(task, &context)).await;
        let returned = handle.is_finished();
        handle.abort();

        let assertions = context.records();
        let (outcome, diagnostic) = match waited {
            Ok(Completion::Ended) => {
                if assertions.iter().all(|a| a.ok) {
                    (CaseOutcome::Passed, None)
                } else {
                    (CaseOutcome::Failed, None)
                }
            }
            Ok(Completion::Panicked(message)) => {
                (CaseOutcome::Failed, Some(format!("panicked: {message}")))
            }
            Err(_) => {
                let after_ms = duration_ms(limit);
                let note = if returned {
                    format!("returned without calling end; timed out after {after_ms}ms")
                } else {
                    format!("test timed out after {after_ms}ms")
                };
                (CaseOutcome::TimedOut { after_ms }, Some(note))
            }
        };

        let report = CaseReport {
            name,
            outcome,
            assertions,
            duration_ms: elapsed_ms(start),
            diagnostic,
        };

        if report.outcome.is_failure() {
            warn!(
                case = %report.name,
                outcome = ?report.outcome,
                failed_assertions = report.failed_assertions().count(),
                "case failed"
            );
        } else {
            info!(case = %report.name, duration_ms = report.duration_ms, "case passed");
        }
        report
    }
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("cases", &self.names().collect::<Vec<_>>())
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

/// Waits for the completion signal, or for the case task to die.
///
/// A body that returns without calling `end()` is not complete: the signal
/// may still come from work the body handed off.
async fn wait_for_end(mut task: JoinHandle<()>, context: &TestContext) -> Completion {
    tokio::select! {
        biased;
        () = context.ended() => Completion::Ended,
        joined = &mut task => match joined {
            Ok(()) => {
                context.ended().await;
                Completion::Ended
            }
            Err(err) if err.is_panic() => Completion::Panicked(panic_message(&*err.into_panic())),
            Err(err) => Completion::Panicked(err.to_string()),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

fn elapsed_ms(start: Instant) -> u64 {
    duration_ms(start.elapsed())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::{assert_eq, assert_ne};

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
        }
    }

    fn harness() -> Harness {
        Harness::new(Arc::new(FixedClock))
    }

    #[tokio::test]
    async fn passing_case_reports_passed() {
        let mut h = harness();
        h.case("example test", CaseOptions::default(), |t| async move {
            t.equal(1 + 1, 2, "should be 2");
            t.end();
        })
        .unwrap();

        let report = h.run().await;
        assert_eq!(report.total, 1);
        assert_eq!(report.passed, 1);
        assert_eq!(report.cases[0].outcome, CaseOutcome::Passed);
        assert_eq!(report.cases[0].assertions[0].message, "should be 2");
        assert_eq!(report.started_at, FixedClock.now());
    }

    #[tokio::test]
    async fn failed_assertion_fails_case_not_run() {
        let mut h = harness();
        h.case("bad", CaseOptions::default(), |t| async move {
            t.equal(1, 2, "mismatch");
            t.end();
        })
        .unwrap()
        .case("good", CaseOptions::default(), |t| async move {
            t.pass("still runs");
            t.end();
        })
        .unwrap();

        let report = h.run().await;
        assert_eq!(report.cases[0].outcome, CaseOutcome::Failed);
        assert_eq!(report.cases[1].outcome, CaseOutcome::Passed);
        assert!(!report.all_passed());
    }

    #[tokio::test(start_paused = true)]
    async fn case_without_end_times_out() {
        let mut h = harness();
        h.case("hangs", CaseOptions::timeout_ms(500), |t| async move {
            t.pass("before hang");
            std::future::pending::<()>().await;
        })
        .unwrap();

        let report = h.run().await;
        let case = &report.cases[0];
        assert_eq!(case.outcome, CaseOutcome::TimedOut { after_ms: 500 });
        assert_eq!(case.assertions.len(), 1);
        assert_eq!(
            case.diagnostic.as_deref(),
            Some("test timed out after 500ms")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn returning_without_end_times_out() {
        let mut h = harness().with_default_timeout(Duration::from_millis(100));
        h.case("forgets end", CaseOptions::default(), |t| async move {
            t.pass("asserted");
        })
        .unwrap();

        let report = h.run().await;
        let case = &report.cases[0];
        assert_eq!(case.outcome, CaseOutcome::TimedOut { after_ms: 100 });
        assert!(
            case.diagnostic
                .as_deref()
                .unwrap()
                .starts_with("returned without calling end")
        );
    }

    #[tokio::test]
    async fn end_from_spawned_task_completes_case() {
        let mut h = harness();
        h.case("callback", CaseOptions::timeout_ms(500), |t| async move {
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                t.ok(true, "in callback");
                t.end();
            });
        })
        .unwrap();

        let report = h.run().await;
        assert_eq!(report.cases[0].outcome, CaseOutcome::Passed);
        assert_eq!(report.cases[0].assertions.len(), 1);
    }

    #[tokio::test]
    async fn panic_is_local_to_case() {
        let mut h = harness();
        h.case("explodes", CaseOptions::default(), |_t| async move {
            panic!("boom");
        })
        .unwrap()
        .case("after", CaseOptions::default(), |t| async move {
            t.end();
        })
        .unwrap();

        let report = h.run().await;
        assert_eq!(report.cases[0].outcome, CaseOutcome::Failed);
        assert_eq!(
            report.cases[0].diagnostic.as_deref(),
            Some("panicked: boom")
        );
        assert_eq!(report.cases[1].outcome, CaseOutcome::Passed);
    }

    #[tokio::test]
    async fn skipped_case_is_not_run() {
        let mut h = harness();
        h.case("skipped", CaseOptions::skipped(), |t| async move {
            t.fail("must not run");
            t.end();
        })
        .unwrap();

        let report = h.run().await;
        assert_eq!(report.cases[0].outcome, CaseOutcome::Skipped);
        assert_eq!(report.skipped, 1);
        assert!(report.all_passed());
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected() {
        let mut h = harness();
        h.case("same", CaseOptions::default(), |t| async move { t.end() })
            .unwrap();
        let err = h
            .case("same", CaseOptions::default(), |t| async move { t.end() })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::DuplicateCase(name) if name == "same"));
        assert_eq!(h.len(), 1);
    }

    #[tokio::test]
    async fn runs_are_independent() {
        let mut h = harness();
        h.case("once", CaseOptions::default(), |t| async move {
            t.equal(1 + 1, 2, "should be 2");
            t.end();
        })
        .unwrap();

        let first = h.run().await;
        let second = h.run().await;
        assert_ne!(first.id, second.id);
        assert_eq!(first.cases[0].outcome, second.cases[0].outcome);
        assert_eq!(first.cases[0].assertions, second.cases[0].assertions);
        assert_eq!(second.cases[0].assertions.len(), 1);
    }
}
