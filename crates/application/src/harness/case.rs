//! Named test cases.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use hello_domain::CaseOptions;

use super::TestContext;

/// A named, independently evaluated unit of verification.
#[async_trait]
pub trait TestCase: Send + Sync {
    /// Name shown in reports.
    fn name(&self) -> &str;

    /// Options given at registration.
    fn options(&self) -> CaseOptions {
        CaseOptions::default()
    }

    /// Runs the case body.
    ///
    /// The case is complete when `t.end()` is called, not when this future
    /// resolves.
    async fn run(&self, t: TestContext);
}

/// A [`TestCase`] built from a name, options and an async closure.
pub struct FnCase<F> {
    name: String,
    options: CaseOptions,
    body: F,
}

impl<F, Fut> FnCase<F>
where
    F: Fn(TestContext) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    /// Creates a case.
    pub fn new(name: impl Into<String>, options: CaseOptions, body: F) -> Self {
        Self {
            name: name.into(),
            options,
            body,
        }
    }
}

impl<F> fmt::Debug for FnCase<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCase")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> TestCase for FnCase<F>
where
    F: Fn(TestContext) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> CaseOptions {
        self.options
    }

    async fn run(&self, t: TestContext) {
        (self.body)(t).await;
    }
}
