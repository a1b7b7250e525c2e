//! Fluent request tester.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hello_application::ports::{HttpClient, HttpClientError};
use hello_domain::{
    DomainError, Expectation, ExpectationResult, Header, HttpExchange, HttpMethod, RequestSpec,
    StatusExpectation,
};
use tracing::debug;

use super::ExpectationChecker;

/// Why a simulated request did not satisfy the case.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request could not be built.
    #[error("invalid request: {0}")]
    Invalid(#[from] DomainError),

    /// The request never produced a response.
    #[error(transparent)]
    Client(#[from] HttpClientError),

    /// A response arrived but an expectation did not hold.
    #[error("{message}")]
    Expectation {
        /// Failure message of the first expectation that did not hold.
        message: String,
        /// Full result of that expectation.
        result: Box<ExpectationResult>,
        /// The response that was checked.
        exchange: Box<HttpExchange>,
    },
}

impl RequestError {
    /// The response, when one was received.
    #[must_use]
    pub fn exchange(&self) -> Option<&HttpExchange> {
        match self {
            Self::Expectation { exchange, .. } => Some(&**exchange),
            Self::Invalid(_) | Self::Client(_) => None,
        }
    }
}

/// Entry point for simulated requests against one application.
///
/// ```ignore
/// let res = RequestTest::new(RouterClient::new(app()))
///     .get("/")
///     .expect_status(200)
///     .end()
///     .await;
/// ```
#[derive(Clone)]
pub struct RequestTest {
    client: Arc<dyn HttpClient>,
}

impl RequestTest {
    /// Creates a tester over `client`.
    pub fn new(client: impl HttpClient + 'static) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Creates a tester over a shared client.
    #[must_use]
    pub fn from_shared(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Starts a request with any method.
    #[must_use]
    pub fn request(&self, method: HttpMethod, path: &str) -> PendingRequest {
        PendingRequest {
            client: Arc::clone(&self.client),
            request: RequestSpec::new(method, path),
            expectations: Vec::new(),
        }
    }

    /// Starts a GET request.
    #[must_use]
    pub fn get(&self, path: &str) -> PendingRequest {
        self.request(HttpMethod::Get, path)
    }

    /// Starts a POST request.
    #[must_use]
    pub fn post(&self, path: &str) -> PendingRequest {
        self.request(HttpMethod::Post, path)
    }

    /// Starts a PUT request.
    #[must_use]
    pub fn put(&self, path: &str) -> PendingRequest {
        self.request(HttpMethod::Put, path)
    }

    /// Starts a DELETE request.
    #[must_use]
    pub fn delete(&self, path: &str) -> PendingRequest {
        self.request(HttpMethod::Delete, path)
    }
}

impl fmt::Debug for RequestTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestTest").finish_non_exhaustive()
    }
}

/// A request being described. Nothing is sent until [`end`](Self::end).
///
/// Building errors (bad path, bad header name) are held and returned by
/// `end()`, so the chain never panics.
#[must_use = "a request does nothing until `end()` is awaited"]
pub struct PendingRequest {
    client: Arc<dyn HttpClient>,
    request: Result<RequestSpec, DomainError>,
    expectations: Vec<Expectation>,
}

impl PendingRequest {
    /// Sets a request header.
    pub fn set(mut self, name: &str, value: &str) -> Self {
        self.request = self.request.and_then(|mut request| {
            request.set_header(Header::new(name, value)?);
            Ok(request)
        });
        self
    }

    /// Sets the request body.
    pub fn send(mut self, body: impl Into<String>) -> Self {
        if let Ok(request) = &mut self.request {
            request.body = Some(body.into());
        }
        self
    }

    /// Bounds how long the client may take to answer.
    pub fn timeout(mut self, limit: Duration) -> Self {
        if let Ok(request) = &mut self.request {
            request.timeout = Some(limit);
        }
        self
    }

    /// Expects an exact status code.
    pub fn expect_status(self, code: u16) -> Self {
        self.expect_status_in(StatusExpectation::Exact(code))
    }

    /// Expects the status to satisfy `expected`.
    pub fn expect_status_in(self, expected: StatusExpectation) -> Self {
        self.expect(Expectation::Status { expected })
    }

    /// Expects a header with an exact value.
    pub fn expect_header(self, name: &str, value: &str) -> Self {
        self.expect(Expectation::Header {
            name: name.to_string(),
            value: Some(value.to_string()),
        })
    }

    /// Expects a header whose value matches `pattern`.
    pub fn expect_header_matches(self, name: &str, pattern: &str) -> Self {
        self.expect(Expectation::HeaderMatches {
            name: name.to_string(),
            pattern: pattern.to_string(),
        })
    }

    /// Expects the body text to equal `expected` exactly.
    pub fn expect_body(self, expected: &str) -> Self {
        self.expect(Expectation::BodyEquals {
            expected: expected.to_string(),
        })
    }

    /// Expects the body text to contain `text`.
    pub fn expect_body_contains(self, text: &str) -> Self {
        self.expect(Expectation::BodyContains {
            text: text.to_string(),
        })
    }

    /// Expects the body text to match `pattern`.
    pub fn expect_body_matches(self, pattern: &str) -> Self {
        self.expect(Expectation::BodyMatches {
            pattern: pattern.to_string(),
        })
    }

    /// Adds any expectation.
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Expectations declared so far.
    #[must_use]
    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    /// Sends the request and checks the expectations in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the build error, the client error, or the first expectation
    /// that did not hold, in that order of precedence.
    pub async fn end(self) -> Result<HttpExchange, RequestError> {
        let request = self.request?;
        debug!(
            method = %request.method,
            path = %request.path,
            expectations = self.expectations.len(),
            "sending simulated request"
        );
        let exchange = self.client.execute(&request).await?;

        let checker = ExpectationChecker::new().with_stop_on_failure(true);
        let failed = checker
            .check_all(&self.expectations, &exchange)
            .into_iter()
            .find(|r| !r.passed);

        match failed {
            Some(result) => {
                let message = result
                    .error
                    .clone()
                    .unwrap_or_else(|| result.expectation.description());
                debug!(exchange = %exchange.summary(), %message, "expectation failed");
                Err(RequestError::Expectation {
                    message,
                    result: Box::new(result),
                    exchange: Box::new(exchange),
                })
            }
            None => Ok(exchange),
        }
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("request", &self.request)
            .field("expectations", &self.expectations)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::adapters::RouterClient;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use pretty_assertions::assert_eq;

    fn agent() -> RequestTest {
        let router = Router::new()
            .route("/", get(|| async { "Hello, world!" }))
            .route(
                "/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }),
            )
            .route(
                "/whoami",
                get(|headers: axum::http::HeaderMap| async move {
                    headers
                        .get("x-user")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("anonymous")
                        .to_string()
                }),
            );
        RequestTest::new(RouterClient::new(router))
    }

    #[tokio::test]
    async fn satisfied_expectations_return_exchange() {
        let exchange = agent()
            .get("/")
            .expect_status(200)
            .expect_header_matches("content-type", "^text/plain")
            .expect_body("Hello, world!")
            .end()
            .await
            .unwrap();
        assert_eq!(exchange.text(), "Hello, world!");
    }

    #[tokio::test]
    async fn status_mismatch_is_an_error_value() {
        let err = agent()
            .get("/broken")
            .expect_status(200)
            .end()
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "expected status 200, got 500");
        assert_eq!(err.exchange().unwrap().text(), "oops");
    }

    #[tokio::test]
    async fn first_failing_expectation_wins() {
        let err = agent()
            .get("/")
            .expect_body("Goodbye")
            .expect_status(404)
            .end()
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            RequestError::Expectation { result, .. }
                if matches!(result.expectation, Expectation::BodyEquals { .. })
        ));
    }

    #[tokio::test]
    async fn headers_are_sent() {
        let exchange = agent()
            .get("/whoami")
            .set("X-User", "ada")
            .expect_body("ada")
            .end()
            .await
            .unwrap();
        assert_eq!(exchange.status, 200);
    }

    #[tokio::test]
    async fn build_errors_surface_from_end() {
        let err = agent()
            .get("no-slash")
            .expect_status(200)
            .end()
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Invalid(DomainError::InvalidPath(_))));

        let err = agent()
            .get("/")
            .set("bad header", "x")
            .end()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RequestError::Invalid(DomainError::InvalidHeaderName(_))
        ));
        assert!(err.exchange().is_none());
    }

    #[test]
    fn expectations_are_collected_in_order() {
        let pending = agent().get("/").expect_status(200).expect_body("x");
        assert_eq!(pending.expectations().len(), 2);
        assert_eq!(pending.expectations()[0].description(), "status 200");
    }
}
