//! In-process HTTP client.
//!
//! Drives an `axum::Router` directly through `tower::ServiceExt::oneshot`.
//! No socket is opened: the request is handed to the router as a value and
//! the response body is collected in memory.

use std::time::Instant;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use hello_application::ports::{HttpClient, HttpClientError};
use hello_domain::{HttpExchange, RequestSpec};
use http_body_util::BodyExt;
use tower::ServiceExt;
use tracing::debug;

/// HTTP client that injects requests into a router in the same process.
#[derive(Debug, Clone)]
pub struct RouterClient {
    router: Router,
}

impl RouterClient {
    /// Wraps the application under test.
    #[must_use]
    pub const fn new(router: Router) -> Self {
        Self { router }
    }

    fn build_request(spec: &RequestSpec) -> Result<Request<Body>, HttpClientError> {
        let mut builder = Request::builder()
            .method(spec.method.as_str())
            .uri(spec.path.as_str());
        for header in &spec.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        let body = spec
            .effective_body()
            .map_or_else(Body::empty, |b| Body::from(b.to_owned()));

        builder
            .body(body)
            .map_err(|e| HttpClientError::InvalidRequest(e.to_string()))
    }

    async fn dispatch(
        router: Router,
        spec: &RequestSpec,
        request: Request<Body>,
    ) -> Result<HttpExchange, HttpClientError> {
        let start = Instant::now();
        let response: Response<Body> = router
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or("<binary>").to_string(),
                )
            })
            .collect();

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| HttpClientError::Body(e.to_string()))?
            .to_bytes()
            .to_vec();

        Ok(HttpExchange::new(
            spec.method,
            spec.path.clone(),
            status,
            headers,
            body,
            start.elapsed(),
        ))
    }
}

#[async_trait]
impl HttpClient for RouterClient {
    async fn execute(&self, spec: &RequestSpec) -> Result<HttpExchange, HttpClientError> {
        let request = Self::build_request(spec)?;
        debug!(method = %spec.method, path = %spec.path, "injecting request into router");

        let call = Self::dispatch(self.router.clone(), spec, request);
        match spec.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                HttpClientError::Timeout {
                    timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                }
            })?,
            None => call.await,
        }
    }
}
