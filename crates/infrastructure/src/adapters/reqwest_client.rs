//! HTTP client implementation using reqwest.
//!
//! Reaches the application under test over a real socket. Used when the
//! application runs as its own process, and to exercise the connection
//! failure path that the in-process client can never hit.

use std::error::Error as StdError;
use std::io;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use hello_application::ports::{HttpClient, HttpClientError};
use hello_domain::{HttpExchange, HttpMethod, RequestSpec};
use reqwest::{Client, Method, Url};
use tracing::debug;

/// HTTP client that sends requests to `base_url` over the network.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
}

impl ReqwestHttpClient {
    /// Timeout used when the request does not set its own.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client for the application at `base_url`.
    ///
    /// Redirects are not followed, so expectations see the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be
    /// created.
    pub fn new(base_url: &str) -> Result<Self, HttpClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HttpClientError::InvalidRequest(format!("{e}: {base_url}")))?;
        let client = Client::builder()
            .user_agent(concat!("hello-smoke/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Creates a client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    fn map_error(&self, error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            // the io error sits several sources below reqwest's own
            let refused = std::iter::successors(Some(error as &(dyn StdError + 'static)), |&e| e.source())
                .any(is_connection_refused);
            if refused {
                return HttpClientError::ConnectionRefused {
                    host: self.base_url.host_str().unwrap_or("unknown").to_string(),
                    port: self.base_url.port_or_known_default().unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(error.to_string());
        }

        HttpClientError::Other(error.to_string())
    }
}

fn is_connection_refused(error: &(dyn StdError + 'static)) -> bool {
    error
        .downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::ConnectionRefused)
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, spec: &RequestSpec) -> Result<HttpExchange, HttpClientError> {
        let url = self
            .base_url
            .join(&spec.path)
            .map_err(|e| HttpClientError::InvalidRequest(format!("{e}: {}", spec.path)))?;
        let timeout = spec.timeout.unwrap_or(Self::DEFAULT_TIMEOUT);
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(spec.method), url)
            .timeout(timeout);
        for header in &spec.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if let Some(body) = spec.effective_body() {
            builder = builder.body(body.to_owned());
        }

        debug!(method = %spec.method, path = %spec.path, base = %self.base_url, "sending request");
        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| self.map_error(&e, timeout_ms))?;

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
            .bytes()
            .await
            .map_err(|e| HttpClientError::Body(e.to_string()))?
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
