//! A REST client anchored at a base URL.
//!
//! Endpoints are addressed as lists of raw path segments, each of which is
//! percent-encoded on its own, so data such as an icon name can never add a
//! path level or a query string.
//!
//! # Example
//!
//! ```ignore
//! use svgstorm_net::http::RestApiClient;
//!
//! let client = RestApiClient::builder("https://api.example.com/")
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! // GET https://api.example.com/api/icons/arrow%20left
//! let response = client.get(&["api", "icons", "arrow left"]).await?;
//! let health: Health = client.get_json(&["api", "health"]).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use svgstorm_core::logging::targets;
use url::Url;

use super::client::{HttpClient, HttpClientConfig};
use super::response::HttpResponse;
use crate::error::{NetworkError, Result};

/// Retry policy for failed requests.
///
/// Connection errors, timeouts, `429 Too Many Requests` and 5xx responses are
/// retried; everything else is returned on the first attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper bound for the delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Factor applied to the delay after each retry.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn next_delay(&self, current: Duration) -> Duration {
        current
            .mul_f64(self.backoff_multiplier)
            .min(Duration::from_millis(self.max_delay_ms))
    }
}

/// Builder for [`RestApiClient`].
#[derive(Debug)]
pub struct RestApiClientBuilder {
    base_url: String,
    http: HttpClientConfig,
    retry: RetryConfig,
}

impl RestApiClientBuilder {
    /// Start from `base_url` with default connection settings and no retries.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: HttpClientConfig::default(),
            retry: RetryConfig::none(),
        }
    }

    /// Set the whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http.connect_timeout = timeout;
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.http.user_agent = user_agent.into();
        self
    }

    /// Set the retry policy.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Build the client.
    ///
    /// Fails with [`NetworkError::InvalidUrl`] if the base URL does not parse
    /// or cannot carry a path.
    pub fn build(self) -> Result<RestApiClient> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)?;
        if base.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }

        Ok(RestApiClient {
            inner: Arc::new(RestApiClientInner {
                http: HttpClient::new(self.http)?,
                base,
                base_url,
                retry: self.retry,
            }),
        })
    }
}

struct RestApiClientInner {
    http: HttpClient,
    base: Url,
    base_url: String,
    retry: RetryConfig,
}

/// A REST client with a fixed base URL.
///
/// Cheaply cloneable; clones share the connection pool.
#[derive(Clone)]
pub struct RestApiClient {
    inner: Arc<RestApiClientInner>,
}

impl RestApiClient {
    /// Create a builder for `base_url`.
    pub fn builder(base_url: impl Into<String>) -> RestApiClientBuilder {
        RestApiClientBuilder::new(base_url)
    }

    /// The base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The underlying HTTP client.
    pub fn http_client(&self) -> &HttpClient {
        &self.inner.http
    }

    /// The retry policy.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.inner.retry
    }

    /// The absolute URL for `segments` below the base URL.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base.clone();
        url.path_segments_mut()
            .map_err(|_| NetworkError::InvalidUrl(format!("{} has no path", self.inner.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET the endpoint at `segments`, retrying per the client's policy.
    ///
    /// Non-2xx responses are returned as responses so callers can read the
    /// error body.
    pub async fn get(&self, segments: &[&str]) -> Result<HttpResponse> {
        let url = self.url_for(segments)?;
        let retry = &self.inner.retry;
        let mut delay = Duration::from_millis(retry.initial_delay_ms);
        let mut attempt = 0;

        loop {
            let wait = match self.inner.http.get(url.clone()).await {
                Ok(response) if response.is_retryable() && attempt < retry.max_retries => {
                    let wait = response.retry_after().unwrap_or(delay);
                    tracing::warn!(
                        target: targets::REST_API,
                        %url,
                        status = response.status(),
                        attempt = attempt + 1,
                        ?wait,
                        "server busy, retrying"
                    );
                    wait
                }
                Err(err) if err.is_transient() && attempt < retry.max_retries => {
                    tracing::warn!(
                        target: targets::REST_API,
                        %url,
                        error = %err,
                        attempt = attempt + 1,
                        ?delay,
                        "request failed, retrying"
                    );
                    delay
                }
                result => return result,
            };

            tokio::time::sleep(wait).await;
            attempt += 1;
            delay = retry.next_delay(delay);
        }
    }

    /// GET the endpoint at `segments` and decode a 2xx body as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        self.get(segments).await?.error_for_status().await?.json().await
    }
}

impl std::fmt::Debug for RestApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestApiClient")
            .field("base_url", &self.inner.base_url)
            .field("max_retries", &self.inner.retry.max_retries)
            .finish()
    }
}
