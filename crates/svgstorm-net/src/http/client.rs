//! Pooled HTTP client for JSON GET requests.

use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;
use svgstorm_core::logging::targets;
use url::Url;

use super::response::HttpResponse;
use crate::error::Result;

/// Connection settings shared by every request of a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
            user_agent: format!("svgstorm/{} (Rust)", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// An HTTP client that asks for JSON.
///
/// Clones share one connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: Arc<HttpClientConfig>,
}

impl HttpClient {
    /// Build a client from `config`.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::ACCEPT,
            http::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send a GET request. Non-2xx statuses are returned as responses.
    pub async fn get(&self, url: Url) -> Result<HttpResponse> {
        tracing::debug!(target: targets::HTTP, %url, "GET");
        let response = self.client.get(url).send().await?;
        tracing::debug!(
            target: targets::HTTP,
            status = response.status().as_u16(),
            "received response"
        );
        Ok(HttpResponse::new(response))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &*self.config)
            .finish()
    }
}
