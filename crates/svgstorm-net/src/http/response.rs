//! Responses from the catalog server.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{NetworkError, Result};

/// The part of a JSON error body worth surfacing.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// A response whose body has not been read yet.
pub struct HttpResponse {
    inner: reqwest::Response,
}

impl HttpResponse {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// True for `429 Too Many Requests` and 5xx statuses.
    pub fn is_retryable(&self) -> bool {
        let status = self.inner.status();
        status == http::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    /// The `Retry-After` delay, when given in seconds.
    pub fn retry_after(&self) -> Option<Duration> {
        self.inner
            .headers()
            .get(http::header::RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse()
            .ok()
            .map(Duration::from_secs)
    }

    /// The URL that produced this response, after redirects.
    pub fn url(&self) -> &str {
        self.inner.url().as_str()
    }

    /// Read the body as text.
    pub async fn text(self) -> Result<String> {
        Ok(self.inner.text().await?)
    }

    /// Read the body and decode it as JSON.
    ///
    /// The whole body is read first so a malformed document reports the
    /// parser's position in [`NetworkError::Json`].
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Pass 2xx responses through; turn anything else into
    /// [`NetworkError::HttpStatus`].
    ///
    /// The error carries the `message` field of a JSON body such as
    /// `{"success": false, "message": "Icon not found"}`. Other bodies are
    /// dropped.
    pub async fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let status = self.status();
        let body = self.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());
        Err(NetworkError::HttpStatus { status, message })
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status())
            .field("url", &self.url())
            .finish()
    }
}
