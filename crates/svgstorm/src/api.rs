//! Typed access to the catalog endpoints.
//!
//! # Example
//!
//! ```ignore
//! use svgstorm::{CatalogConfig, IconApi};
//!
//! let api = IconApi::new(&CatalogConfig::default())?;
//! let icons = api.fetch_icons().await?;
//! let detail = api.fetch_icon(&icons[0].name).await?;
//! println!("{}", detail.svg_markup);
//! ```

use serde::de::DeserializeOwned;
use svgstorm_core::logging::targets;
use svgstorm_net::http::{RestApiClient, RetryConfig};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::model::{ApiEnvelope, HealthReport, Icon, IconDetail};

const ICONS_PATH: [&str; 2] = ["api", "icons"];
const HEALTH_PATH: [&str; 2] = ["api", "health"];

/// Client for the icon catalog REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct IconApi {
    client: RestApiClient,
}

impl IconApi {
    /// Create a client from configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let mut builder = RestApiClient::builder(&config.api_base)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .retry(RetryConfig {
                max_retries: config.max_retries,
                ..RetryConfig::default()
            });
        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// The normalized API base URL.
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Fetch every icon in the catalog.
    pub async fn fetch_icons(&self) -> Result<Vec<Icon>> {
        tracing::debug!(target: targets::API, base = self.base_url(), "fetching icons");

        let result: Result<Vec<Icon>> = self.read_envelope(&ICONS_PATH).await;
        match &result {
            Ok(icons) => {
                tracing::debug!(target: targets::API, count = icons.len(), "fetched icons");
            }
            Err(err) => {
                tracing::error!(target: targets::API, base = self.base_url(), error = %err, "failed to fetch icons");
            }
        }
        result
    }

    /// Fetch one icon's detail record, including its SVG markup.
    ///
    /// The name is sent as a single percent-encoded path segment.
    pub async fn fetch_icon(&self, name: &str) -> Result<IconDetail> {
        if name.trim().is_empty() {
            return Err(CatalogError::InvalidName {
                name: name.to_string(),
            });
        }
        self.read_envelope(&["api", "icons", name]).await
    }

    /// Query the health endpoint.
    pub async fn health(&self) -> Result<HealthReport> {
        Ok(self.client.get_json(&HEALTH_PATH).await?)
    }

    /// True iff the service reports itself healthy. Failures count as unhealthy.
    pub async fn health_check(&self) -> bool {
        match self.health().await {
            Ok(report) => report.is_healthy(),
            Err(err) => {
                tracing::warn!(target: targets::API, error = %err, "health check failed");
                false
            }
        }
    }

    /// GET `segments` and unwrap the envelope around a 2xx body.
    async fn read_envelope<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let envelope: ApiEnvelope<T> = self.client.get_json(segments).await?;
        envelope.into_result()
    }
}
