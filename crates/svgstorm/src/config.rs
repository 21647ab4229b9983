//! Client configuration.
//!
//! Settings are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, environment variables, then explicit overrides made by
//! the caller (the CLI applies its flags last).
//!
//! ```toml
//! api_url = "https://icons.example.com"
//! timeout_secs = 15
//! debounce_ms = 250
//! cache_details = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use svgstorm_core::logging::targets;

use crate::error::{CatalogError, Result};

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://api-svgstorm-production.up.railway.app";

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "SVGSTORM_API_URL";

/// Environment variable overriding the request timeout, in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "SVGSTORM_TIMEOUT_SECS";

/// Configuration for the catalog client.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogConfig {
    /// API base URL, without a trailing slash.
    pub api_base: String,
    /// Total timeout per request.
    pub request_timeout: Duration,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// Quiet period before a typed query is applied.
    pub debounce: Duration,
    /// User agent override.
    pub user_agent: Option<String>,
    /// Share and cache detail fetches by icon name.
    pub cache_details: bool,
    /// Retries for transient failures. Zero disables retrying.
    pub max_retries: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            debounce: Duration::from_millis(300),
            user_agent: None,
            cache_details: false,
            max_retries: 0,
        }
    }
}

/// On-disk representation; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_url: Option<String>,
    timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
    debounce_ms: Option<u64>,
    user_agent: Option<String>,
    cache_details: Option<bool>,
    max_retries: Option<u32>,
}

impl CatalogConfig {
    /// Load configuration from defaults, an optional file and the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = path {
            config.merge_file(path)?;
        }
        config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document on top of the defaults.
    pub fn from_toml_str(source: &str) -> std::result::Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(source)?;
        let mut config = Self::default();
        config.apply_file(file);
        Ok(config)
    }

    /// Override values with those found in a TOML file.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&source).map_err(|source| CatalogError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded config file");
        self.apply_file(file);
        Ok(())
    }

    /// Override values from environment variables.
    ///
    /// `lookup` is usually `std::env::var`; tests pass a map.
    pub fn merge_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                CatalogError::config(format!("{ENV_TIMEOUT_SECS} must be a whole number, got '{secs}'"))
            })?;
            self.request_timeout = Duration::from_secs(secs);
        }
        Ok(())
    }

    /// Set the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the debounce delay.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Enable or disable the detail cache.
    pub fn with_cache_details(mut self, enabled: bool) -> Self {
        self.cache_details = enabled;
        self
    }

    /// Check values and normalize the base URL.
    pub fn validate(&mut self) -> Result<()> {
        let base = self.api_base.trim().trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&base)
            .map_err(|e| CatalogError::config(format!("invalid API base URL '{base}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::config(format!(
                "API base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(CatalogError::config("request timeout must be greater than zero"));
        }
        self.api_base = base;
        Ok(())
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(url) = file.api_url {
            self.api_base = url;
        }
        if let Some(secs) = file.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.connect_timeout_secs {
            self.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = file.debounce_ms {
            self.debounce = Duration::from_millis(ms);
        }
        if file.user_agent.is_some() {
            self.user_agent = file.user_agent;
        }
        if let Some(enabled) = file.cache_details {
            self.cache_details = enabled;
        }
        if let Some(retries) = file.max_retries {
            self.max_retries = retries;
        }
    }
}
