//! Error types for the catalog client.

use std::path::PathBuf;

use svgstorm_net::NetworkError;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while talking to the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Transport failure, non-2xx status or undecodable body.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The server answered with `success: false`.
    #[error("{message}")]
    Api { message: String },

    /// The server reported success but sent no payload.
    #[error("response contained no data")]
    MissingData,

    /// The icon name cannot be used as a path segment.
    #[error("invalid icon name '{name}'")]
    InvalidName { name: String },

    /// Invalid configuration value.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Configuration file could not be read.
    #[error("failed to read config '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl CatalogError {
    /// Create an API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The HTTP status, if this error came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network(err) => err.status(),
            _ => None,
        }
    }

    /// The single human-readable line shown when loading the catalog fails.
    ///
    /// Transport failures read `Connection error: ...`; a server that
    /// answered but refused the request reads `Failed to load icons: ...`.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => format!("Connection error: {self}"),
            _ => format!("Failed to load icons: {self}"),
        }
    }
}
