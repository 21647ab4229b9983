//! HTTP and REST client layer for SVGStorm.
//!
//! The catalog API is read-only, so this crate only sends GET requests:
//!
//! - **`HttpClient`**: a pooled `reqwest` client that asks for JSON
//! - **`RestApiClient`**: a base URL, per-segment path encoding and optional
//!   retry with exponential backoff
//!
//! ```ignore
//! use svgstorm_net::http::{RestApiClient, RetryConfig};
//!
//! let client = RestApiClient::builder("https://api.example.com/")
//!     .timeout(Duration::from_secs(10))
//!     .retry(RetryConfig::default())
//!     .build()?;
//!
//! // A 404 becomes `NetworkError::HttpStatus` carrying the server's `message`.
//! let response = client
//!     .get(&["api", "icons", "arrow left"])
//!     .await?
//!     .error_for_status()
//!     .await?;
//! ```

mod error;
pub mod http;

pub use error::{NetworkError, Result};

pub use http::{
    HttpClient, HttpClientConfig, HttpResponse, RestApiClient, RestApiClientBuilder, RetryConfig,
};
