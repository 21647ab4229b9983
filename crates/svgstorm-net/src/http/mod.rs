//! HTTP transport for the catalog API.
//!
//! [`HttpClient`] owns the connection pool and sends JSON GET requests.
//! [`RestApiClient`] anchors it at a base URL, encodes path segments and
//! retries transient failures.

mod client;
mod response;
mod rest_api;

pub use client::{HttpClient, HttpClientConfig};
pub use response::HttpResponse;
pub use rest_api::{RestApiClient, RestApiClientBuilder, RetryConfig};
