//! Logging facilities for SVGStorm.
//!
//! SVGStorm uses the `tracing` crate for instrumentation. Libraries only emit
//! events; to see them, install a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("svgstorm=debug,svgstorm_net=info")
//!         .init();
//! }
//! ```
//!
//! Every event is emitted under one of the [`targets`], so a filter directive
//! can select a single subsystem.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal emission.
    pub const SIGNAL: &str = "svgstorm_core::signal";
    /// Scoped task lifecycle and cancellation.
    pub const TASK: &str = "svgstorm_core::task";
    /// Performance spans.
    pub const PERF: &str = "svgstorm::perf";
    /// Raw HTTP client.
    pub const HTTP: &str = "svgstorm_net::http";
    /// REST client (base URL, envelopes, retries).
    pub const REST_API: &str = "svgstorm_net::rest_api";
    /// Icon API endpoints.
    pub const API: &str = "svgstorm::api";
    /// Catalog loading.
    pub const LOADER: &str = "svgstorm::loader";
    /// Detail fetching.
    pub const FETCHER: &str = "svgstorm::fetcher";
    /// Detail cache.
    pub const CACHE: &str = "svgstorm::cache";
    /// Query debouncing.
    pub const DEBOUNCE: &str = "svgstorm::debounce";
    /// Catalog session.
    pub const SESSION: &str = "svgstorm::session";
    /// Configuration loading.
    pub const CONFIG: &str = "svgstorm::config";
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// This is useful for tracking the duration of synchronous operations such
/// as recomputing the filtered view. Do not hold it across `.await` points.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
