//! Core runtime pieces for SVGStorm.
//!
//! This crate provides the small set of building blocks the catalog client
//! is wired together with:
//!
//! - **Signals**: Type-safe change notification with connect/disconnect
//! - **Cancellation**: Cooperative, async-aware cancellation tokens
//! - **Task Scopes**: Tasks bound to the lifetime of the view that owns them
//! - **Logging**: `tracing` target names and performance spans
//!
//! # Signal Example
//!
//! ```
//! use svgstorm_core::Signal;
//!
//! let query_changed = Signal::<String>::new();
//!
//! let conn_id = query_changed.connect(|query| {
//!     println!("Query is now: {}", query);
//! });
//!
//! query_changed.emit("weather".to_string());
//! query_changed.disconnect(conn_id);
//! ```
//!
//! # Task Scope Example
//!
//! ```ignore
//! use svgstorm_core::TaskScope;
//!
//! let scope = TaskScope::new("icon-modal");
//! scope.spawn(async move {
//!     // Work that must not outlive the modal.
//! });
//!
//! // Dropping the scope cancels everything it spawned.
//! drop(scope);
//! ```

pub mod cancellation;
pub mod logging;
pub mod signal;

pub use cancellation::{CancellationToken, TaskScope};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
