//! Debouncing of search input.
//!
//! Keystrokes are pushed with [`QueryDebouncer::push`]. Once no new query has
//! arrived for the configured delay, the latest one is emitted on
//! [`settled`](QueryDebouncer::settled) exactly once. Clearing skips the wait.

use std::sync::Arc;
use std::time::Duration;

use svgstorm_core::logging::targets;
use svgstorm_core::{Signal, TaskScope};
use tokio::sync::mpsc;

enum Command {
    Push(String),
    Clear,
}

/// Delays query updates until typing pauses.
///
/// The background task lives in the debouncer's own scope and stops when the
/// debouncer is dropped. Must be created inside a tokio runtime.
pub struct QueryDebouncer {
    tx: mpsc::UnboundedSender<Command>,
    settled: Arc<Signal<String>>,
    delay: Duration,
    scope: TaskScope,
}

impl QueryDebouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let settled = Arc::new(Signal::new());
        let scope = TaskScope::new("query-debouncer");

        if !scope.spawn(run(rx, settled.clone(), delay)) {
            tracing::warn!(target: targets::DEBOUNCE, "debouncer task not started; queries will not be emitted");
        }

        Self {
            tx,
            settled,
            delay,
            scope,
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Signal carrying each settled query.
    pub fn settled(&self) -> &Signal<String> {
        &self.settled
    }

    /// Record a new query, restarting the quiet period.
    pub fn push(&self, query: impl Into<String>) {
        if self.tx.send(Command::Push(query.into())).is_err() {
            tracing::debug!(target: targets::DEBOUNCE, "debouncer stopped, query ignored");
        }
    }

    /// Drop any pending query and emit the empty query without waiting.
    pub fn clear(&self) {
        if self.tx.send(Command::Clear).is_err() {
            tracing::debug!(target: targets::DEBOUNCE, "debouncer stopped, clear ignored");
        }
    }

    /// Stop the background task. Pending queries are discarded.
    pub fn stop(&self) {
        self.scope.cancel();
    }
}

impl std::fmt::Debug for QueryDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryDebouncer")
            .field("delay", &self.delay)
            .field("scope", &self.scope)
            .finish()
    }
}

async fn run(mut rx: mpsc::UnboundedReceiver<Command>, settled: Arc<Signal<String>>, delay: Duration) {
    let mut pending: Option<String> = None;

    loop {
        let command = if pending.is_some() {
            match tokio::time::timeout(delay, rx.recv()).await {
                Ok(command) => command,
                Err(_) => {
                    if let Some(query) = pending.take() {
                        tracing::trace!(target: targets::DEBOUNCE, query = %query, "query settled");
                        settled.emit(query);
                    }
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match command {
            Some(Command::Push(query)) => pending = Some(query),
            Some(Command::Clear) => {
                pending = None;
                settled.emit(String::new());
            }
            None => break,
        }
    }
}
