//! Cooperative cancellation for async work.
//!
//! A [`CancellationToken`] is a shared flag that async tasks can either poll
//! or await. A [`TaskScope`] owns a token plus the tasks spawned under it and
//! cancels all of them when it is dropped, which ties in-flight requests to
//! the lifetime of the view that started them.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::logging::targets;

/// A cancellation token for cooperative task cancellation.
///
/// Clones share the same state: cancelling any clone cancels them all.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationState>,
}

#[derive(Debug)]
struct CancellationState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    /// Create a new cancellation token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationState {
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Check if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation and wake every task waiting in [`cancelled`](Self::cancelled).
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Wait until the token is cancelled.
    ///
    /// Returns immediately if the token is already cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a concurrent cancel() is not lost.
            notified.as_mut().enable();

            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Run a future until it completes or the token is cancelled.
    ///
    /// Returns `None` if cancellation won the race.
    pub async fn run_until_cancelled<F>(&self, future: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => None,
            output = future => Some(output),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A group of tasks bound to one owner's lifetime.
///
/// Every task spawned through the scope races against the scope's token.
/// Dropping the scope (or calling [`cancel`](Self::cancel)) cancels the token
/// and aborts the tasks, so no late result is ever delivered by them.
pub struct TaskScope {
    name: &'static str,
    token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskScope {
    /// Create a new, empty scope.
    ///
    /// The name only shows up in logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            token: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// The scope's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// A clone of the scope's cancellation token.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Check if the scope has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Spawn a task on the current tokio runtime, bound to this scope.
    ///
    /// Returns `false` without spawning when the scope is already cancelled
    /// or no runtime is available.
    pub fn spawn<F>(&self, future: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_cancelled() {
            tracing::debug!(target: targets::TASK, scope = self.name, "scope cancelled, not spawning");
            return false;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                tracing::warn!(target: targets::TASK, scope = self.name, "no async runtime: {}", err);
                return false;
            }
        };

        let token = self.token.clone();
        let join = handle.spawn(async move {
            token.run_until_cancelled(future).await;
        });

        let mut tasks = self.tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(join);
        true
    }

    /// Number of spawned tasks that have not finished yet.
    pub fn active_tasks(&self) -> usize {
        self.tasks
            .lock()
            .iter()
            .filter(|task| !task.is_finished())
            .count()
    }

    /// Cancel the scope and abort every task it spawned.
    pub fn cancel(&self) {
        self.token.cancel();
        let tasks = std::mem::take(&mut *self.tasks.lock());
        if !tasks.is_empty() {
            tracing::debug!(target: targets::TASK, scope = self.name, count = tasks.len(), "aborting scoped tasks");
        }
        for task in tasks {
            task.abort();
        }
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TaskScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScope")
            .field("name", &self.name)
            .field("cancelled", &self.is_cancelled())
            .field("tasks", &self.tasks.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn test_token_cancel() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());

        clone.cancel();
        assert!(token.is_cancelled());

        // Cancelling twice is harmless.
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_returns_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancelled().await;
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let token = CancellationToken::new();
        let waiter = tokio::spawn({
            let token = token.clone();
            async move { token.cancelled().await }
        });

        tokio::task::yield_now().await;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter was not woken")
            .expect("waiter panicked");
    }

    #[tokio::test]
    async fn test_run_until_cancelled() {
        let token = CancellationToken::new();
        assert_eq!(token.run_until_cancelled(async { 7 }).await, Some(7));

        token.cancel();
        let never = std::future::pending::<i32>();
        assert_eq!(token.run_until_cancelled(never).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scope_drop_cancels_tasks() {
        let finished = Arc::new(AtomicUsize::new(0));
        let scope = TaskScope::new("test");

        let finished_clone = finished.clone();
        assert!(scope.spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            finished_clone.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(scope.active_tasks(), 1);

        drop(scope);
        tokio::time::sleep(Duration::from_secs(20)).await;

        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scope_refuses_spawn_after_cancel() {
        let scope = TaskScope::new("test");
        scope.cancel();
        assert!(scope.is_cancelled());
        assert!(!scope.spawn(async {}));
    }

    #[test]
    fn test_scope_spawn_without_runtime() {
        let scope = TaskScope::new("no-runtime");
        assert!(!scope.spawn(async {}));
    }
}
