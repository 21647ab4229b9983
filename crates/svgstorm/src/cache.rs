//! Shared cache of icon detail records.
//!
//! Concurrent lookups of the same name share a single request. Only
//! successful results are stored; after a failure the next lookup fetches
//! again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use svgstorm_core::logging::targets;
use tokio::sync::OnceCell;

use crate::error::Result;
use crate::model::IconDetail;

type Entry = Arc<OnceCell<IconDetail>>;

/// Detail records keyed by icon name.
#[derive(Default)]
pub struct DetailCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl DetailCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached record for `name`, or run `fetch` to produce it.
    ///
    /// While one caller's `fetch` is running, other callers for the same name
    /// wait for its result instead of starting their own.
    pub async fn get_or_fetch<F, Fut>(&self, name: &str, fetch: F) -> Result<IconDetail>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<IconDetail>>,
    {
        let entry = self.entry(name);
        if let Some(detail) = entry.get() {
            tracing::trace!(target: targets::CACHE, name, "cache hit");
            return Ok(detail.clone());
        }

        let result = entry
            .get_or_try_init(|| async {
                tracing::debug!(target: targets::CACHE, name, "cache miss");
                fetch().await
            })
            .await
            .cloned();
        if result.is_err() {
            self.evict_failed(name, &entry);
        }
        result
    }

    /// The cached record for `name`, without fetching.
    pub fn get(&self, name: &str) -> Option<IconDetail> {
        self.entries
            .lock()
            .get(name)
            .and_then(|entry| entry.get().cloned())
    }

    /// Drop the record for `name`. Returns `true` if one was cached.
    pub fn invalidate(&self, name: &str) -> bool {
        self.entries
            .lock()
            .remove(name)
            .is_some_and(|entry| entry.initialized())
    }

    /// Drop every record.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|entry| entry.initialized())
            .count()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove `name` if its cell is still the empty one a failed fetch left
    /// behind. A cell another caller has since filled or replaced stays.
    fn evict_failed(&self, name: &str, failed: &Entry) {
        let mut entries = self.entries.lock();
        let stale = entries
            .get(name)
            .is_some_and(|current| Arc::ptr_eq(current, failed) && !current.initialized());
        if stale {
            entries.remove(name);
        }
    }

    fn entry(&self, name: &str) -> Entry {
        self.entries
            .lock()
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}

impl std::fmt::Debug for DetailCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailCache")
            .field("len", &self.len())
            .finish()
    }
}
