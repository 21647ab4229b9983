//! Fetching single icon detail records.
//!
//! [`DetailFetcher::fetch`] never fails: any error is logged and reported as
//! an absent detail, which views render as a placeholder glyph.
//!
//! A [`DetailSlot`] holds the outcome of one fetch for one view. The fetch
//! runs inside the slot's [`TaskScope`], so dropping the slot cancels the
//! request and a late response can never update it.

use std::sync::Arc;

use parking_lot::Mutex;
use svgstorm_core::logging::targets;
use svgstorm_core::{CancellationToken, Signal, TaskScope};
use tokio::sync::Notify;

use crate::api::IconApi;
use crate::cache::DetailCache;
use crate::error::Result;
use crate::model::IconDetail;

/// Fetches icon detail records by name.
///
/// Without a cache every call issues its own request. Cheap to clone.
#[derive(Clone, Debug)]
pub struct DetailFetcher {
    api: IconApi,
    cache: Option<Arc<DetailCache>>,
}

impl DetailFetcher {
    /// Create a fetcher that issues one request per call.
    pub fn new(api: IconApi) -> Self {
        Self { api, cache: None }
    }

    /// Create a fetcher that shares requests and results through `cache`.
    pub fn with_cache(api: IconApi, cache: Arc<DetailCache>) -> Self {
        Self {
            api,
            cache: Some(cache),
        }
    }

    /// The shared cache, if any.
    pub fn cache(&self) -> Option<&Arc<DetailCache>> {
        self.cache.as_ref()
    }

    /// Fetch the detail record, or `None` on any failure.
    pub async fn fetch(&self, name: &str) -> Option<IconDetail> {
        match self.try_fetch(name).await {
            Ok(detail) => Some(detail),
            Err(err) => {
                tracing::warn!(target: targets::FETCHER, name, error = %err, "failed to fetch icon detail");
                None
            }
        }
    }

    /// Fetch the detail record, reporting errors.
    pub async fn try_fetch(&self, name: &str) -> Result<IconDetail> {
        match &self.cache {
            Some(cache) => cache.get_or_fetch(name, || self.api.fetch_icon(name)).await,
            None => self.api.fetch_icon(name).await,
        }
    }

    /// Create a slot for `name` and start fetching into it.
    pub fn fetch_into_slot(&self, name: impl Into<String>) -> DetailSlot {
        let slot = DetailSlot::new(name);
        let fetcher = self.clone();
        let handle = slot.handle();

        let spawned = slot.scope.spawn(async move {
            let detail = fetcher.fetch(handle.name()).await;
            handle.settle(detail);
        });
        if !spawned {
            slot.handle().settle(None);
        }
        slot
    }
}

/// What a detail view currently shows.
#[derive(Clone, Debug, PartialEq)]
pub enum DetailState {
    /// The request is in flight.
    Loading,
    /// The record arrived.
    Ready(Arc<IconDetail>),
    /// The request failed; show a placeholder.
    Missing,
}

impl DetailState {
    /// The record, if it arrived.
    pub fn detail(&self) -> Option<&Arc<IconDetail>> {
        match self {
            Self::Ready(detail) => Some(detail),
            _ => None,
        }
    }
}

struct SlotShared {
    name: String,
    state: Mutex<DetailState>,
    token: CancellationToken,
    settled: Notify,
    changed: Signal<DetailState>,
}

/// A shared, read-only view of a [`DetailSlot`].
///
/// Handles stay valid after the slot is dropped, but the state stops changing.
#[derive(Clone)]
pub struct DetailHandle {
    shared: Arc<SlotShared>,
}

impl DetailHandle {
    /// The icon name this slot is for.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> DetailState {
        self.shared.state.lock().clone()
    }

    /// True once the owning slot has been dropped or cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.shared.token.is_cancelled()
    }

    /// Signal emitted once when the state leaves [`DetailState::Loading`].
    pub fn changed(&self) -> &Signal<DetailState> {
        &self.shared.changed
    }

    /// Wait until the fetch settles.
    ///
    /// Returns `None` if the slot is cancelled first.
    pub async fn settled(&self) -> Option<DetailState> {
        loop {
            let notified = self.shared.settled.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let state = self.state();
            if state != DetailState::Loading {
                return Some(state);
            }
            if self.is_cancelled() {
                return None;
            }

            tokio::select! {
                _ = self.shared.token.cancelled() => return None,
                _ = &mut notified => {}
            }
        }
    }

    fn settle(&self, detail: Option<IconDetail>) {
        let state = match detail {
            Some(detail) => DetailState::Ready(Arc::new(detail)),
            None => DetailState::Missing,
        };

        {
            let mut current = self.shared.state.lock();
            if self.shared.token.is_cancelled() {
                tracing::debug!(target: targets::FETCHER, name = %self.shared.name, "slot cancelled, dropping result");
                return;
            }
            *current = state.clone();
        }
        self.shared.settled.notify_waiters();
        self.shared.changed.emit(state);
    }
}

impl std::fmt::Debug for DetailHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailHandle")
            .field("name", &self.shared.name)
            .field("state", &*self.shared.state.lock())
            .finish()
    }
}

/// Holds the fetched detail for one view and owns the fetch.
pub struct DetailSlot {
    shared: Arc<SlotShared>,
    scope: TaskScope,
}

impl DetailSlot {
    /// Create a slot in the [`DetailState::Loading`] state.
    pub fn new(name: impl Into<String>) -> Self {
        let scope = TaskScope::new("detail-slot");
        let shared = Arc::new(SlotShared {
            name: name.into(),
            state: Mutex::new(DetailState::Loading),
            token: scope.token(),
            settled: Notify::new(),
            changed: Signal::new(),
        });
        Self { shared, scope }
    }

    /// The icon name this slot is for.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> DetailState {
        self.shared.state.lock().clone()
    }

    /// A handle for observing this slot from elsewhere.
    pub fn handle(&self) -> DetailHandle {
        DetailHandle {
            shared: self.shared.clone(),
        }
    }

    /// Cancel the in-flight fetch. The state is frozen from here on.
    pub fn cancel(&self) {
        // Hold the state lock so a concurrent settle either finishes first or sees the flag.
        let _state = self.shared.state.lock();
        self.scope.cancel();
    }

    /// True once the slot has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }
}

impl Drop for DetailSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for DetailSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailSlot")
            .field("name", &self.shared.name)
            .field("state", &*self.shared.state.lock())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
