//! A browsing session over the catalog.
//!
//! [`CatalogSession`] ties the pieces together the way a catalog page uses
//! them: load the list once, narrow it with a (debounced) search query, and
//! open one icon at a time in a detail view whose fetch is cancelled when the
//! view closes.

use std::sync::Arc;

use parking_lot::Mutex;
use svgstorm_core::logging::{PerfSpan, targets};
use svgstorm_core::{ConnectionGuard, Signal};

use crate::api::IconApi;
use crate::cache::DetailCache;
use crate::config::CatalogConfig;
use crate::debounce::QueryDebouncer;
use crate::error::Result;
use crate::fetcher::{DetailFetcher, DetailHandle, DetailSlot};
use crate::filter::filter_icons;
use crate::loader::{Catalog, CatalogLoader, LoadState};
use crate::model::Icon;
use crate::stats::IconStats;

#[derive(Default)]
struct View {
    query: String,
    filtered: Vec<Icon>,
}

struct SessionInner {
    loader: CatalogLoader,
    view: Mutex<View>,
    view_changed: Signal<usize>,
}

impl SessionInner {
    fn apply_query(&self, query: &str) -> usize {
        let count = {
            let _perf = PerfSpan::new("filter_icons");
            let icons = self
                .loader
                .catalog()
                .map(|catalog| filter_icons(catalog.icons(), query))
                .unwrap_or_default();
            let count = icons.len();

            let mut view = self.view.lock();
            view.query = query.to_string();
            view.filtered = icons;
            count
        };
        tracing::debug!(target: targets::SESSION, query, count, "view filtered");
        self.view_changed.emit(count);
        count
    }
}

/// A catalog page's state: the list, the search view and the open detail.
///
/// Must be created inside a tokio runtime (the debouncer runs a task).
pub struct CatalogSession {
    inner: Arc<SessionInner>,
    fetcher: DetailFetcher,
    debouncer: QueryDebouncer,
    _debounce_connection: ConnectionGuard<String>,
    detail: Mutex<Option<DetailSlot>>,
}

impl CatalogSession {
    /// Create a session from configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let api = IconApi::new(config)?;
        Ok(Self::with_api(api, config))
    }

    /// Create a session over an existing API client.
    ///
    /// Only the debounce delay and the cache flag are taken from `config`.
    pub fn with_api(api: IconApi, config: &CatalogConfig) -> Self {
        let fetcher = if config.cache_details {
            DetailFetcher::with_cache(api.clone(), Arc::new(DetailCache::new()))
        } else {
            DetailFetcher::new(api.clone())
        };

        let inner = Arc::new(SessionInner {
            loader: CatalogLoader::new(api),
            view: Mutex::new(View::default()),
            view_changed: Signal::new(),
        });

        let debouncer = QueryDebouncer::new(config.debounce);
        let target = Arc::downgrade(&inner);
        let connection = debouncer.settled().connect_scoped(move |query: &String| {
            if let Some(inner) = target.upgrade() {
                inner.apply_query(query);
            }
        });

        Self {
            inner,
            fetcher,
            debouncer,
            _debounce_connection: connection,
            detail: Mutex::new(None),
        }
    }

    /// The catalog loader.
    pub fn loader(&self) -> &CatalogLoader {
        &self.inner.loader
    }

    /// The detail fetcher used for selections.
    pub fn fetcher(&self) -> &DetailFetcher {
        &self.fetcher
    }

    /// Current load state.
    pub fn state(&self) -> LoadState {
        self.inner.loader.state()
    }

    /// Load (or reload) the catalog.
    ///
    /// On success the query is reset and the view shows every icon.
    pub async fn load(&self) -> Result<Arc<Catalog>> {
        let catalog = self.inner.loader.load().await?;
        self.inner.apply_query("");
        Ok(catalog)
    }

    /// Stats of the loaded catalog.
    pub fn stats(&self) -> Option<IconStats> {
        self.inner.loader.catalog().map(|catalog| catalog.stats())
    }

    /// Apply `query` right away. Returns the number of matching icons.
    pub fn search(&self, query: &str) -> usize {
        self.inner.apply_query(query)
    }

    /// Feed a keystroke-level query; it is applied once typing pauses.
    pub fn type_query(&self, query: impl Into<String>) {
        self.debouncer.push(query);
    }

    /// Clear the query. The full list comes back without waiting.
    pub fn clear_query(&self) {
        self.debouncer.clear();
    }

    /// The query behind the current view.
    pub fn query(&self) -> String {
        self.inner.view.lock().query.clone()
    }

    /// Icons in the current view.
    pub fn filtered(&self) -> Vec<Icon> {
        self.inner.view.lock().filtered.clone()
    }

    /// Signal emitted with the match count whenever the view changes.
    pub fn view_changed(&self) -> &Signal<usize> {
        &self.inner.view_changed
    }

    /// Open the detail view for `icon`, replacing (and cancelling) any
    /// previous one.
    pub fn select(&self, icon: &Icon) -> DetailHandle {
        let slot = self.fetcher.fetch_into_slot(icon.name.clone());
        let handle = slot.handle();
        tracing::debug!(target: targets::SESSION, name = %icon.name, "detail opened");
        let previous = self.detail.lock().replace(slot);
        drop(previous);
        handle
    }

    /// The open detail view, if any.
    pub fn selected(&self) -> Option<DetailHandle> {
        self.detail.lock().as_ref().map(DetailSlot::handle)
    }

    /// Close the detail view, cancelling its fetch if still running.
    pub fn close(&self) {
        if let Some(slot) = self.detail.lock().take() {
            tracing::debug!(target: targets::SESSION, name = slot.name(), "detail closed");
        }
    }
}

impl std::fmt::Debug for CatalogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSession")
            .field("loader", &self.inner.loader)
            .field("query", &self.inner.view.lock().query)
            .field("detail", &*self.detail.lock())
            .finish()
    }
}
