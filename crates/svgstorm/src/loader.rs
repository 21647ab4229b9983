//! Loading the full catalog.
//!
//! [`CatalogLoader`] fetches the icon list once per [`load`](CatalogLoader::load)
//! call and tracks the outcome as a [`LoadState`]. Every transition is
//! published on [`state_changed`](CatalogLoader::state_changed).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use svgstorm_core::Signal;
use svgstorm_core::logging::{PerfSpan, targets};

use crate::api::IconApi;
use crate::error::Result;
use crate::model::Icon;
use crate::stats::IconStats;

/// A loaded catalog and its aggregate counts.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    icons: Vec<Icon>,
    stats: IconStats,
}

impl Catalog {
    /// Build a catalog from a list of icons.
    pub fn new(icons: Vec<Icon>) -> Self {
        let stats = {
            let _perf = PerfSpan::new("catalog_stats");
            IconStats::from_icons(&icons)
        };
        Self { icons, stats }
    }

    /// The icons, in server order.
    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    /// Aggregate counts.
    pub fn stats(&self) -> IconStats {
        self.stats
    }

    /// Look an icon up by name.
    pub fn get(&self, name: &str) -> Option<&Icon> {
        self.icons.iter().find(|icon| icon.name == name)
    }
}

/// Where a catalog load stands.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The catalog arrived.
    Loaded(Arc<Catalog>),
    /// The request failed; the message is ready for display.
    Failed(String),
}

impl LoadState {
    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The catalog, once loaded.
    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            Self::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }

    /// The failure message, if the last load failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Fetches the catalog and tracks the result.
///
/// Loads are never retried automatically. Calling [`load`](Self::load) again
/// starts a fresh request; if several overlap, only the most recent one
/// updates the state.
pub struct CatalogLoader {
    api: IconApi,
    state: Mutex<LoadState>,
    generation: AtomicU64,
    state_changed: Signal<LoadState>,
}

impl CatalogLoader {
    /// Create an idle loader.
    pub fn new(api: IconApi) -> Self {
        Self {
            api,
            state: Mutex::new(LoadState::Idle),
            generation: AtomicU64::new(0),
            state_changed: Signal::new(),
        }
    }

    /// The API client used for requests.
    pub fn api(&self) -> &IconApi {
        &self.api
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> LoadState {
        self.state.lock().clone()
    }

    /// The loaded catalog, if any.
    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.state.lock().catalog().cloned()
    }

    /// Signal emitted with the new state on every transition.
    pub fn state_changed(&self) -> &Signal<LoadState> {
        &self.state_changed
    }

    /// Fetch the icon list and update the state.
    ///
    /// On failure the state becomes [`LoadState::Failed`] with the error's
    /// [`user_message`](crate::CatalogError::user_message), and the error is
    /// also returned.
    pub async fn load(&self) -> Result<Arc<Catalog>> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.set_state(generation, LoadState::Loading);

        match self.api.fetch_icons().await {
            Ok(icons) => {
                let catalog = Arc::new(Catalog::new(icons));
                tracing::info!(
                    target: targets::LOADER,
                    total = catalog.stats().total_icons,
                    categories = catalog.stats().categories,
                    tags = catalog.stats().tags,
                    "catalog loaded"
                );
                self.set_state(generation, LoadState::Loaded(catalog.clone()));
                Ok(catalog)
            }
            Err(err) => {
                let message = err.user_message();
                tracing::error!(target: targets::LOADER, error = %err, "catalog load failed");
                self.set_state(generation, LoadState::Failed(message));
                Err(err)
            }
        }
    }

    fn set_state(&self, generation: u64, state: LoadState) {
        {
            let mut current = self.state.lock();
            if self.generation.load(Ordering::Acquire) != generation {
                tracing::debug!(target: targets::LOADER, generation, "dropping stale load result");
                return;
            }
            *current = state.clone();
        }
        self.state_changed.emit(state);
    }
}

impl std::fmt::Debug for CatalogLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLoader")
            .field("base_url", &self.api.base_url())
            .field("state", &*self.state.lock())
            .finish()
    }
}
