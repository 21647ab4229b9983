//! Client library for the SVGStorm icon catalog.
//!
//! This crate talks to the catalog's REST API and provides the pieces a
//! catalog browser needs on top of it:
//!
//! - **Loading**: fetch the full icon list and its aggregate counts ([`CatalogLoader`])
//! - **Search**: case-insensitive filtering ([`filter_icons`]) with debounced input ([`QueryDebouncer`])
//! - **Details**: per-icon SVG markup ([`DetailFetcher`]), optionally shared through a [`DetailCache`]
//! - **Presentation data**: card summaries and copy-ready snippets
//!
//! # Example
//!
//! ```ignore
//! use svgstorm::{CatalogConfig, CatalogSession};
//!
//! let config = CatalogConfig::load(None)?;
//! let session = CatalogSession::new(&config)?;
//!
//! session.load().await?;
//! session.search("weather");
//! for icon in session.filtered() {
//!     println!("{}", icon.name);
//! }
//! ```

pub mod api;
pub mod cache;
pub mod card;
pub mod config;
pub mod debounce;
pub mod fetcher;
pub mod filter;
pub mod loader;
pub mod model;
pub mod session;
pub mod snippet;
pub mod stats;

mod error;

pub use api::IconApi;
pub use cache::DetailCache;
pub use card::{CardSummary, Glyph, detail_subtitle};
pub use config::CatalogConfig;
pub use debounce::QueryDebouncer;
pub use error::{CatalogError, Result};
pub use fetcher::{DetailFetcher, DetailHandle, DetailSlot, DetailState};
pub use filter::filter_icons;
pub use loader::{Catalog, CatalogLoader, LoadState};
pub use model::{ApiEnvelope, HealthReport, Icon, IconDetail};
pub use session::CatalogSession;
pub use snippet::{SnippetOptions, component_snippet, html_snippet};
pub use stats::IconStats;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};

    use crate::model::{Icon, IconDetail};

    pub fn icon(
        id: i64,
        name: &str,
        category: Option<&str>,
        tags: &[&str],
        description: Option<&str>,
    ) -> Icon {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Icon {
            id,
            name: name.to_string(),
            category: category.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: description.map(str::to_string),
            created_at: Some(stamp),
            updated_at: Some(stamp),
        }
    }

    pub fn detail(name: &str, svg: &str) -> IconDetail {
        IconDetail {
            icon: icon(1, name, None, &[], None),
            svg_markup: svg.to_string(),
        }
    }
}
