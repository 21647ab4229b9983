//! Aggregate counts over the catalog.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::Icon;

/// Totals shown above the catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IconStats {
    /// Number of icons.
    pub total_icons: usize,
    /// Number of distinct, non-empty categories.
    pub categories: usize,
    /// Number of distinct tag strings across all icons.
    pub tags: usize,
}

impl IconStats {
    /// Compute the counts for a list of icons.
    pub fn from_icons(icons: &[Icon]) -> Self {
        let categories: HashSet<&str> = icons.iter().filter_map(Icon::category_label).collect();
        let tags: HashSet<&str> = icons
            .iter()
            .flat_map(|icon| icon.tags.iter().map(String::as_str))
            .collect();

        Self {
            total_icons: icons.len(),
            categories: categories.len(),
            tags: tags.len(),
        }
    }
}
