//! Free-text filtering of the catalog.
//!
//! An icon matches when the lower-cased query occurs in its lower-cased name,
//! category, any tag, or description. Blank queries match everything; other
//! queries are used as typed, surrounding whitespace included.

use crate::model::Icon;

/// Whether `icon` matches a query that is already lower-cased.
pub fn matches(icon: &Icon, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);

    contains(icon.name.as_str())
        || icon.category.as_deref().is_some_and(contains)
        || icon.tags.iter().any(|tag| contains(tag.as_str()))
        || icon.description.as_deref().is_some_and(contains)
}

/// Return the icons matching `query`, in their original order.
pub fn filter_icons(icons: &[Icon], query: &str) -> Vec<Icon> {
    if query.trim().is_empty() {
        return icons.to_vec();
    }

    let needle = query.to_lowercase();
    icons
        .iter()
        .filter(|icon| matches(icon, &needle))
        .cloned()
        .collect()
}
