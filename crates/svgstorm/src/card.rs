//! What a catalog card and the detail header display for an icon.

use crate::fetcher::DetailState;
use crate::model::Icon;

/// Tags shown on a card before the rest collapse into a `+N` badge.
pub const VISIBLE_TAGS: usize = 3;

/// The glyph area of a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// Detail still loading.
    Loading,
    /// SVG markup to render.
    Svg(String),
    /// Detail unavailable; show a generic placeholder.
    Placeholder,
}

impl From<&DetailState> for Glyph {
    fn from(state: &DetailState) -> Self {
        match state {
            DetailState::Loading => Self::Loading,
            DetailState::Ready(detail) => Self::Svg(detail.svg_markup.clone()),
            DetailState::Missing => Self::Placeholder,
        }
    }
}

/// Text content of a catalog card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardSummary {
    /// Icon name.
    pub name: String,
    /// Category, if set and non-empty.
    pub category: Option<String>,
    /// Description, if any.
    pub description: Option<String>,
    /// Leading tags shown on the card.
    pub visible_tags: Vec<String>,
    /// Count of tags not shown.
    pub hidden_tags: usize,
}

impl CardSummary {
    /// Summarize an icon for a card.
    pub fn new(icon: &Icon) -> Self {
        Self {
            name: icon.name.clone(),
            category: icon.category_label().map(str::to_string),
            description: icon.description.clone(),
            visible_tags: icon.tags.iter().take(VISIBLE_TAGS).cloned().collect(),
            hidden_tags: icon.tags.len().saturating_sub(VISIBLE_TAGS),
        }
    }

    /// The `+N` badge, when some tags are hidden.
    pub fn overflow_label(&self) -> Option<String> {
        (self.hidden_tags > 0).then(|| format!("+{}", self.hidden_tags))
    }
}

/// Subtitle of the detail header, e.g. `weather • 3 tags`.
pub fn detail_subtitle(icon: &Icon) -> String {
    let tags = format!("{} tags", icon.tags.len());
    match icon.category_label() {
        Some(category) => format!("{category} • {tags}"),
        None => tags,
    }
}
