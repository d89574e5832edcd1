//! View model types representing renderable UI state.
//!
//! Computed by [`AppState::compute_viewmodel`](crate::app::AppState::compute_viewmodel)
//! and consumed by the renderer. Everything here is display-ready text; no
//! business logic runs during rendering.

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Facet chips and search mode.
    pub filter_bar: FilterBarInfo,

    /// Present while in search mode.
    pub search_bar: Option<SearchBarInfo>,

    /// Loading or error line above the list.
    pub banner: Option<Banner>,

    /// Cards inside the current scroll window.
    pub cards: Vec<PersonCard>,

    /// "Load more" affordance, present while part of the visible set is hidden.
    pub more: Option<MoreInfo>,

    /// Replaces the card list when there is nothing to show.
    pub empty_state: Option<EmptyState>,

    pub footer: FooterInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,

    /// Right-aligned status, e.g. "loaded 5m ago · dark".
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBarInfo {
    pub chips: Vec<FacetChip>,

    /// Label of the active search mode.
    pub search_mode: String,
}

/// One facet in the filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetChip {
    /// Key that cycles this facet.
    pub key_hint: char,
    pub label: String,
    /// Current selection; `None` renders as "all".
    pub selection: Option<String>,
    pub option_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub mode: String,
    /// Whether keystrokes currently edit the query.
    pub typing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Loading,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

/// Display information for one person.
///
/// Occupies one row, plus one row per detail when expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonCard {
    pub name: String,

    /// `(start, end)` character ranges of `name` matching the search text.
    pub highlight_ranges: Vec<(usize, usize)>,

    /// Secondary line content: username, city, company.
    pub summary: String,

    pub is_selected: bool,
    pub is_expanded: bool,

    /// `(label, value)` rows shown under an expanded card.
    pub details: Vec<(String, String)>,
}

impl PersonCard {
    /// Rows this card occupies on screen.
    #[must_use]
    pub fn height(&self) -> usize {
        1 + self.details.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoreInfo {
    pub revealed: usize,
    pub total: usize,
    /// How many the next "load more" will add.
    pub next_page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}
