//! Controller state and view model computation.
//!
//! [`AppState`] owns every piece of the pipeline: the current [`Collection`],
//! its [`FacetSet`], the [`QueryState`], the visible set, pagination and the
//! per-person expand flags. The event handler mutates it; the renderer only
//! ever sees the [`UIViewModel`] computed from it.
//!
//! Derived state is recomputed eagerly, one stage at a time:
//!
//! ```text
//! collection ─▶ facets ─▶ (revalidate query) ─▶ visible ─▶ pagination ─▶ projection
//! ```
//!
//! so `visible` and `pagination` are always consistent with `collection` and
//! `query` between events.

use crate::app::modes::{InputMode, SearchFocus};
use crate::app::Action;
use crate::domain::{Appearance, Collection, Field, Person, THEME_PREFERENCE_KEY};
use crate::pipeline::{evaluate, extract_facets, FacetSet, LoadTracker, Pagination, QueryState, ViewState};
use crate::ui::theme::{Theme, ThemeSet};
use crate::ui::viewmodel::{
    Banner, BannerKind, EmptyState, FacetChip, FilterBarInfo, FooterInfo, HeaderInfo, MoreInfo, PersonCard,
    SearchBarInfo, UIViewModel,
};
use crate::worker::WorkerMessage;
use crate::Config;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::time::Duration;

/// Blank top line, header, border, filter bar, border and footer.
const BASE_CHROME_ROWS: usize = 6;
/// Extra rows for the boxed search bar.
const SEARCH_BAR_ROWS: usize = 3;

/// Fields listed under an expanded card, in display order.
const DETAIL_FIELDS: [Field; 6] = [
    Field::Email,
    Field::Phone,
    Field::Website,
    Field::City,
    Field::Company,
    Field::Gender,
];

fn system_clock_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Central controller state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// URL the collection is fetched from.
    pub endpoint: String,

    /// Fields facets are extracted for, in filter bar order.
    pub facet_fields: Vec<Field>,

    /// Last successfully loaded collection. Kept across failed reloads.
    pub collection: Collection,

    /// Facet values of `collection`. Only recomputed when it is replaced.
    pub facets: FacetSet,

    pub query: QueryState,

    /// Indices into `collection` matching `query`, in collection order.
    pub visible: Vec<usize>,

    pub pagination: Pagination,

    pub view_state: ViewState,

    pub loader: LoadTracker,

    pub themes: ThemeSet,
    pub appearance: Appearance,

    /// Set once the user toggles the theme, so a late stored preference does
    /// not override the choice.
    pub preference_touched: bool,

    pub input_mode: InputMode,

    /// Zero-based index into the revealed part of `visible`.
    pub selected_index: usize,

    /// User-facing message of the last failed load, cleared by the next
    /// successful one.
    pub last_error: Option<String>,

    /// Whether any load has ever succeeded.
    pub has_loaded: bool,

    /// Wall clock in unix milliseconds.
    pub clock: fn() -> i64,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config, themes: ThemeSet) -> Self {
        let timeout = (config.request_timeout > 0).then(|| Duration::from_secs(config.request_timeout));

        Self {
            endpoint: config.endpoint.clone(),
            facet_fields: config.facets.clone(),
            collection: Collection::empty(),
            facets: FacetSet::default(),
            query: QueryState::new(config.search_mode),
            visible: Vec::new(),
            pagination: Pagination::new(NonZeroUsize::new(config.page_size)),
            view_state: ViewState::default(),
            loader: LoadTracker::new(timeout),
            themes,
            appearance: config.appearance,
            preference_touched: false,
            input_mode: InputMode::Normal,
            selected_index: 0,
            last_error: None,
            has_loaded: false,
            clock: system_clock_ms,
        }
    }

    /// Theme for the current appearance.
    #[must_use]
    pub const fn theme(&self) -> &Theme {
        self.themes.get(self.appearance)
    }

    #[must_use]
    pub fn now_ms(&self) -> i64 {
        (self.clock)()
    }

    /// Starts a new load, superseding any in-flight one.
    pub fn begin_load(&mut self) -> Vec<Action> {
        let request_id = self.loader.begin(self.now_ms());
        tracing::info!(%request_id, endpoint = %self.endpoint, "loading collection");

        let mut actions = vec![Action::Fetch {
            url: self.endpoint.clone(),
            request_id,
        }];
        if let Some(timeout) = self.loader.timeout() {
            actions.push(Action::ScheduleTimeout {
                seconds: timeout.as_secs_f64(),
            });
        }
        actions
    }

    /// Replaces the collection and re-runs every downstream stage.
    pub fn apply_collection(&mut self, collection: Collection) {
        let _span = tracing::debug_span!("apply_collection", people = collection.len()).entered();

        self.facets = extract_facets(&collection, &self.facet_fields);
        let dropped = self.query.revalidate(&self.facets);
        if !dropped.is_empty() {
            tracing::debug!(?dropped, "cleared selections missing from new collection");
        }

        let pruned = self.view_state.prune(&collection);
        tracing::debug!(pruned, "pruned expand state");

        self.collection = collection;
        self.has_loaded = true;
        self.last_error = None;
        self.refresh_visible();
    }

    /// Re-evaluates the query and restarts pagination.
    pub fn refresh_visible(&mut self) {
        self.visible = evaluate(&self.collection, &self.query);
        self.pagination.reset(self.visible.len());
        self.selected_index = 0;

        tracing::debug!(
            visible = self.visible.len(),
            revealed = self.pagination.revealed(),
            "visible set refreshed"
        );
    }

    /// Number of visible people currently revealed.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.pagination.revealed().min(self.visible.len())
    }

    #[must_use]
    pub fn selected_person(&self) -> Option<&Person> {
        if self.selected_index >= self.revealed_count() {
            return None;
        }
        self.visible
            .get(self.selected_index)
            .and_then(|&index| self.collection.get(index))
    }

    /// Moves the selection down, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        let count = self.revealed_count();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Moves the selection up, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let count = self.revealed_count();
        if count == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            count - 1
        } else {
            self.selected_index - 1
        };
    }

    /// Reveals the next page. Returns whether anything changed.
    pub fn load_more(&mut self) -> bool {
        self.pagination.advance(self.visible.len())
    }

    /// Flips the appearance and asks the worker to persist it.
    pub fn toggle_appearance(&mut self) -> Action {
        self.appearance = self.appearance.toggled();
        self.preference_touched = true;
        tracing::info!(appearance = %self.appearance, "theme toggled");

        Action::PostToWorker(WorkerMessage::save_preference(
            THEME_PREFERENCE_KEY.to_string(),
            self.appearance.as_str().to_string(),
        ))
    }

    /// Computes the view model for a `rows` × `cols` pane.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let banner = self.compute_banner();
        let more = self.compute_more();

        let mut chrome = BASE_CHROME_ROWS;
        if self.input_mode.is_search() {
            chrome += SEARCH_BAR_ROWS;
        }
        if banner.is_some() {
            chrome += 1;
        }
        if more.is_some() {
            chrome += 1;
        }
        let available_rows = rows.saturating_sub(chrome).max(1);

        let all_cards: Vec<PersonCard> = self
            .view_state
            .project(&self.collection, &self.visible, self.revealed_count())
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.compute_card(item.person, item.expanded, index == self.selected_index))
            .collect();

        let heights: Vec<usize> = all_cards.iter().map(PersonCard::height).collect();
        let window = card_window(&heights, self.selected_index, available_rows);
        let cards = all_cards[window].to_vec();

        let empty_state = if cards.is_empty() {
            Some(self.compute_empty_state())
        } else {
            None
        };

        tracing::trace!(rows, cols, cards = cards.len(), "view model computed");

        UIViewModel {
            header: self.compute_header(),
            filter_bar: self.compute_filter_bar(),
            search_bar: self.compute_search_bar(),
            banner,
            cards,
            more,
            empty_state,
            footer: self.compute_footer(),
        }
    }

    fn compute_card(&self, person: &Person, is_expanded: bool, is_selected: bool) -> PersonCard {
        let highlight_ranges = self
            .query
            .highlight(Field::Name, &person.name)
            .map(|range| vec![(range.start, range.end)])
            .unwrap_or_default();

        let mut summary_parts = Vec::with_capacity(3);
        if !person.username.is_empty() {
            summary_parts.push(format!("@{}", person.username));
        }
        for field in [Field::City, Field::Company] {
            let value = person.field(field);
            if !value.is_empty() {
                summary_parts.push(value.to_string());
            }
        }

        let details = if is_expanded {
            DETAIL_FIELDS
                .iter()
                .filter_map(|&field| {
                    let value = person.field(field);
                    (!value.is_empty()).then(|| (field.label().to_string(), value.to_string()))
                })
                .collect()
        } else {
            Vec::new()
        };

        PersonCard {
            name: person.name.clone(),
            highlight_ranges,
            summary: summary_parts.join(" · "),
            is_selected,
            is_expanded,
            details,
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = if self.has_loaded {
            format!(" People ({}/{}) ", self.visible.len(), self.collection.len())
        } else {
            " People ".to_string()
        };

        let loaded = if self.has_loaded {
            format!("loaded {}", self.collection.loaded_ago(self.now_ms() / 1000))
        } else {
            "not loaded".to_string()
        };

        HeaderInfo {
            title,
            status: format!("{loaded} · {}", self.appearance),
        }
    }

    fn compute_filter_bar(&self) -> FilterBarInfo {
        let chips = self
            .facet_fields
            .iter()
            .filter_map(|&field| {
                facet_key(field).map(|key_hint| FacetChip {
                    key_hint,
                    label: field.label().to_string(),
                    selection: self.query.selection(field).map(str::to_string),
                    option_count: self.facets.values(field).len(),
                })
            })
            .collect();

        FilterBarInfo {
            chips,
            search_mode: self.query.mode().label().to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        self.input_mode.is_search().then(|| SearchBarInfo {
            query: self.query.search_text().to_string(),
            mode: self.query.mode().label().to_string(),
            typing: self.input_mode.is_typing(),
        })
    }

    fn compute_banner(&self) -> Option<Banner> {
        if self.loader.is_loading() {
            let message = if self.has_loaded {
                "Refreshing…".to_string()
            } else {
                "Loading people…".to_string()
            };
            return Some(Banner {
                kind: BannerKind::Loading,
                message,
            });
        }

        self.last_error.as_ref().map(|error| Banner {
            kind: BannerKind::Error,
            message: format!("Couldn't load people: {error} (r: retry)"),
        })
    }

    fn compute_more(&self) -> Option<MoreInfo> {
        let total = self.visible.len();
        if !self.pagination.has_more(total) {
            return None;
        }

        let remaining = self.pagination.remaining(total);
        let next_page = self
            .pagination
            .page_size()
            .map_or(remaining, |size| size.get().min(remaining));

        Some(MoreInfo {
            revealed: self.revealed_count(),
            total,
            next_page,
        })
    }

    fn compute_empty_state(&self) -> EmptyState {
        if !self.collection.is_empty() {
            return EmptyState {
                message: "No matches".to_string(),
                subtitle: "x: clear filters  /: edit search".to_string(),
            };
        }

        if self.loader.is_loading() {
            EmptyState {
                message: "Loading people".to_string(),
                subtitle: self.endpoint.clone(),
            }
        } else if self.last_error.is_some() {
            EmptyState {
                message: "Nothing to show".to_string(),
                subtitle: "r: retry".to_string(),
            }
        } else if self.has_loaded {
            EmptyState {
                message: "The directory is empty".to_string(),
                subtitle: "r: reload".to_string(),
            }
        } else {
            EmptyState {
                message: "Waiting for permission".to_string(),
                subtitle: "grant web access to load people".to_string(),
            }
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::Search(SearchFocus::Typing) => {
                "ESC: exit search  Tab: mode  Ctrl+n/p: navigate  Enter: results  Type to filter"
            }
            InputMode::Search(SearchFocus::Navigating) => {
                "ESC: exit search  /: edit query  j/k: navigate  Enter: expand  m: more"
            }
            InputMode::Normal => {
                "j/k: navigate  Enter: expand  m: more  /: search  c/o/g: filter  x: clear  r: reload  t: theme  q: quit"
            }
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

/// Key that cycles a facet in normal mode.
#[must_use]
pub const fn facet_key(field: Field) -> Option<char> {
    match field {
        Field::City => Some('c'),
        Field::Company => Some('o'),
        Field::Gender => Some('g'),
        _ => None,
    }
}

/// Picks the run of cards to draw so the selected card is on screen.
///
/// Cards before the selection may take up to half the rows, the rest go to
/// cards after it, and any space left over is handed back to earlier cards.
fn card_window(heights: &[usize], selected: usize, available_rows: usize) -> Range<usize> {
    if heights.is_empty() {
        return 0..0;
    }

    let selected = selected.min(heights.len() - 1);
    let mut start = selected;
    let mut end = selected + 1;
    let mut used = heights[selected];

    while start > 0 && used + heights[start - 1] <= available_rows / 2 {
        start -= 1;
        used += heights[start];
    }
    while end < heights.len() && used + heights[end] <= available_rows {
        used += heights[end];
        end += 1;
    }
    while start > 0 && used + heights[start - 1] <= available_rows {
        start -= 1;
        used += heights[start];
    }

    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Person, SourceFormat};

    fn fixed_clock() -> i64 {
        1_700_000_000_000
    }

    fn roster(count: usize) -> Collection {
        let people = (0..count)
            .map(|i| {
                let mut person = Person::new(format!("{i}").as_str(), format!("Person {i}"));
                person.city = if i % 2 == 0 { "Gwenborough" } else { "Wisokyburgh" }.to_string();
                person.company = format!("Company {}", i % 3);
                person.email = format!("person{i}@example.com");
                person
            })
            .collect();
        Collection::new(people, fixed_clock() / 1000, SourceFormat::Placeholder)
    }

    fn state(page_size: usize) -> AppState {
        let config = Config {
            page_size,
            ..Config::default()
        };
        let mut state = AppState::new(&config, ThemeSet::default());
        state.clock = fixed_clock;
        state
    }

    #[test]
    fn window_keeps_selection_visible() {
        let heights = vec![1; 20];
        assert_eq!(card_window(&heights, 0, 5), 0..5);
        assert_eq!(card_window(&heights, 10, 5), 9..14);
        assert_eq!(card_window(&heights, 19, 5), 15..20);
        assert_eq!(card_window(&[], 3, 5), 0..0);
    }

    #[test]
    fn window_accounts_for_expanded_cards() {
        let heights = vec![1, 7, 1, 1];
        let window = card_window(&heights, 2, 4);
        assert!(window.contains(&2));
        assert!(!window.contains(&1));
    }

    #[test]
    fn oversized_card_is_shown_alone() {
        assert_eq!(card_window(&[1, 9, 1], 1, 4), 1..2);
    }

    #[test]
    fn selection_wraps_over_revealed_cards_only() {
        let mut state = state(3);
        state.apply_collection(roster(10));
        assert_eq!(state.revealed_count(), 3);

        state.move_selection_up();
        assert_eq!(state.selected_index, 2);
        state.move_selection_down();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn viewmodel_marks_selected_and_expanded_cards() {
        let mut state = state(6);
        state.apply_collection(roster(10));
        state.move_selection_down();
        let id = state.selected_person().unwrap().id.clone();
        state.view_state.toggle(&id);

        let vm = state.compute_viewmodel(40, 80);
        assert_eq!(vm.cards.len(), 6);
        assert!(vm.cards[1].is_selected);
        assert!(vm.cards[1].is_expanded);
        assert!(vm.cards[1]
            .details
            .iter()
            .any(|(label, value)| label == "Email" && value == "person1@example.com"));
        assert_eq!(vm.more.as_ref().map(|m| (m.revealed, m.total, m.next_page)), Some((6, 10, 4)));
        assert!(vm.empty_state.is_none());
    }

    #[test]
    fn no_matches_is_an_empty_state_not_an_error() {
        let mut state = state(6);
        state.apply_collection(roster(4));
        state.query.set_search_text("zzz");
        state.refresh_visible();

        let vm = state.compute_viewmodel(24, 80);
        assert!(vm.cards.is_empty());
        assert!(vm.banner.is_none());
        assert_eq!(vm.empty_state.unwrap().message, "No matches");
    }

    #[test]
    fn search_highlights_name_matches() {
        let mut state = state(0);
        state.apply_collection(roster(3));
        state.query.set_search_text("son 2");
        state.refresh_visible();

        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.cards.len(), 1);
        assert_eq!(vm.cards[0].highlight_ranges, vec![(3, 8)]);
    }

    #[test]
    fn begin_load_schedules_timeout_when_configured() {
        let mut state = state(6);
        let actions = state.begin_load();
        assert!(matches!(actions[0], Action::Fetch { .. }));
        assert_eq!(actions[1], Action::ScheduleTimeout { seconds: 10.0 });

        let config = Config {
            request_timeout: 0,
            ..Config::default()
        };
        let mut untimed = AppState::new(&config, ThemeSet::default());
        assert_eq!(untimed.begin_load().len(), 1);
    }

    #[test]
    fn loading_banner_distinguishes_first_load_from_refresh() {
        let mut state = state(6);
        state.begin_load();
        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(
            vm.banner,
            Some(Banner {
                kind: BannerKind::Loading,
                message: "Loading people…".to_string(),
            })
        );
        assert!(vm.cards.is_empty());
        assert_eq!(vm.empty_state.map(|e| e.message), Some("Loading people".to_string()));

        state.apply_collection(roster(3));
        state.begin_load();
        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(
            vm.banner,
            Some(Banner {
                kind: BannerKind::Loading,
                message: "Refreshing…".to_string(),
            })
        );
        assert_eq!(vm.cards.len(), 3);
        assert!(vm.empty_state.is_none());
    }

    #[test]
    fn header_reports_counts_and_appearance() {
        let mut state = state(6);
        state.apply_collection(roster(10));
        state.query.select(Field::City, Some("Gwenborough"));
        state.refresh_visible();

        let header = state.compute_viewmodel(24, 80).header;
        assert_eq!(header.title, " People (5/10) ");
        assert_eq!(header.status, "loaded just now · dark");
    }
}
