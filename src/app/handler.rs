//! Event handling and pipeline re-entry.
//!
//! [`handle_event`] is the only place [`AppState`] changes. Each event
//! re-enters the pipeline at the stage it affects and runs every stage after
//! it, so derived state never goes stale:
//!
//! | Event | Re-entered at |
//! |---|---|
//! | `LoadCompleted` (current request, success) | facets, then query onwards |
//! | `LoadCompleted` (failure), `Tick` expiry | error message only |
//! | search text, facet, mode and clear events | evaluate, then pagination reset |
//! | `LoadMore` | pagination advance |
//! | `ToggleExpanded`, `ToggleSelected` | view state |
//! | `ToggleTheme` | appearance, then persisted by the worker |
//! | `Reload` | loader, with a fresh request id |
//!
//! Every event is safe to deliver repeatedly. The returned flag tells the
//! plugin whether to re-render.

use crate::app::modes::{InputMode, SearchFocus};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{Appearance, Field, PersonId, THEME_PREFERENCE_KEY};
use crate::pipeline::{interpret_response, RequestId};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Inputs to the controller: user intents, host results and worker replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the selection down (wraps to top).
    KeyDown,
    /// Moves the selection up (wraps to bottom).
    KeyUp,
    /// Hides the plugin pane.
    CloseFocus,

    /// Enters search mode with typing focus.
    SearchMode,
    /// Returns focus to the search text from the results.
    FocusSearchBar,
    /// Moves focus from the search text to the results.
    FocusResults,
    /// Leaves search mode and clears the search text.
    ExitSearch,
    /// Appends a character to the search text.
    Char(char),
    /// Removes the last character of the search text.
    Backspace,
    /// Replaces the search text wholesale.
    SearchChanged(String),

    /// Restricts `field` to `value`. `None` or `""` lifts the restriction.
    FacetSelected { field: Field, value: Option<String> },
    /// Steps `field` to its next facet value, wrapping through "no restriction".
    CycleFacet(Field),
    CycleSearchMode,
    /// Clears search text and every facet selection.
    ClearFilters,

    ToggleExpanded(PersonId),
    /// Toggles the expand flag of the selected card.
    ToggleSelected,
    LoadMore,

    ToggleTheme,
    Reload,

    /// Outcome of the startup permission request.
    PermissionsResult { granted: bool },

    /// A fetch finished. `request_id` is echoed from the request context.
    LoadCompleted {
        request_id: RequestId,
        status: u16,
        body: Vec<u8>,
    },

    /// Timer fired at `now_ms` (unix milliseconds).
    Tick { now_ms: i64 },

    WorkerResponse(WorkerResponse),
}

impl Event {
    /// Short name for logging. Avoids dumping response bodies into spans.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::KeyDown => "key_down",
            Self::KeyUp => "key_up",
            Self::CloseFocus => "close_focus",
            Self::SearchMode => "search_mode",
            Self::FocusSearchBar => "focus_search_bar",
            Self::FocusResults => "focus_results",
            Self::ExitSearch => "exit_search",
            Self::Char(_) => "char",
            Self::Backspace => "backspace",
            Self::SearchChanged(_) => "search_changed",
            Self::FacetSelected { .. } => "facet_selected",
            Self::CycleFacet(_) => "cycle_facet",
            Self::CycleSearchMode => "cycle_search_mode",
            Self::ClearFilters => "clear_filters",
            Self::ToggleExpanded(_) => "toggle_expanded",
            Self::ToggleSelected => "toggle_selected",
            Self::LoadMore => "load_more",
            Self::ToggleTheme => "toggle_theme",
            Self::Reload => "reload",
            Self::PermissionsResult { .. } => "permissions_result",
            Self::LoadCompleted { .. } => "load_completed",
            Self::Tick { .. } => "tick",
            Self::WorkerResponse(_) => "worker_response",
        }
    }
}

/// Processes an event and returns whether to re-render plus the actions to run.
///
/// # Errors
///
/// Currently infallible; load failures are reported through
/// [`AppState::last_error`] rather than returned.
///
/// # Example
///
/// ```rust
/// use rosterview::app::{handle_event, AppState, Event};
/// use rosterview::ui::ThemeSet;
/// use rosterview::Config;
///
/// let mut state = AppState::new(&Config::default(), ThemeSet::default());
/// let (render, actions) = handle_event(&mut state, &Event::KeyDown)?;
/// assert!(render);
/// assert!(actions.is_empty());
/// # Ok::<(), rosterview::RosterError>(())
/// ```
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();

    match event {
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),

        Event::SearchMode | Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            if state.input_mode.is_search() {
                state.input_mode = InputMode::Search(SearchFocus::Navigating);
            }
            Ok((true, vec![]))
        }
        Event::ExitSearch => {
            state.input_mode = InputMode::Normal;
            if state.query.set_search_text("") {
                state.refresh_visible();
            }
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            state.query.push_char(*c);
            state.refresh_visible();
            Ok((true, vec![]))
        }
        Event::Backspace => {
            let changed = state.query.pop_char();
            if changed {
                state.refresh_visible();
            }
            Ok((changed, vec![]))
        }
        Event::SearchChanged(text) => {
            let changed = state.query.set_search_text(text);
            if changed {
                state.refresh_visible();
            }
            Ok((changed, vec![]))
        }

        Event::FacetSelected { field, value } => Ok((select_facet(state, *field, value.as_deref()), vec![])),
        Event::CycleFacet(field) => {
            let next = state
                .facets
                .next_value(*field, state.query.selection(*field))
                .map(str::to_string);
            tracing::debug!(field = field.key(), next = ?next, "cycling facet");
            Ok((select_facet(state, *field, next.as_deref()), vec![]))
        }
        Event::CycleSearchMode => {
            let mode = state.query.mode().next();
            if state.query.set_mode(mode) {
                state.refresh_visible();
            }
            Ok((true, vec![]))
        }
        Event::ClearFilters => {
            let changed = state.query.clear();
            if changed {
                state.refresh_visible();
            }
            Ok((changed, vec![]))
        }

        Event::ToggleExpanded(id) => Ok((toggle_expanded(state, id), vec![])),
        Event::ToggleSelected => {
            let Some(id) = state.selected_person().map(|person| person.id.clone()) else {
                tracing::debug!("no card selected");
                return Ok((false, vec![]));
            };
            Ok((toggle_expanded(state, &id), vec![]))
        }
        Event::LoadMore => {
            let changed = state.load_more();
            tracing::debug!(
                changed,
                revealed = state.pagination.revealed(),
                visible = state.visible.len(),
                "load more"
            );
            Ok((changed, vec![]))
        }

        Event::ToggleTheme => {
            let action = state.toggle_appearance();
            Ok((true, vec![action]))
        }
        Event::Reload => Ok((true, state.begin_load())),

        Event::PermissionsResult { granted } => {
            let mut actions = vec![Action::PostToWorker(WorkerMessage::load_preference(
                THEME_PREFERENCE_KEY.to_string(),
            ))];

            if *granted {
                actions.extend(state.begin_load());
            } else {
                tracing::warn!("web access permission denied");
                state.last_error = Some("web access permission denied".to_string());
            }
            Ok((true, actions))
        }

        Event::LoadCompleted {
            request_id,
            status,
            body,
        } => Ok((complete_load(state, *request_id, *status, body), vec![])),

        Event::Tick { now_ms } => {
            let Some(expired) = state.loader.expire(*now_ms) else {
                return Ok((false, vec![]));
            };
            let seconds = state.loader.timeout().map_or(0, |t| t.as_secs());
            tracing::warn!(request_id = %expired, seconds, "load timed out");
            state.last_error = Some(format!("request timed out after {seconds}s"));
            Ok((true, vec![]))
        }

        Event::WorkerResponse(response) => Ok((handle_worker_response(state, response), vec![])),
    }
}

fn select_facet(state: &mut AppState, field: Field, value: Option<&str>) -> bool {
    if !state.facets.is_facet(field) {
        tracing::warn!(field = field.key(), "ignoring selection for a field that is not a facet");
        return false;
    }
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        if !state.facets.contains(field, value) {
            tracing::warn!(field = field.key(), value, "ignoring unknown facet value");
            return false;
        }
    }

    let changed = state.query.select(field, value);
    if changed {
        state.refresh_visible();
    }
    changed
}

fn toggle_expanded(state: &mut AppState, id: &PersonId) -> bool {
    if state.collection.find(id).is_none() {
        tracing::debug!(%id, "ignoring toggle for unknown person");
        return false;
    }
    let expanded = state.view_state.toggle(id);
    tracing::debug!(%id, expanded, "toggled card");
    true
}

fn complete_load(state: &mut AppState, request_id: RequestId, status: u16, body: &[u8]) -> bool {
    if !state.loader.settle(request_id) {
        return false;
    }

    match interpret_response(status, body, state.now_ms() / 1000) {
        Ok(collection) => {
            tracing::info!(%request_id, people = collection.len(), format = ?collection.format, "collection loaded");
            state.apply_collection(collection);
        }
        Err(e) => {
            tracing::warn!(%request_id, status, error = %e, "load failed, keeping previous collection");
            state.last_error = Some(e.user_message());
        }
    }
    true
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> bool {
    match response {
        WorkerResponse::PreferenceLoaded { key, value } if key == THEME_PREFERENCE_KEY => {
            if state.preference_touched {
                tracing::debug!("theme already toggled, ignoring stored preference");
                return false;
            }
            match value.as_deref().map(Appearance::parse) {
                Some(Some(appearance)) => {
                    tracing::debug!(%appearance, "restored theme preference");
                    state.appearance = appearance;
                    true
                }
                Some(None) => {
                    tracing::warn!(value = ?value, "ignoring unrecognised theme preference");
                    false
                }
                None => false,
            }
        }
        WorkerResponse::PreferenceLoaded { key, .. } => {
            tracing::debug!(key, "ignoring unrelated preference");
            false
        }
        WorkerResponse::PreferenceSaved { key } => {
            tracing::debug!(key, "preference saved");
            false
        }
        WorkerResponse::Error { message } => {
            tracing::error!(error = %message, "worker error");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::ThemeSet;
    use crate::Config;

    const USERS: &str = r#"[
        {"id": 1, "name": "Leanne Graham", "username": "Bret", "address": {"city": "Gwenborough"}, "company": {"name": "Romaguera-Crona"}},
        {"id": 2, "name": "Ervin Howell", "username": "Antonette", "address": {"city": "Wisokyburgh"}, "company": {"name": "Deckow-Crist"}},
        {"id": 3, "name": "Clementine Bauch", "username": "Samantha", "address": {"city": "McKenziehaven"}, "company": {"name": "Romaguera-Jacobson"}}
    ]"#;

    fn clock() -> i64 {
        1_700_000_000_000
    }

    fn new_state() -> AppState {
        let mut state = AppState::new(&Config::default(), ThemeSet::default());
        state.clock = clock;
        state
    }

    fn fetched_id(actions: &[Action]) -> RequestId {
        actions
            .iter()
            .find_map(|action| match action {
                Action::Fetch { request_id, .. } => Some(*request_id),
                _ => None,
            })
            .expect("a fetch action")
    }

    fn loaded_state() -> AppState {
        let mut state = new_state();
        let (_, actions) = handle_event(&mut state, &Event::Reload).unwrap();
        let request_id = fetched_id(&actions);
        handle_event(
            &mut state,
            &Event::LoadCompleted {
                request_id,
                status: 200,
                body: USERS.as_bytes().to_vec(),
            },
        )
        .unwrap();
        state
    }

    #[test]
    fn granted_permission_loads_preference_and_collection() {
        let mut state = new_state();
        let (render, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true }).unwrap();

        assert!(render);
        assert!(matches!(&actions[0], Action::PostToWorker(WorkerMessage::LoadPreference { key, .. }) if key == "theme"));
        assert!(matches!(&actions[1], Action::Fetch { url, .. } if url == &state.endpoint));
        assert!(state.loader.is_loading());
    }

    #[test]
    fn denied_permission_reports_error() {
        let mut state = new_state();
        let (_, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: false }).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(state.last_error.as_deref(), Some("web access permission denied"));
    }

    #[test]
    fn successful_load_derives_facets_and_visible_set() {
        let state = loaded_state();
        assert!(!state.loader.is_loading());
        assert_eq!(state.visible, [0, 1, 2]);
        assert_eq!(
            state.facets.values(Field::Company),
            ["Romaguera-Crona", "Deckow-Crist", "Romaguera-Jacobson"]
        );
    }

    #[test]
    fn failed_reload_keeps_previous_collection() {
        let mut state = loaded_state();
        let (_, actions) = handle_event(&mut state, &Event::Reload).unwrap();
        let request_id = fetched_id(&actions);

        handle_event(
            &mut state,
            &Event::LoadCompleted {
                request_id,
                status: 503,
                body: b"Service Unavailable".to_vec(),
            },
        )
        .unwrap();

        assert_eq!(state.collection.len(), 3);
        assert_eq!(state.visible.len(), 3);
        assert_eq!(state.last_error.as_deref(), Some("HTTP 503: Service Unavailable"));
    }

    #[test]
    fn malformed_body_is_reported() {
        let mut state = new_state();
        let (_, actions) = handle_event(&mut state, &Event::Reload).unwrap();
        handle_event(
            &mut state,
            &Event::LoadCompleted {
                request_id: fetched_id(&actions),
                status: 200,
                body: br#"{"users": 3}"#.to_vec(),
            },
        )
        .unwrap();
        assert!(state.last_error.is_some());
        assert!(!state.has_loaded);
    }

    #[test]
    fn facet_selection_filters_without_shrinking_facets() {
        let mut state = loaded_state();
        let event = Event::FacetSelected {
            field: Field::City,
            value: Some("Wisokyburgh".to_string()),
        };
        assert!(handle_event(&mut state, &event).unwrap().0);
        assert_eq!(state.visible, [1]);
        assert_eq!(state.facets.values(Field::City).len(), 3);

        // Repeating the same selection is a no-op.
        assert!(!handle_event(&mut state, &event).unwrap().0);

        let clear = Event::FacetSelected {
            field: Field::City,
            value: None,
        };
        handle_event(&mut state, &clear).unwrap();
        assert_eq!(state.visible, [0, 1, 2]);
    }

    #[test]
    fn unknown_facet_values_are_ignored() {
        let mut state = loaded_state();
        let event = Event::FacetSelected {
            field: Field::City,
            value: Some("Atlantis".to_string()),
        };
        assert!(!handle_event(&mut state, &event).unwrap().0);
        assert_eq!(state.visible.len(), 3);
    }

    #[test]
    fn cycle_facet_walks_values_and_back_to_all() {
        let mut state = loaded_state();
        let mut seen = Vec::new();
        for _ in 0..4 {
            handle_event(&mut state, &Event::CycleFacet(Field::City)).unwrap();
            seen.push(state.query.selection(Field::City).map(str::to_string));
        }
        assert_eq!(
            seen,
            [
                Some("Gwenborough".to_string()),
                Some("Wisokyburgh".to_string()),
                Some("McKenziehaven".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn typing_filters_and_exit_search_restores() {
        let mut state = loaded_state();
        handle_event(&mut state, &Event::SearchMode).unwrap();
        for c in "ERV".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }
        assert_eq!(state.visible, [1]);

        handle_event(&mut state, &Event::ExitSearch).unwrap();
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.visible, [0, 1, 2]);
    }

    #[test]
    fn expand_state_survives_search_changes() {
        let mut state = loaded_state();
        let id = PersonId::from(2);
        handle_event(&mut state, &Event::ToggleExpanded(id.clone())).unwrap();

        handle_event(&mut state, &Event::SearchChanged("leanne".to_string())).unwrap();
        assert_eq!(state.visible, [0]);
        assert!(state.view_state.is_expanded(&id));

        handle_event(&mut state, &Event::SearchChanged(String::new())).unwrap();
        assert!(state.view_state.is_expanded(&id));
    }

    #[test]
    fn toggle_selected_uses_the_cursor() {
        let mut state = loaded_state();
        handle_event(&mut state, &Event::KeyDown).unwrap();
        handle_event(&mut state, &Event::ToggleSelected).unwrap();
        assert!(state.view_state.is_expanded(&PersonId::from(2)));
    }

    #[test]
    fn superseded_response_is_discarded() {
        let mut state = new_state();
        let (_, first) = handle_event(&mut state, &Event::Reload).unwrap();
        let (_, second) = handle_event(&mut state, &Event::Reload).unwrap();

        let late = Event::LoadCompleted {
            request_id: fetched_id(&first),
            status: 200,
            body: br#"[{"id": 9, "name": "Stale"}]"#.to_vec(),
        };
        assert!(!handle_event(&mut state, &late).unwrap().0);
        assert!(!state.has_loaded);

        let fresh = Event::LoadCompleted {
            request_id: fetched_id(&second),
            status: 200,
            body: USERS.as_bytes().to_vec(),
        };
        handle_event(&mut state, &fresh).unwrap();
        assert_eq!(state.collection.len(), 3);

        // The stale one arriving after the fresh one changes nothing either.
        handle_event(&mut state, &late).unwrap();
        assert_eq!(state.collection.len(), 3);
    }

    #[test]
    fn tick_expires_slow_request() {
        let mut state = new_state();
        let (_, actions) = handle_event(&mut state, &Event::Reload).unwrap();

        assert!(!handle_event(&mut state, &Event::Tick { now_ms: clock() + 5_000 }).unwrap().0);
        assert!(handle_event(&mut state, &Event::Tick { now_ms: clock() + 10_000 }).unwrap().0);
        assert_eq!(state.last_error.as_deref(), Some("request timed out after 10s"));

        let late = Event::LoadCompleted {
            request_id: fetched_id(&actions),
            status: 200,
            body: USERS.as_bytes().to_vec(),
        };
        handle_event(&mut state, &late).unwrap();
        assert!(!state.has_loaded);
    }

    #[test]
    fn theme_toggle_persists_and_wins_over_late_preference() {
        let mut state = new_state();
        let (_, actions) = handle_event(&mut state, &Event::ToggleTheme).unwrap();
        assert_eq!(state.appearance, Appearance::Light);
        assert!(matches!(
            &actions[0],
            Action::PostToWorker(WorkerMessage::SavePreference { key, value, .. }) if key == "theme" && value == "light"
        ));

        let stored = Event::WorkerResponse(WorkerResponse::PreferenceLoaded {
            key: "theme".to_string(),
            value: Some("dark".to_string()),
        });
        handle_event(&mut state, &stored).unwrap();
        assert_eq!(state.appearance, Appearance::Light);
    }

    #[test]
    fn stored_preference_applies_at_startup() {
        let mut state = new_state();
        let stored = Event::WorkerResponse(WorkerResponse::PreferenceLoaded {
            key: "theme".to_string(),
            value: Some("light".to_string()),
        });
        assert!(handle_event(&mut state, &stored).unwrap().0);
        assert_eq!(state.theme().name, "catppuccin-latte");

        let garbage = Event::WorkerResponse(WorkerResponse::PreferenceLoaded {
            key: "theme".to_string(),
            value: Some("sepia".to_string()),
        });
        assert!(!handle_event(&mut state, &garbage).unwrap().0);
        assert_eq!(state.appearance, Appearance::Light);
    }

    #[test]
    fn load_more_reveals_next_page() {
        let mut state = new_state();
        let body: Vec<String> = (1..=10)
            .map(|i| format!(r#"{{"id": {i}, "name": "Person {i}"}}"#))
            .collect();
        let (_, actions) = handle_event(&mut state, &Event::Reload).unwrap();
        handle_event(
            &mut state,
            &Event::LoadCompleted {
                request_id: fetched_id(&actions),
                status: 200,
                body: format!("[{}]", body.join(",")).into_bytes(),
            },
        )
        .unwrap();

        assert_eq!(state.revealed_count(), 6);
        assert!(handle_event(&mut state, &Event::LoadMore).unwrap().0);
        assert_eq!(state.revealed_count(), 10);
        assert!(!handle_event(&mut state, &Event::LoadMore).unwrap().0);
    }
}
