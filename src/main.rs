//! Zellij plugin wrapper and entry point.
//!
//! The only module that talks to Zellij. It translates host events into
//! [`rosterview::Event`]s, runs [`handle_event`], and performs the returned
//! [`Action`]s with Zellij API calls.
//!
//! ```text
//! ┌──────────────────────────────┐        ┌──────────────────────────┐
//! │  State (plugin)              │  JSON  │  RosterWorker (worker)   │
//! │  keys, web responses, timers │ ─────▶ │  preferences.json        │
//! │  → handle_event → Actions    │ ◀───── │  PreferenceWorker        │
//! └──────────────────────────────┘        └──────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: parse config, initialize tracing, build `AppState`, request
//!    `WebAccess`, subscribe to events
//! 2. **Permission result**: ask the worker for the stored theme and, if
//!    granted, issue the first fetch
//! 3. **Update**: map events, delegate to the library, execute actions
//! 4. **Render**: delegate to the library renderer
//!
//! # Keybindings
//!
//! Global: `Ctrl+n` / `Ctrl+p` move down / up.
//!
//! Normal mode:
//! - `j`/`Down`, `k`/`Up`: move
//! - `Enter`/`Space`: expand or collapse the selected card
//! - `m`/`PageDown`: show more
//! - `/`: search, `Tab`: cycle search mode
//! - `c`/`o`/`g`: cycle the city / company / gender facet, `x`: clear filters
//! - `r`: reload, `t`: toggle theme
//! - `q`/`Esc`: close
//!
//! Search mode, typing: characters edit the query, `Enter` moves to the
//! results, `Esc` leaves search. Search mode, navigating: list keys as in
//! normal mode, `/` edits the query again.

#![allow(clippy::multiple_crate_versions)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, post_message_to_plugin};

use rosterview::app::state::facet_key;
use rosterview::pipeline::loader::REQUEST_ID_CONTEXT_KEY;
use rosterview::pipeline::RequestId;
use rosterview::worker::{PreferenceWorker, WorkerMessage, WorkerResponse, WORKER_NAME};
use rosterview::{handle_event, Action, AppState, Config, Event, InputMode, SearchFocus};

register_plugin!(State);
register_worker!(RosterWorker, rosterview_worker, ROSTERVIEW_WORKER);

/// Plugin state wrapper.
struct State {
    app: AppState,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: rosterview::initialize(&Config::default()),
        }
    }
}

impl ZellijPlugin for State {
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        rosterview::observability::init_tracing(&config);

        let _guard = tracing::debug_span!("plugin_load").entered();
        tracing::debug!(?config, "parsed configuration");

        self.app = rosterview::initialize(&config);

        request_permission(&[PermissionType::WebAccess]);
        subscribe(&[
            EventType::Key,
            EventType::WebRequestResult,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
            EventType::Timer,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", otel.name = %format!("plugin_update::{event_name}"), event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => self.map_key_event(key),
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                Self::map_web_request_result(status, body, &context)
            }
            zellij_tile::prelude::Event::Timer(_) => Some(Event::Tick {
                now_ms: self.app.now_ms(),
            }),
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                Self::map_custom_message_event(&message, &payload)
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => Some(Event::PermissionsResult {
                granted: matches!(status, PermissionStatus::Granted),
            }),
            _ => None,
        };

        let Some(our_event) = our_event else {
            return false;
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in &actions {
                    Self::execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        rosterview::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            zellij_tile::prelude::Event::CustomMessage(name, _) => format!("CustomMessage({name})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::KeyDown),
                BareKey::Char('p') => Some(Event::KeyUp),
                _ => None,
            };
        }

        match self.app.input_mode {
            InputMode::Search(SearchFocus::Typing) => Some(match key.bare_key {
                BareKey::Esc => Event::ExitSearch,
                BareKey::Enter => Event::FocusResults,
                BareKey::Tab => Event::CycleSearchMode,
                BareKey::Backspace => Event::Backspace,
                BareKey::Down => Event::KeyDown,
                BareKey::Up => Event::KeyUp,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            }),
            InputMode::Search(SearchFocus::Navigating) => match key.bare_key {
                BareKey::Esc => Some(Event::ExitSearch),
                BareKey::Char('/') | BareKey::Backspace => Some(Event::FocusSearchBar),
                _ => self.map_list_key(key.bare_key),
            },
            InputMode::Normal => match key.bare_key {
                BareKey::Esc | BareKey::Char('q') => Some(Event::CloseFocus),
                BareKey::Char('/') => Some(Event::SearchMode),
                BareKey::Char('r') => Some(Event::Reload),
                BareKey::Char('t') => Some(Event::ToggleTheme),
                BareKey::Char('x') => Some(Event::ClearFilters),
                _ => self.map_list_key(key.bare_key),
            },
        }
    }

    /// Keys shared by normal mode and search navigation.
    fn map_list_key(&self, key: BareKey) -> Option<Event> {
        match key {
            BareKey::Down | BareKey::Char('j') => Some(Event::KeyDown),
            BareKey::Up | BareKey::Char('k') => Some(Event::KeyUp),
            BareKey::Enter | BareKey::Char(' ') => Some(Event::ToggleSelected),
            BareKey::PageDown | BareKey::Char('m') => Some(Event::LoadMore),
            BareKey::Tab => Some(Event::CycleSearchMode),
            BareKey::Char(c) => self
                .app
                .facet_fields
                .iter()
                .find(|&&field| facet_key(field) == Some(c))
                .map(|&field| Event::CycleFacet(field)),
            _ => None,
        }
    }

    fn map_web_request_result(status: u16, body: Vec<u8>, context: &BTreeMap<String, String>) -> Option<Event> {
        let Some(request_id) = context
            .get(REQUEST_ID_CONTEXT_KEY)
            .and_then(|id| RequestId::parse(id))
        else {
            tracing::warn!(status, "web response without a request id");
            return None;
        };

        tracing::debug!(%request_id, status, body_len = body.len(), "web response");
        Some(Event::LoadCompleted {
            request_id,
            status,
            body,
        })
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        serde_json::from_str::<WorkerResponse>(payload)
            .map(Event::WorkerResponse)
            .map_err(|e| tracing::warn!(error = %e, "failed to deserialize worker response"))
            .ok()
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize worker message"),
        }
    }

    #[tracing::instrument(level = "debug")]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => hide_self(),
            Action::PostToWorker(message) => Self::post_worker_message(message),
            Action::Fetch { url, request_id } => {
                let headers = BTreeMap::from([("Accept".to_string(), "application/json".to_string())]);
                let context = BTreeMap::from([(REQUEST_ID_CONTEXT_KEY.to_string(), request_id.to_string())]);
                web_request(url, HttpVerb::Get, headers, Vec::new(), context);
            }
            Action::ScheduleTimeout { seconds } => set_timeout(*seconds),
        }
    }
}

/// Worker entry point. Payload handling lives in [`PreferenceWorker`]; this
/// wrapper only adds the Zellij plumbing.
#[derive(Default, Serialize, Deserialize)]
struct RosterWorker {
    #[serde(skip)]
    inner: PreferenceWorker,
}

impl ZellijWorker<'_> for RosterWorker {
    fn on_message(&mut self, message: String, payload: String) {
        rosterview::observability::init_worker_tracing();

        if let Some(reply) = self.inner.handle_payload(&payload) {
            post_message_to_plugin(PluginMessage {
                name: message,
                payload: reply,
                worker_name: None,
            });
        }
    }
}
