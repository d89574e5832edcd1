//! Rosterview: a Zellij plugin for browsing a people directory.
//!
//! Rosterview fetches a JSON list of people and lets you:
//! - Search by name, city, company or any field
//! - Narrow the list with facet filters derived from the data itself
//! - Page through results incrementally
//! - Expand individual cards for contact details
//! - Switch between a dark and a light theme, remembered across sessions
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Controller
//! │  - Event handling, pipeline re-entry                │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Pipeline      │   │ UI Layer      │   │ Worker Layer  │
//! │ (pipeline/)   │   │ (ui/)         │   │ (worker/)     │
//! │ - Loader      │   │ - Rendering   │   │ - Preferences │
//! │ - Facets      │   │ - Theming     │   │ - IPC bridge  │
//! │ - Query       │   │ - Components  │   └───────────────┘
//! │ - Pagination  │   └───────────────┘           │
//! │ - View state  │                     ┌───────────────┐
//! └───────────────┘                     │ Storage Layer │
//!         │                             │ (storage/)    │
//!         │                             └───────────────┘
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Paths (infrastructure/)                          │
//! │  - People, decoding, errors (domain/)               │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing to a rotated OTLP file     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/rosterview.wasm" {
//!         endpoint "https://randomuser.me/api/?results=60"
//!         page_size "8"
//!         facets "city,gender"
//!         search_mode "any"
//!         appearance "light"
//!         trace_level "debug"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use rosterview::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! let (_, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true })?;
//! assert!(actions.iter().any(|action| matches!(action, Action::Fetch { .. })));
//! # Ok::<(), rosterview::RosterError>(())
//! ```
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Terminal**: Any ANSI-capable terminal emulator

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod pipeline;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus};
pub use domain::{Appearance, Field, Result, RosterError};
pub use pipeline::SearchMode;
pub use ui::{Theme, ThemeSet};

use std::collections::BTreeMap;

const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";
const DEFAULT_PAGE_SIZE: usize = 6;
const DEFAULT_FACETS: [Field; 3] = [Field::City, Field::Company, Field::Gender];
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL of the JSON people collection.
    pub endpoint: String,

    /// Cards revealed per page. `0` reveals everything at once. Default: 6
    pub page_size: usize,

    /// Fields offered as facet filters, in display order.
    pub facets: Vec<Field>,

    /// Fields the search text initially matches against.
    pub search_mode: SearchMode,

    /// Seconds before a pending load is abandoned. `0` waits forever.
    pub request_timeout: u64,

    /// Appearance used until the stored preference arrives.
    pub appearance: Appearance,

    /// Built-in theme name or TOML file for the dark appearance.
    pub dark_theme: String,

    /// Built-in theme name or TOML file for the light appearance.
    pub light_theme: String,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            facets: DEFAULT_FACETS.to_vec(),
            search_mode: SearchMode::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            appearance: Appearance::default(),
            dark_theme: "catppuccin-mocha".to_string(),
            light_theme: "catppuccin-latte".to_string(),
            trace_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Never fails: missing or unparsable values fall back to their defaults
    /// with a warning.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use rosterview::{Config, Field};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("facets".to_string(), "gender, city".to_string());
    /// map.insert("page_size".to_string(), "0".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.facets, vec![Field::Gender, Field::City]);
    /// assert_eq!(config.page_size, 0);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| config.get(key).map(|value| value.trim()).filter(|value| !value.is_empty());

        let endpoint = get("endpoint").map_or(defaults.endpoint, str::to_string);

        let page_size = parse_or(get("page_size"), "page_size", defaults.page_size, |s| s.parse().ok());

        let facets = get("facets")
            .map(|value| {
                value
                    .split(',')
                    .filter(|key| !key.trim().is_empty())
                    .filter_map(|key| {
                        let field = Field::from_key(key);
                        if field.is_none() {
                            tracing::warn!(key, "ignoring unknown facet field");
                        }
                        field
                    })
                    .fold(Vec::new(), |mut fields, field| {
                        if !fields.contains(&field) {
                            fields.push(field);
                        }
                        fields
                    })
            })
            .filter(|fields: &Vec<Field>| !fields.is_empty())
            .unwrap_or(defaults.facets);

        let search_mode = parse_or(get("search_mode"), "search_mode", defaults.search_mode, SearchMode::from_key);

        let request_timeout = parse_or(
            get("request_timeout"),
            "request_timeout",
            defaults.request_timeout,
            |s| s.parse().ok(),
        );

        let appearance = parse_or(get("appearance"), "appearance", defaults.appearance, Appearance::parse);

        Self {
            endpoint,
            page_size,
            facets,
            search_mode,
            request_timeout,
            appearance,
            dark_theme: get("dark_theme").map_or(defaults.dark_theme, str::to_string),
            light_theme: get("light_theme").map_or(defaults.light_theme, str::to_string),
            trace_level: get("trace_level").map_or(defaults.trace_level, str::to_string),
        }
    }
}

fn parse_or<T: std::fmt::Debug>(value: Option<&str>, key: &str, default: T, parse: impl FnOnce(&str) -> Option<T>) -> T {
    let Some(raw) = value else {
        return default;
    };
    parse(raw).unwrap_or_else(|| {
        tracing::warn!(key, value = raw, ?default, "invalid configuration value, using default");
        default
    })
}

/// Builds the controller state for `config`, resolving both themes.
///
/// Does not start loading; the shim waits for the web access permission and
/// then delivers [`Event::PermissionsResult`].
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(endpoint = %config.endpoint, "initializing rosterview plugin");

    let themes = ThemeSet {
        dark: Theme::resolve(&config.dark_theme, Appearance::Dark),
        light: Theme::resolve(&config.light_theme, Appearance::Light),
    };

    AppState::new(config, themes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = Config::from_zellij(&map(&[
            ("page_size", "lots"),
            ("request_timeout", "-1"),
            ("search_mode", "zip"),
            ("appearance", "sepia"),
            ("facets", "shoe_size"),
        ]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn facets_are_parsed_and_deduplicated() {
        let config = Config::from_zellij(&map(&[("facets", "City, department,company,,gender")]));
        assert_eq!(config.facets, vec![Field::City, Field::Company, Field::Gender]);
    }

    #[test]
    fn explicit_values_are_used() {
        let config = Config::from_zellij(&map(&[
            ("endpoint", " https://randomuser.me/api/?results=50 "),
            ("search_mode", "Any"),
            ("request_timeout", "0"),
            ("appearance", "LIGHT"),
            ("trace_level", "rosterview=debug"),
        ]));
        assert_eq!(config.endpoint, "https://randomuser.me/api/?results=50");
        assert_eq!(config.search_mode, SearchMode::Any);
        assert_eq!(config.request_timeout, 0);
        assert_eq!(config.appearance, Appearance::Light);
        assert_eq!(config.trace_level, "rosterview=debug");
    }

    #[test]
    fn initialize_resolves_both_themes() {
        let config = Config {
            dark_theme: "catppuccin-latte".to_string(),
            ..Config::default()
        };
        let state = initialize(&config);
        assert_eq!(state.themes.dark.name, "catppuccin-latte");
        assert_eq!(state.themes.light.name, "catppuccin-latte");
        assert_eq!(state.theme().name, "catppuccin-latte");
    }
}
