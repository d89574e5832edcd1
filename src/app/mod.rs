//! Application layer: the data-view controller.
//!
//! Sits between the plugin shim (main.rs) and the pipeline, storage and
//! worker layers.
//!
//! ```text
//! Keys / web responses / timers → Events → handle_event → AppState → Actions
//!                                   ↑                                   ↓
//!                                   └────────── Worker responses ───────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and pipeline re-entry
//! - [`modes`]: Input mode state machine types
//! - [`state`]: Controller state and view model computation
//!
//! # Example
//!
//! ```rust
//! use rosterview::app::{handle_event, AppState, Event};
//! use rosterview::ui::ThemeSet;
//! use rosterview::Config;
//!
//! let mut state = AppState::new(&Config::default(), ThemeSet::default());
//! let (_render, actions) = handle_event(&mut state, &Event::Reload)?;
//! assert!(!actions.is_empty());
//! # Ok::<(), rosterview::RosterError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, SearchFocus};
pub use state::AppState;
