//! Storage layer for persisted user preferences.
//!
//! Preferences are a flat string-to-string map. The only key the plugin
//! writes today is [`crate::domain::THEME_PREFERENCE_KEY`].
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation

pub mod backend;
pub mod json;

pub use backend::PreferenceStore;
pub use json::JsonPreferenceStore;
