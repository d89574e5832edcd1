//! Storage backend abstraction.
//!
//! This module defines the [`PreferenceStore`] trait the worker talks to, so
//! the worker can be exercised against an in-memory store in tests and
//! against [`JsonPreferenceStore`](crate::storage::JsonPreferenceStore) in the
//! plugin.

use crate::domain::error::Result;

/// Key/value preference persistence.
///
/// # Examples
///
/// ```no_run
/// use rosterview::storage::{JsonPreferenceStore, PreferenceStore};
/// use std::path::PathBuf;
///
/// let mut store = JsonPreferenceStore::new(PathBuf::from("/tmp/preferences.json"))?;
/// store.set("theme", "light")?;
/// assert_eq!(store.get("theme")?.as_deref(), Some("light"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait PreferenceStore: Send {
    /// Returns the stored value for `key`, or `Ok(None)` if it was never set.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` and persists it before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
