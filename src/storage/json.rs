//! JSON file-based preference storage.
//!
//! Preferences live in a small human-readable JSON file. Writes go to a
//! temporary sibling first and are renamed into place, so a crash never leaves
//! a half-written file behind.

use crate::domain::error::{Result, RosterError};
use crate::storage::backend::PreferenceStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferenceData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    preferences: BTreeMap<String, String>,
}

impl Default for PreferenceData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            preferences: BTreeMap::new(),
        }
    }
}

/// JSON file preference store.
///
/// The whole map is held in memory and written back on every change.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "preferences": {
///     "theme": "light"
///   }
/// }
/// ```
pub struct JsonPreferenceStore {
    file_path: PathBuf,
    data: PreferenceData,
    /// Set when `data` differs from what is on disk.
    dirty: bool,
}

impl JsonPreferenceStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store; nothing is written until the
    /// first [`set`](PreferenceStore::set).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening preference store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no preference file yet, starting empty");
            PreferenceData::default()
        };

        tracing::debug!(preference_count = data.preferences.len(), "preference store ready");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<PreferenceData> {
        let contents = std::fs::read_to_string(path)?;
        let data: PreferenceData = serde_json::from_str(&contents)
            .map_err(|e| RosterError::Storage(format!("failed to parse preferences: {e}")))?;

        if data.version > FORMAT_VERSION {
            tracing::warn!(version = data.version, "preference file is from a newer version");
        }

        Ok(data)
    }

    /// Writes the map to disk using a temp file and rename.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| RosterError::Storage(format!("failed to serialize preferences: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "preferences saved");
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.data.preferences.get(key).cloned();
        tracing::debug!(key, found = value.is_some(), "preference lookup");
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_set_preference", key, value).entered();

        if self.data.preferences.get(key).map(String::as_str) == Some(value) && self.file_path.exists() {
            return Ok(());
        }

        self.data.preferences.insert(key.to_string(), value.to_string());
        self.data.version = FORMAT_VERSION;
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonPreferenceStore {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty preferences on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save preferences on drop");
            }
        }
    }
}
