//! Path helpers for the Zellij plugin sandbox.

use std::path::PathBuf;

/// Returns the plugin's persistent data directory.
///
/// Zellij maps `/data` to a per-plugin folder that outlives the session, which
/// is where preferences and trace files go.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/data")
}

/// Location of the JSON preference store.
#[must_use]
pub fn preferences_file() -> PathBuf {
    get_data_dir().join("preferences.json")
}

/// Location of the OTLP-JSON span file.
#[must_use]
pub fn trace_file() -> PathBuf {
    get_data_dir().join("otlp.json")
}

/// Expands tilde paths to use the `/host` prefix for the Zellij sandbox.
///
/// Used for user-supplied theme files.
///
/// # Examples
///
/// ```
/// use rosterview::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/nord.toml"), "/host/themes/nord.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}
