//! Theme management and ANSI escape sequence generation.
//!
//! Two themes are active at any time, one per [`Appearance`]. Each can be a
//! built-in Catppuccin flavour or a custom TOML file.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: dark (default for [`Appearance::Dark`])
//! - `catppuccin-latte`: light (default for [`Appearance::Light`])
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! error_fg = "#f38ba8"
//! chip_fg = "#1e1e2e"
//! chip_bg = "#89b4fa"
//! detail_fg = "#a6adc8"
//! ```

use crate::domain::error::{Result, RosterError};
use crate::domain::Appearance;
use crate::infrastructure::paths::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Color scheme for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    pub colors: ThemeColors,
}

/// Colors for every UI element, as hex strings (e.g. `"#cdd6f4"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_bg: Option<String>,

    /// Selected card foreground.
    pub selection_fg: String,
    /// Selected card background.
    pub selection_bg: String,

    pub text_normal: String,
    /// Secondary text: summaries, footer, counters.
    pub text_dim: String,

    pub border: String,

    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// Load failure banner.
    pub error_fg: String,

    /// Active facet filter chips.
    pub chip_fg: String,
    pub chip_bg: String,

    /// Expanded card detail rows.
    pub detail_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| RosterError::Theme(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| RosterError::Theme(format!("failed to parse {}: {e}", path.display())))
    }

    /// Built-in default for `appearance`.
    #[must_use]
    pub fn default_for(appearance: Appearance) -> Self {
        match appearance {
            Appearance::Dark => Self::default(),
            Appearance::Light => Self::from_name("catppuccin-latte").unwrap_or_default(),
        }
    }

    /// Resolves a configured theme: a built-in name, or a path to a TOML file.
    ///
    /// Falls back to the built-in default for `appearance` if the file cannot
    /// be loaded.
    #[must_use]
    pub fn resolve(name_or_path: &str, appearance: Appearance) -> Self {
        if let Some(theme) = Self::from_name(name_or_path) {
            return theme;
        }

        let path = expand_tilde(name_or_path);
        Self::from_file(&path).unwrap_or_else(|e| {
            tracing::warn!(theme = %name_or_path, error = %e, "failed to load theme, using default");
            Self::default_for(appearance)
        })
    }

    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// ANSI 24-bit foreground escape for a hex color.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background escape for a hex color.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    ///
    /// # Panics
    ///
    /// Panics if the embedded theme fails to parse, which the theme tests rule out.
    fn default() -> Self {
        Self::from_name("catppuccin-mocha").expect("built-in catppuccin-mocha theme should always parse")
    }
}

/// The dark and light themes the user toggles between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSet {
    pub dark: Theme,
    pub light: Theme,
}

impl ThemeSet {
    #[must_use]
    pub const fn get(&self, appearance: Appearance) -> &Theme {
        match appearance {
            Appearance::Dark => &self.dark,
            Appearance::Light => &self.light,
        }
    }
}

impl Default for ThemeSet {
    fn default() -> Self {
        Self {
            dark: Theme::default_for(Appearance::Dark),
            light: Theme::default_for(Appearance::Light),
        }
    }
}
