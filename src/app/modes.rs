//! Input mode state machine.
//!
//! - **Normal**: single-key commands (navigate, expand, filter, reload)
//! - **Search**: keystrokes edit the search text while `Typing`; once the
//!   user switches to `Navigating`, the list keys work again but the search
//!   bar stays visible.

/// Focus within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Characters go into the search text.
    Typing,

    /// j/k move through the filtered cards; `/` returns to typing.
    Navigating,
}

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,

    Search(SearchFocus),
}

impl InputMode {
    #[must_use]
    pub const fn is_typing(self) -> bool {
        matches!(self, Self::Search(SearchFocus::Typing))
    }

    #[must_use]
    pub const fn is_search(self) -> bool {
        matches!(self, Self::Search(_))
    }
}
