//! Boxed search input.

use crate::ui::helpers::{position_cursor, print_padded, text_width, truncate, truncate_start};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin on each side of the box.
const SEARCH_BOX_MARGIN: usize = 5;

/// Renders the three-row search box and returns the row after it.
///
/// ```text
///      ┌──────────────────────────────┐
///      │ Search (name): leanne▏       │
///      └──────────────────────────────┘
/// ```
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = Theme::fg(&theme.colors.search_bar_border);

    position_cursor(row, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{border}┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let search_text = search_line(search, inner_width);

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{border}│");
    if search.typing {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print_padded(&search_text, inner_width);
    print!("{border}│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{border}└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}

/// The text inside the box, at most `width` columns.
///
/// While typing, a long query loses its start so the caret and the latest
/// characters stay in view.
fn search_line(search: &SearchBarInfo, width: usize) -> String {
    let prefix = format!(" Search ({}): ", search.mode);
    if !search.typing {
        return truncate(&format!("{prefix}{}", search.query), width);
    }

    let room = width.saturating_sub(text_width(&prefix));
    if room == 0 {
        return truncate(&prefix, width);
    }
    format!("{prefix}{}", truncate_start(&format!("{}▏", search.query), room))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(query: &str, typing: bool) -> SearchBarInfo {
        SearchBarInfo {
            query: query.to_string(),
            mode: "name".to_string(),
            typing,
        }
    }

    #[test]
    fn short_query_fits_with_caret() {
        assert_eq!(search_line(&bar("leanne", true), 40), " Search (name): leanne▏");
    }

    #[test]
    fn long_query_keeps_caret_while_typing() {
        let line = search_line(&bar("clementine dubuque", true), 24);
        assert_eq!(line, " Search (name): …ubuque▏");
        assert_eq!(text_width(&line), 24);
    }

    #[test]
    fn long_query_cut_at_the_end_when_not_typing() {
        assert_eq!(search_line(&bar("clementine dubuque", false), 24), " Search (name): clement…");
    }

    #[test]
    fn narrow_box_shows_prefix_only() {
        assert_eq!(search_line(&bar("bret", true), 10), " Search (…");
    }
}
