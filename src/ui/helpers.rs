//! Shared rendering utilities.
//!
//! Widths are counted in `char`s, which is exact for the Latin names and
//! addresses the directory shows and close enough for the rest.

use crate::ui::theme::Theme;

/// Positions the cursor at a 1-indexed `row` and `col`.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Display width of `text` in columns.
#[must_use]
pub fn text_width(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` to at most `width` columns, ending in `…` when cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Cuts `text` to at most `width` columns from the left, starting with `…`
/// when cut, so the end of the text stays visible.
#[must_use]
pub fn truncate_start(text: &str, width: usize) -> String {
    let len = text_width(text);
    if len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::from('…');
    out.extend(text.chars().skip(len - (width - 1)));
    out
}

/// Prints `text` and pads with spaces up to `width` columns.
pub fn print_padded(text: &str, width: usize) {
    print!("{text}");
    print!("{}", " ".repeat(width.saturating_sub(text_width(text))));
}

/// Splits `text` into `(segment, highlighted)` runs.
///
/// `ranges` are `(start, end)` char indices with exclusive end. Out of range or
/// overlapping ranges are clamped rather than rejected.
#[must_use]
pub fn highlight_segments(text: &str, ranges: &[(usize, usize)]) -> Vec<(String, bool)> {
    let chars: Vec<char> = text.chars().collect();
    let mut segments = Vec::new();
    let mut pos = 0;

    for &(start, end) in ranges {
        let start = start.clamp(pos, chars.len());
        let end = end.clamp(start, chars.len());

        if start > pos {
            segments.push((chars[pos..start].iter().collect(), false));
        }
        if end > start {
            segments.push((chars[start..end].iter().collect(), true));
        }
        pos = end;
    }

    if pos < chars.len() {
        segments.push((chars[pos..].iter().collect(), false));
    }
    segments
}

/// Prints `text` with `ranges` in the match highlight colors.
///
/// `restore` is re-emitted after each highlighted run so the caller's colors
/// (e.g. the selection background) continue afterwards.
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, restore: &str) {
    for (segment, highlighted) in highlight_segments(text, ranges) {
        if highlighted {
            print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
            print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
            print!("{segment}");
            print!("{}", Theme::reset());
            print!("{restore}");
        } else {
            print!("{segment}");
        }
    }
}
