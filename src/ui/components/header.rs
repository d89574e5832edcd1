//! Title bar: centered title with the load status on the right.

use crate::ui::helpers::{position_cursor, text_width, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header and returns the next row.
///
/// The status is dropped when the pane is too narrow for both.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = truncate(&header.title, cols);
    let title_len = text_width(&title);
    let padding = cols.saturating_sub(title_len) / 2;

    let status = format!("{} ", header.status);
    let status_len = text_width(&status);
    let show_status = padding + title_len + status_len + 1 <= cols;

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{title}");

    if show_status {
        print!("{}", " ".repeat(cols - padding - title_len - status_len));
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{status}");
    } else {
        print!("{}", " ".repeat(cols.saturating_sub(padding + title_len)));
    }

    print!("{}", Theme::reset());
    row + 1
}
