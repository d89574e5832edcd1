//! Person cards: one summary row each, plus detail rows when expanded.

use crate::ui::helpers::{self, position_cursor, print_padded, text_width, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{MoreInfo, PersonCard};

/// Widest the name column gets before the summary starts.
const NAME_COLUMN_MAX: usize = 28;
/// Indent of detail rows under the name.
const DETAIL_INDENT: usize = 6;
/// Width of the detail label column.
const DETAIL_LABEL_WIDTH: usize = 9;

/// Renders `cards` starting at `row`, stopping before `limit`. Returns the next
/// free row.
pub fn render_cards(row: usize, limit: usize, cards: &[PersonCard], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for card in cards {
        if current_row >= limit {
            break;
        }
        current_row = render_card(current_row, limit, card, theme, cols);
    }
    current_row
}

fn render_card(row: usize, limit: usize, card: &PersonCard, theme: &Theme, cols: usize) -> usize {
    let name_width = NAME_COLUMN_MAX.min(cols / 2);
    let marker = if card.is_expanded { "▾" } else { "▸" };

    let colors = if card.is_selected {
        format!(
            "{}{}",
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        Theme::fg(&theme.colors.text_normal)
    };

    position_cursor(row, 1);
    print!("{colors}");
    print!(" {marker} ");

    let name = truncate(&card.name, name_width);
    if text_width(&name) == text_width(&card.name) {
        helpers::render_highlighted_text(&name, &card.highlight_ranges, theme, &colors);
    } else {
        print!("{name}");
    }
    print!("{}", " ".repeat(name_width.saturating_sub(text_width(&name)) + 1));

    let used = 3 + name_width + 1;
    let summary_width = cols.saturating_sub(used);
    if !card.is_selected {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print_padded(&truncate(&card.summary, summary_width), summary_width);
    print!("{}", Theme::reset());

    let mut current_row = row + 1;
    for (label, value) in &card.details {
        if current_row >= limit {
            break;
        }
        current_row = render_detail(current_row, label, value, theme, cols);
    }
    current_row
}

fn render_detail(row: usize, label: &str, value: &str, theme: &Theme, cols: usize) -> usize {
    let value_width = cols.saturating_sub(DETAIL_INDENT + DETAIL_LABEL_WIDTH);

    position_cursor(row, 1);
    print!("{}", " ".repeat(DETAIL_INDENT));
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{label:<DETAIL_LABEL_WIDTH$}");
    print!("{}", Theme::fg(&theme.colors.detail_fg));
    print_padded(&truncate(value, value_width), value_width);
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the "load more" affordance and returns the next row.
pub fn render_more(row: usize, more: &MoreInfo, theme: &Theme, cols: usize) -> usize {
    let text = format!(
        "   showing {} of {}  ·  m: show {} more",
        more.revealed, more.total, more.next_page
    );

    position_cursor(row, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print_padded(&truncate(&text, cols), cols);
    print!("{}", Theme::reset());
    row + 1
}
