//! Facet chips and the active search mode.

use crate::ui::helpers::{position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FacetChip, FilterBarInfo};

fn chip_text(chip: &FacetChip) -> String {
    let value = chip.selection.as_deref().unwrap_or("all");
    format!(" {}:{} {value} ({}) ", chip.key_hint, chip.label, chip.option_count)
}

/// Renders the filter bar and returns the next row.
///
/// Chips with a selection are drawn filled; chips that do not fit are left out.
pub fn render_filter_bar(row: usize, filters: &FilterBarInfo, theme: &Theme, cols: usize) -> usize {
    let mode = format!(" search: {} ", filters.search_mode);
    let mut used = 1;

    position_cursor(row, 1);
    print!(" ");

    for chip in &filters.chips {
        let text = chip_text(chip);
        let width = text_width(&text) + 1;
        if used + width + text_width(&mode) > cols {
            break;
        }

        if chip.selection.is_some() {
            print!("{}", Theme::fg(&theme.colors.chip_fg));
            print!("{}", Theme::bg(&theme.colors.chip_bg));
            print!("{}", Theme::bold());
        } else {
            print!("{}", Theme::fg(&theme.colors.text_dim));
        }
        print!("{text}");
        print!("{} ", Theme::reset());
        used += width;
    }

    let mode_len = text_width(&mode);
    print!("{}", " ".repeat(cols.saturating_sub(used + mode_len)));
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{mode}");
    print!("{}", Theme::reset());
    row + 1
}
