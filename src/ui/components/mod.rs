//! Composable UI component renderers.
//!
//! Each component prints at an explicit row and returns the next free row.
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]                          title, load status
//! [Border]
//! [Filter bar]                      facet chips, search mode
//! [Search bar - 3 lines]            search mode only
//! [Banner]                          while loading or after a failure
//! [Cards | Empty state]
//! [More]                            while part of the result is hidden
//! [Blank padding to fill screen]
//! [Border]
//! [Footer]
//! ```
//!
//! The view model already windows the cards to fit, so the layout only
//! clips as a last resort.

mod banner;
mod cards;
mod empty;
mod filters;
mod footer;
mod header;
mod search;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use banner::render_banner;
use cards::{render_cards, render_more};
use empty::render_empty_state;
use filters::render_filter_bar;
use footer::render_footer;
use header::render_header;
use search::render_search_bar;

/// Renders a horizontal border line and returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the full layout.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let footer_row = rows;
    let bottom_border = rows.saturating_sub(1);
    let more_rows = usize::from(vm.more.is_some());
    let list_limit = bottom_border.saturating_sub(more_rows);

    let mut current_row = 2;
    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = render_filter_bar(current_row, &vm.filter_bar, theme, cols);

    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }
    if let Some(banner) = &vm.banner {
        current_row = render_banner(current_row, banner, theme, cols);
    }

    current_row = match &vm.empty_state {
        Some(empty) => render_empty_state(current_row, empty, theme, cols),
        None => render_cards(current_row, list_limit, &vm.cards, theme, cols),
    };

    if let Some(more) = &vm.more {
        render_more(current_row.min(list_limit), more, theme, cols);
    }

    render_border(bottom_border, &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}
