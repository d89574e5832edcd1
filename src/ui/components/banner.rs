use crate::ui::helpers::{position_cursor, print_padded, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Banner, BannerKind};

/// Renders a one-row loading or error notice and returns the next row.
pub fn render_banner(row: usize, banner: &Banner, theme: &Theme, cols: usize) -> usize {
    let (marker, color) = match banner.kind {
        BannerKind::Loading => ("⟳", &theme.colors.text_dim),
        BannerKind::Error => ("✗", &theme.colors.error_fg),
    };

    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    if banner.kind == BannerKind::Error {
        print!("{}", Theme::bold());
    }
    print_padded(&truncate(&format!(" {marker} {}", banner.message), cols), cols);
    print!("{}", Theme::reset());
    row + 1
}
