//! Top-level rendering entry point.
//!
//! Computes the view model from [`AppState`] and hands it, with the theme of
//! the current appearance, to the layout.

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI to stdout.
///
/// Does not clear the screen; Zellij hands the plugin a fresh frame for every
/// render call.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let _span = tracing::trace_span!("render", rows, cols).entered();

    let viewmodel = state.compute_viewmodel(rows, cols);
    components::render_layout(&viewmodel, state.theme(), cols, rows);
}
