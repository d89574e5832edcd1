//! Terminal rendering layer.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready types computed from controller state
//! - [`renderer`]: Top-level rendering entry point
//! - [`components`]: Row-positioned component renderers
//! - [`helpers`]: Cursor positioning, truncation, match highlighting
//! - [`theme`]: Dark/light color schemes and ANSI escape generation
//!
//! # Example
//!
//! ```rust
//! use rosterview::app::AppState;
//! use rosterview::ui::ThemeSet;
//! use rosterview::Config;
//!
//! let state = AppState::new(&Config::default(), ThemeSet::default());
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert!(viewmodel.cards.is_empty());
//! assert!(viewmodel.empty_state.is_some());
//! ```

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::{Theme, ThemeSet};
pub use viewmodel::{
    Banner, BannerKind, EmptyState, FacetChip, FilterBarInfo, FooterInfo, HeaderInfo, MoreInfo, PersonCard,
    SearchBarInfo, UIViewModel,
};
