//! The data-view pipeline.
//!
//! Each stage is a small, synchronous, Zellij-free component. The controller in
//! [`crate::app`] owns one instance of each and re-enters the pipeline at the
//! stage an event affects:
//!
//! ```text
//! loader ──► Collection ──► facets
//!                │
//!                ▼
//!             query ──► VisibleSet ──► pagination ──► view_state ──► ui
//! ```
//!
//! - [`loader`]: request sequencing, timeouts and response interpretation
//! - [`facets`]: distinct filter values per facet field
//! - [`query`]: search text and facet selections, evaluated to a visible set
//! - [`pagination`]: incremental reveal of the visible set
//! - [`view_state`]: per-person expand flags and projection of the revealed slice

pub mod facets;
pub mod loader;
pub mod pagination;
pub mod query;
pub mod view_state;

pub use facets::{extract_facets, FacetSet};
pub use loader::{interpret_response, LoadTracker, RequestId};
pub use pagination::Pagination;
pub use query::{evaluate, QueryState, SearchMode};
pub use view_state::{ProjectedItem, ViewState};
