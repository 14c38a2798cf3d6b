//! Presentation layer: display-ready snapshots of search and filter state.
//!
//! ```text
//! AppState → compute_dropdown / compute_filter_panel → view models → host renderer
//! ```
//!
//! Drawing is left to the host; this crate stops at the view model.

pub mod viewmodel;

pub use viewmodel::{DropdownViewModel, FacetGroupView, FacetOptionView, FilterPanelViewModel, PageViewModel, SuggestionRow};
