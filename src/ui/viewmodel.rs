//! View model types representing renderable search and filter state.
//!
//! View models are computed on demand by `AppState::compute_dropdown()` and
//! `AppState::compute_filter_panel()` and never stored. They contain no business
//! logic, only display-ready data, and serialize to JSON for the command-line driver.
//!
//! # Example
//!
//! ```rust
//! use jobseek::ui::{DropdownViewModel, SuggestionRow};
//! use jobseek::search::OverlayState;
//!
//! let vm = DropdownViewModel {
//!     state: OverlayState::ShowingResults,
//!     loading: false,
//!     rows: vec![SuggestionRow {
//!         title: "Rust Engineer".to_string(),
//!         employer: "Acme".to_string(),
//!         location: None,
//!         badge: Some("Remote".to_string()),
//!         highlight_ranges: vec![(0, 4)],
//!     }],
//!     view_all: Some("View all results for \"rust\"".to_string()),
//!     empty_message: None,
//! };
//! assert!(vm.is_visible());
//! ```

use crate::domain::Location;
use crate::search::{OverlayState, SearchPhase};
use serde::Serialize;

/// Everything a host needs to draw the search page at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageViewModel {
    /// Current location, as address text.
    pub location: String,
    pub query: String,
    pub phase: SearchPhase,
    pub dropdown: DropdownViewModel,
    pub filters: FilterPanelViewModel,
}

impl PageViewModel {
    #[must_use]
    pub fn new(location: &Location, query: &str, phase: SearchPhase, dropdown: DropdownViewModel, filters: FilterPanelViewModel) -> Self {
        Self {
            location: location.to_string(),
            query: query.to_string(),
            phase,
            dropdown,
            filters,
        }
    }
}

/// The suggestion dropdown below the search input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownViewModel {
    pub state: OverlayState,

    /// A lookup is in flight.
    pub loading: bool,

    /// At most `max_suggestions` rows, in service order.
    pub rows: Vec<SuggestionRow>,

    /// Footer link text, present whenever rows are shown.
    pub view_all: Option<String>,

    /// Shown instead of rows when a lookup matched nothing.
    pub empty_message: Option<String>,
}

impl DropdownViewModel {
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.state.is_open()
    }
}

/// One suggestion row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRow {
    pub title: String,
    pub employer: String,
    pub location: Option<String>,

    /// Employment type label, e.g. "Remote".
    pub badge: Option<String>,

    /// Character index ranges of `title` matched by the query, `(start, end)` with
    /// exclusive end.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// The facet filter panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterPanelViewModel {
    pub groups: Vec<FacetGroupView>,

    /// Number of selected values across all groups.
    pub active_filter_count: usize,

    /// "Clear all" is only offered when something is selected.
    pub can_clear: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetGroupView {
    pub key: String,
    pub label: String,
    pub options: Vec<FacetOptionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOptionView {
    pub value: String,
    pub label: String,
    pub checked: bool,
}
