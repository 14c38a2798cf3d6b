//! Application state and view model computation.
//!
//! [`AppState`] owns one search control (controller + overlay), the facet store and
//! the navigation history. Facet selection is never stored here: it is re-derived
//! from the history's current location on every read. View models are computed on
//! demand from state snapshots.

use crate::domain::{Location, NavigableAddress};
use crate::facets::{FacetGroup, FacetStore};
use crate::infrastructure::{ControlId, History, ListenerRegistry, Navigator};
use crate::search::{OverlayCoordinator, OverlayState, SearchController, SearchSettings};
use crate::ui::viewmodel::{
    DropdownViewModel, FacetGroupView, FacetOptionView, FilterPanelViewModel, PageViewModel, SuggestionRow,
};
use crate::Config;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::time::Duration;

/// Central application state container.
#[derive(Debug)]
pub struct AppState {
    pub search: SearchController,
    pub overlay: OverlayCoordinator,
    pub facets: FacetStore,

    /// The navigator every view reads the address from.
    pub history: History,

    /// Outside-interaction listeners of mounted controls.
    pub listeners: ListenerRegistry,

    results_path: String,
    query_key: String,
}

impl AppState {
    /// Creates the state for one search page opened at `initial`.
    ///
    /// If `initial` is the results route, the input starts with its query text.
    #[must_use]
    pub fn new(config: &Config, initial: Location) -> Self {
        let settings = SearchSettings {
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_chars: config.min_query_chars,
            max_suggestions: config.max_suggestions,
        };

        let mut state = Self {
            search: SearchController::new(settings),
            overlay: OverlayCoordinator::new(ControlId(0), config.show_empty_state),
            facets: FacetStore::new(config.facet_groups.clone(), config.results_path.clone(), config.clear_policy),
            history: History::new(initial),
            listeners: ListenerRegistry::new(),
            results_path: config.results_path.clone(),
            query_key: config.query_key.clone(),
        };
        state.sync_query_from_location();
        state
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        self.history.location()
    }

    /// The results view location for free-text `text`, without facets.
    #[must_use]
    pub fn results_location(&self, text: &str) -> Location {
        let mut address = NavigableAddress::new();
        address.append(self.query_key.clone(), text);
        Location::new(self.results_path.clone(), address)
    }

    /// Navigates to the results view for `text` and returns the new location.
    pub fn navigate_to_results(&mut self, text: &str) -> Location {
        let location = self.results_location(text);
        tracing::debug!(location = %location, "search navigation requested");
        self.history.push(location.clone());
        self.sync_query_from_location();
        location
    }

    /// Brings the search control in line with a location change.
    ///
    /// Any pending timer or in-flight lookup belongs to the previous page and is
    /// dropped. On the results route the input mirrors the query text; other routes
    /// leave the input text untouched.
    pub fn sync_query_from_location(&mut self) {
        self.search.cancel();
        let location = self.history.location();
        if location.path != self.results_path {
            return;
        }
        let text = location.address.get(&self.query_key).unwrap_or_default().to_string();
        self.search.replace_query(text);
    }

    /// Computes the suggestion dropdown.
    #[must_use]
    pub fn compute_dropdown(&self) -> DropdownViewModel {
        let state = self.overlay.state();
        let query = self.search.query().trim();

        let rows = if state == OverlayState::ShowingResults {
            let matcher = SkimMatcherV2::default().ignore_case();
            self.search
                .suggestions()
                .iter()
                .map(|item| SuggestionRow {
                    title: item.title.clone(),
                    employer: item.organization.clone(),
                    location: item.location.as_deref().map(FacetGroup::option_label),
                    badge: item.employment_type.as_deref().map(FacetGroup::option_label),
                    highlight_ranges: Self::compute_highlight_ranges(&item.title, query, &matcher),
                })
                .collect()
        } else {
            Vec::new()
        };

        let view_all = (!rows.is_empty()).then(|| format!("View all results for \"{query}\""));
        let empty_message = (state == OverlayState::ShowingEmpty).then(|| format!("No jobs match \"{query}\""));

        DropdownViewModel {
            state,
            loading: state == OverlayState::Loading,
            rows,
            view_all,
            empty_message,
        }
    }

    /// Computes the facet filter panel from the current address.
    ///
    /// Selected values that are not among a group's offered options are listed after
    /// them, checked, so every active filter can be seen and removed.
    #[must_use]
    pub fn compute_filter_panel(&self) -> FilterPanelViewModel {
        let selection = self.facets.selection(&self.history);

        let groups = self
            .facets
            .groups()
            .iter()
            .map(|group| {
                let selected = selection.get(&group.key);
                let is_checked = |value: &str| selected.is_some_and(|s| s.contains(value));

                let offered = group.options.iter().map(|value| FacetOptionView {
                    value: value.clone(),
                    label: FacetGroup::option_label(value),
                    checked: is_checked(value),
                });
                let extra = selected
                    .into_iter()
                    .flatten()
                    .filter(|value| !group.options.contains(value))
                    .map(|value| FacetOptionView {
                        value: value.clone(),
                        label: FacetGroup::option_label(value),
                        checked: true,
                    });

                FacetGroupView {
                    key: group.key.clone(),
                    label: group.label.clone(),
                    options: offered.chain(extra).collect(),
                }
            })
            .collect();

        let active_filter_count = self.facets.active_filter_count(&self.history);
        FilterPanelViewModel {
            groups,
            active_filter_count,
            can_clear: active_filter_count > 0,
        }
    }

    #[must_use]
    pub fn compute_page(&self) -> PageViewModel {
        PageViewModel::new(
            self.location(),
            self.search.query(),
            self.search.phase(),
            self.compute_dropdown(),
            self.compute_filter_panel(),
        )
    }

    /// Collapses the matcher's character indices into contiguous `(start, end)` runs.
    fn compute_highlight_ranges(text: &str, query: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
            return Vec::new();
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SuggestionItem;
    use crate::search::OverlaySignal;
    use pretty_assertions::assert_eq;
    use std::time::Instant;

    fn state_at(location: &str) -> AppState {
        AppState::new(&Config::default(), location.parse().unwrap())
    }

    #[test]
    fn initial_results_location_restores_query_text() {
        let state = state_at("/search?q=data+engineer&location=shimla");

        assert_eq!(state.search.query(), "data engineer");
        assert_eq!(state.search.pending_deadline(), None);
    }

    #[test]
    fn results_location_drops_facets() {
        let mut state = state_at("/search?location=shimla");

        let location = state.navigate_to_results("rust dev");

        assert_eq!(location.to_string(), "/search?q=rust+dev");
        assert_eq!(state.history.len(), 2);
    }

    #[test]
    fn filter_panel_reflects_address() {
        let state = state_at("/search?q=x&location=shimla&location=kullu&salary_band=3-6");

        let panel = state.compute_filter_panel();

        assert_eq!(panel.active_filter_count, 3);
        assert!(panel.can_clear);
        let location = &panel.groups[1];
        let checked: Vec<&str> = location
            .options
            .iter()
            .filter(|o| o.checked)
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(checked, ["Shimla", "Kullu"]);
        assert_eq!(location.options.len(), 4);
    }

    #[test]
    fn dropdown_lists_rows_with_view_all_footer() {
        let mut state = state_at("/");
        let now = Instant::now();
        state.search.set_query("eng", now);
        let request = state.search.poll(now + Duration::from_millis(300)).unwrap();
        let items = vec![
            SuggestionItem::new("1", "Engineer", "Acme").with_employment_type("remote"),
            SuggestionItem::new("2", "QA Engineer", "Globex").with_location("shimla"),
        ];
        state.search.apply(request.seq, Ok(items));
        state.overlay.apply(OverlaySignal::Resolved { matches: 2 });

        let dropdown = state.compute_dropdown();

        assert!(dropdown.is_visible());
        assert_eq!(dropdown.rows.len(), 2);
        assert_eq!(dropdown.rows[0].badge.as_deref(), Some("Remote"));
        assert_eq!(dropdown.rows[0].highlight_ranges, [(0, 3)]);
        assert_eq!(dropdown.rows[1].location.as_deref(), Some("Shimla"));
        assert_eq!(dropdown.view_all.as_deref(), Some("View all results for \"eng\""));
    }

    #[test]
    fn closed_dropdown_has_no_rows() {
        let state = state_at("/");

        let dropdown = state.compute_dropdown();

        assert!(!dropdown.is_visible());
        assert!(dropdown.rows.is_empty());
        assert_eq!(dropdown.view_all, None);
    }
}
