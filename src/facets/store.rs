//! Facet store: active filters derived from the current address.
//!
//! The store holds no selection state of its own. Every read decodes the navigator's
//! current address and every mutation computes a new address and navigates to it, so
//! a reload, a shared link, or a back-button press all reconstruct exactly the same
//! filters.
//!
//! # Example
//!
//! ```
//! use jobseek::facets::{ClearPolicy, FacetGroup, FacetStore};
//! use jobseek::infrastructure::{History, Navigator};
//!
//! let store = FacetStore::new(FacetGroup::builtin(), "/search", ClearPolicy::FacetsOnly);
//! let mut history = History::new("/search?job_employment_type_text=remote".parse().unwrap());
//!
//! store.toggle(&mut history, "location", "shimla")?;
//!
//! assert_eq!(
//!     history.location().to_string(),
//!     "/search?job_employment_type_text=remote&location=shimla"
//! );
//! assert_eq!(store.active_filter_count(&history), 2);
//! # Ok::<(), jobseek::JobseekError>(())
//! ```

use super::codec::{self, FacetSelection, ValueSet};
use super::groups::FacetGroup;
use crate::domain::error::{JobseekError, Result};
use crate::domain::{Location, NavigableAddress};
use crate::infrastructure::Navigator;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What "clear all filters" removes from the address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClearPolicy {
    /// Remove the tracked facet keys; keep the query text and any other keys.
    #[default]
    FacetsOnly,

    /// Navigate to the bare results route, dropping the query text as well.
    Reset,
}

impl FromStr for ClearPolicy {
    type Err = JobseekError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "facets-only" => Ok(Self::FacetsOnly),
            "reset" => Ok(Self::Reset),
            other => Err(JobseekError::Config(format!(
                "unknown clear policy `{other}` (expected `facets-only` or `reset`)"
            ))),
        }
    }
}

/// Facet filter operations over a [`Navigator`].
#[derive(Debug, Clone)]
pub struct FacetStore {
    groups: Vec<FacetGroup>,
    results_path: String,
    clear_policy: ClearPolicy,
}

impl FacetStore {
    #[must_use]
    pub fn new(groups: Vec<FacetGroup>, results_path: impl Into<String>, clear_policy: ClearPolicy) -> Self {
        Self {
            groups,
            results_path: results_path.into(),
            clear_policy,
        }
    }

    /// Tracked groups, in display order.
    #[must_use]
    pub fn groups(&self) -> &[FacetGroup] {
        &self.groups
    }

    #[must_use]
    pub fn group(&self, key: &str) -> Option<&FacetGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    #[must_use]
    pub const fn clear_policy(&self) -> ClearPolicy {
        self.clear_policy
    }

    /// Selected values of `group` in the current address.
    ///
    /// For a tracked group whose address values cannot be interpreted, the group is
    /// reported as having no selection. Untracked groups are decoded without
    /// validation.
    pub fn selected<N: Navigator + ?Sized>(&self, navigator: &N, group: &str) -> ValueSet {
        Self::selected_in(self.group(group), &navigator.location().address, group)
    }

    #[must_use]
    pub fn is_selected<N: Navigator + ?Sized>(&self, navigator: &N, group: &str, value: &str) -> bool {
        self.selected(navigator, group).contains(value)
    }

    /// Selected values of every tracked group, including empty ones.
    pub fn selection<N: Navigator + ?Sized>(&self, navigator: &N) -> FacetSelection {
        let address = &navigator.location().address;
        self.groups
            .iter()
            .map(|g| (g.key.clone(), Self::selected_in(Some(g), address, &g.key)))
            .collect()
    }

    /// Total number of selected values across the tracked groups.
    ///
    /// The free-text query and untracked keys never contribute.
    pub fn active_filter_count<N: Navigator + ?Sized>(&self, navigator: &N) -> usize {
        self.selection(navigator).values().map(ValueSet::len).sum()
    }

    /// Flips the selection of `(group, value)` and navigates to the resulting address.
    ///
    /// # Errors
    ///
    /// Returns [`JobseekError::MalformedAddress`] without navigating when `group` is
    /// tracked and `value` is not a valid encoding for it.
    pub fn toggle<N: Navigator + ?Sized>(&self, navigator: &mut N, group: &str, value: &str) -> Result<Location> {
        let next_selected = !self.is_selected(navigator, group, value);
        self.set_selected(navigator, group, value, next_selected)
    }

    /// Selects or deselects `(group, value)` and navigates to the resulting address.
    ///
    /// # Errors
    ///
    /// Same as [`FacetStore::toggle`].
    pub fn set_selected<N: Navigator + ?Sized>(
        &self,
        navigator: &mut N,
        group: &str,
        value: &str,
        selected: bool,
    ) -> Result<Location> {
        let _span = tracing::debug_span!("facet_toggle", group = %group, value = %value, selected).entered();

        let mut address = navigator.location().address.clone();
        if let Some(tracked) = self.group(group) {
            if selected {
                tracked.validate(value)?;
            }
            // A malformed value would keep the whole group reading as unselected.
            if codec::decode_validated(&address, tracked).is_err() {
                tracing::debug!(group = %group, "dropping malformed facet values");
                address = codec::strip_invalid(&address, tracked);
            }
        }

        let address = codec::encode_toggle(&address, group, value, selected);
        Ok(self.navigate(navigator, address))
    }

    /// Navigates to an address without any tracked facet keys.
    ///
    /// Under [`ClearPolicy::FacetsOnly`] the query text and untracked keys are kept;
    /// under [`ClearPolicy::Reset`] the bare results route is used.
    pub fn clear_all_filters<N: Navigator + ?Sized>(&self, navigator: &mut N) -> Location {
        let _span = tracing::debug_span!("facet_clear_all", policy = ?self.clear_policy).entered();

        let address = match self.clear_policy {
            ClearPolicy::FacetsOnly => codec::clear_all(
                &navigator.location().address,
                self.groups.iter().map(|g| g.key.as_str()),
            ),
            ClearPolicy::Reset => NavigableAddress::new(),
        };
        self.navigate(navigator, address)
    }

    fn navigate<N: Navigator + ?Sized>(&self, navigator: &mut N, address: NavigableAddress) -> Location {
        let location = Location::new(self.results_path.clone(), address);
        tracing::debug!(location = %location, "facet navigation requested");
        navigator.push(location.clone());
        location
    }

    fn selected_in(tracked: Option<&FacetGroup>, address: &NavigableAddress, group: &str) -> ValueSet {
        match tracked {
            Some(tracked) => codec::decode_validated(address, tracked).unwrap_or_else(|e| {
                tracing::warn!(group = %group, error = %e, "ignoring malformed facet group");
                ValueSet::new()
            }),
            None => codec::decode_group(address, group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::groups::{EMPLOYMENT_TYPE, LOCATION, SALARY_BAND};
    use crate::infrastructure::History;
    use pretty_assertions::assert_eq;

    fn store(policy: ClearPolicy) -> FacetStore {
        FacetStore::new(FacetGroup::builtin(), "/search", policy)
    }

    fn history(text: &str) -> History {
        History::new(text.parse().unwrap())
    }

    #[test]
    fn toggle_selects_then_deselects() {
        let store = store(ClearPolicy::FacetsOnly);
        let mut nav = history("/search?q=rust");

        store.toggle(&mut nav, LOCATION, "shimla").unwrap();
        assert!(store.is_selected(&nav, LOCATION, "shimla"));

        store.toggle(&mut nav, LOCATION, "shimla").unwrap();
        assert!(!store.is_selected(&nav, LOCATION, "shimla"));
        assert_eq!(nav.location().to_string(), "/search?q=rust");
        assert_eq!(nav.len(), 3);
    }

    #[test]
    fn toggle_removes_only_the_chosen_value() {
        let store = store(ClearPolicy::FacetsOnly);
        let mut nav = history("/search?location=shimla&location=dehradun");

        let location = store.toggle(&mut nav, LOCATION, "shimla").unwrap();

        assert_eq!(location.to_string(), "/search?location=dehradun");
    }

    #[test]
    fn toggle_targets_results_route_from_any_page() {
        let store = store(ClearPolicy::FacetsOnly);
        let mut nav = history("/?utm=mail");

        let location = store.toggle(&mut nav, EMPLOYMENT_TYPE, "remote").unwrap();

        assert_eq!(location.to_string(), "/search?utm=mail&job_employment_type_text=remote");
    }

    #[test]
    fn toggle_rejects_malformed_value_without_navigating() {
        let store = store(ClearPolicy::FacetsOnly);
        let mut nav = history("/search");

        let result = store.toggle(&mut nav, SALARY_BAND, "a lot");

        assert!(matches!(result, Err(JobseekError::MalformedAddress { .. })));
        assert_eq!(nav.len(), 1);
    }

    #[test]
    fn active_filter_count_ignores_query_and_foreign_keys() {
        let store = store(ClearPolicy::FacetsOnly);
        let with_query = history("/search?q=engineer&location=shimla&location=dehradun&job_employment_type_text=remote&utm=x");
        let without_query = history("/search?location=shimla&location=dehradun&job_employment_type_text=remote");

        assert_eq!(store.active_filter_count(&with_query), 3);
        assert_eq!(store.active_filter_count(&without_query), 3);
    }

    #[test]
    fn malformed_group_reads_as_empty() {
        let store = store(ClearPolicy::FacetsOnly);
        let nav = history("/search?salary_band=3-6&salary_band=plenty&location=shimla");

        assert!(store.selected(&nav, SALARY_BAND).is_empty());
        assert_eq!(store.active_filter_count(&nav), 1);
    }

    #[test]
    fn toggle_repairs_malformed_group() {
        let store = store(ClearPolicy::FacetsOnly);
        let mut nav = history("/search?salary_band=lots&q=qa");

        let location = store.toggle(&mut nav, SALARY_BAND, "3-6").unwrap();

        assert_eq!(location.to_string(), "/search?q=qa&salary_band=3-6");
        assert!(store.is_selected(&nav, SALARY_BAND, "3-6"));
        assert_eq!(store.active_filter_count(&nav), 1);

        store.toggle(&mut nav, SALARY_BAND, "3-6").unwrap();
        assert_eq!(nav.location().to_string(), "/search?q=qa");
    }

    #[test]
    fn toggle_in_malformed_group_restores_remaining_valid_values() {
        let store = store(ClearPolicy::FacetsOnly);
        let mut nav = history("/search?salary_band=0-3&salary_band=plenty");

        store.toggle(&mut nav, SALARY_BAND, "10+").unwrap();

        let selected: Vec<String> = store.selected(&nav, SALARY_BAND).into_iter().collect();
        assert_eq!(selected, ["0-3", "10+"]);
    }

    #[test]
    fn clear_facets_only_keeps_query_text() {
        let store = store(ClearPolicy::FacetsOnly);
        let mut nav = history("/search?q=engineer&location=shimla&job_employment_type_text=remote&utm=x");

        let location = store.clear_all_filters(&mut nav);

        assert_eq!(location.to_string(), "/search?q=engineer&utm=x");
        assert_eq!(store.active_filter_count(&nav), 0);
    }

    #[test]
    fn clear_reset_drops_everything() {
        let store = store(ClearPolicy::Reset);
        let mut nav = history("/search?q=engineer&location=shimla&job_employment_type_text=remote");

        let location = store.clear_all_filters(&mut nav);

        assert_eq!(location.to_string(), "/search");
        assert_eq!(store.active_filter_count(&nav), 0);
    }

    #[test]
    fn external_navigation_is_reflected_immediately() {
        let store = store(ClearPolicy::FacetsOnly);
        let mut nav = history("/search?location=shimla");
        store.toggle(&mut nav, LOCATION, "dehradun").unwrap();

        nav.back();

        assert_eq!(store.selected(&nav, LOCATION).into_iter().collect::<Vec<_>>(), ["shimla"]);
    }

    #[test]
    fn clear_policy_parses_from_config_strings() {
        assert_eq!("reset".parse::<ClearPolicy>().unwrap(), ClearPolicy::Reset);
        assert_eq!(" facets-only ".parse::<ClearPolicy>().unwrap(), ClearPolicy::FacetsOnly);
        assert!("everything".parse::<ClearPolicy>().is_err());
    }
}
