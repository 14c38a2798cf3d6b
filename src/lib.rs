//! Jobseek: the search and filter core of a job-listing application.
//!
//! Jobseek provides:
//! - Debounced, cancelable suggestion lookups as the user types
//! - Last-request-wins ordering so a slow answer never overwrites a newer one
//! - A suggestion dropdown whose visibility follows focus, pointer and lookup state
//! - Multi-valued facet filters whose only source of truth is the address query string

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Command-line runtime (main.rs)                     │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Event handler
//! │  - Events → state transitions → actions             │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Search        │   │ Facets        │   │ Worker        │
//! │ (search/)     │   │ (facets/)     │   │ (worker/)     │
//! │ - Debounce    │   │ - Codec       │   │ - Lookup      │
//! │ - Controller  │   │ - Store       │   │   thread      │
//! │ - Overlay     │   │ - Groups      │   │ (lookup/)     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Address, suggestions, errors (domain/)           │
//! │  - Navigator/history, listeners, paths              │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing + file-based span export                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Navigable address, suggestion items, errors
//! - [`facets`]: Facet codec and address-backed facet store
//! - [`search`]: Debounce timer, search controller, overlay coordinator
//! - [`lookup`]: Lookup service trait and the JSON job catalog
//! - [`worker`]: Background lookup thread
//! - [`infrastructure`]: Navigation history, listener registry, paths
//! - [`ui`]: View models
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! ```toml
//! debounce_ms = 300
//! max_suggestions = 6
//! clear_policy = "facets-only"
//! show_empty_state = true
//! trace_level = "debug"
//!
//! [[facet_groups]]
//! key = "location"
//! label = "Location"
//! options = ["himachal", "dehradun", "shimla"]
//! ```
//!
//! # Example
//!
//! ```rust
//! use jobseek::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default(), "/search?q=rust".parse().unwrap());
//!
//! let (_, actions) = handle_event(
//!     &mut state,
//!     &Event::ToggleFacet { group: "location".into(), value: "shimla".into() },
//! )?;
//!
//! assert!(matches!(&actions[..], [Action::LoadResults(l)] if l.to_string() == "/search?q=rust&location=shimla"));
//! # Ok::<(), jobseek::JobseekError>(())
//! ```

pub mod app;
pub mod domain;
pub mod facets;
pub mod infrastructure;
pub mod lookup;
pub mod search;
pub mod ui;
pub mod worker;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{JobseekError, Location, NavigableAddress, Result, SuggestionItem};

use facets::{ClearPolicy, FacetGroup};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Runtime configuration.
///
/// Read from a TOML file with [`Config::from_file`] or from a flat string map with
/// [`Config::from_map`]; every missing key falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet period after the last keystroke before a lookup. Default: 300
    pub debounce_ms: u64,

    /// A lookup requires the trimmed query to be longer than this. Default: 2
    pub min_query_chars: usize,

    /// Suggestions kept from each lookup response. Default: 6
    pub max_suggestions: usize,

    /// Route of the results view. Default: `/search`
    pub results_path: String,

    /// Address key holding the free-text query. Default: `q`
    pub query_key: String,

    /// What "clear all filters" removes. Default: facets only
    pub clear_policy: ClearPolicy,

    /// Show a "no matches" dropdown instead of closing it. Default: false
    pub show_empty_state: bool,

    /// Tracked facet groups, in display order.
    pub facet_groups: Vec<FacetGroup>,

    /// JSON job catalog served by the lookup worker; the bundled sample when unset.
    pub catalog_path: Option<String>,

    /// Options: `trace`, `debug`, `info`, `warn`, `error`.
    pub trace_level: Option<String>,

    /// Span export file. Defaults to the data directory when `trace_level` is set.
    pub trace_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_chars: 2,
            max_suggestions: 6,
            results_path: "/search".to_string(),
            query_key: "q".to_string(),
            clear_policy: ClearPolicy::FacetsOnly,
            show_empty_state: false,
            facet_groups: FacetGroup::builtin(),
            catalog_path: None,
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from a flat string map.
    ///
    /// Unparseable values fall back to their defaults. Facet groups cannot be
    /// expressed in a flat map and always use the built-in set.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use jobseek::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("debounce_ms".to_string(), "150".to_string());
    /// map.insert("max_suggestions".to_string(), "lots".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.debounce_ms, 150);
    /// assert_eq!(config.max_suggestions, 6);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let parsed = |key: &str| map.get(key).map(|s| s.trim()).filter(|s| !s.is_empty());
        let text = |key: &str| parsed(key).map(String::from);

        let clear_policy = parsed("clear_policy").map_or(defaults.clear_policy, |s| {
            s.parse().unwrap_or_else(|e| {
                tracing::debug!(error = %e, "invalid clear_policy, using default");
                defaults.clear_policy
            })
        });

        Self {
            debounce_ms: parsed("debounce_ms")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.debounce_ms),
            min_query_chars: parsed("min_query_chars")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_query_chars),
            max_suggestions: parsed("max_suggestions")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_suggestions),
            results_path: text("results_path").unwrap_or(defaults.results_path),
            query_key: text("query_key").unwrap_or(defaults.query_key),
            clear_policy,
            show_empty_state: parsed("show_empty_state")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.show_empty_state),
            facet_groups: defaults.facet_groups,
            catalog_path: text("catalog_path"),
            trace_level: text("trace_level"),
            trace_file: text("trace_file"),
        }
    }

    /// Loads and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for this
    /// structure, or fails [`Config::validate`].
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = ?path, "loading configuration");
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| JobseekError::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`JobseekError::Config`] naming the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.max_suggestions == 0 {
            return Err(JobseekError::Config("max_suggestions must be at least 1".to_string()));
        }
        if !self.results_path.starts_with('/') {
            return Err(JobseekError::Config(format!(
                "results_path `{}` must start with `/`",
                self.results_path
            )));
        }
        if self.query_key.is_empty() {
            return Err(JobseekError::Config("query_key must not be empty".to_string()));
        }

        let mut seen = BTreeSet::new();
        for group in &self.facet_groups {
            if group.key == self.query_key {
                return Err(JobseekError::Config(format!(
                    "facet group `{}` collides with the query key",
                    group.key
                )));
            }
            if !seen.insert(group.key.as_str()) {
                return Err(JobseekError::Config(format!("facet group `{}` is defined twice", group.key)));
            }
        }
        Ok(())
    }
}

/// Creates the application state for a page opened at `initial`.
#[must_use]
pub fn initialize(config: &Config, initial: Location) -> AppState {
    tracing::debug!(
        location = %initial,
        debounce_ms = config.debounce_ms,
        facet_groups = config.facet_groups.len(),
        clear_policy = ?config.clear_policy,
        "initializing search page"
    );
    AppState::new(config, initial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facets::ValueKind;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn from_map_reads_known_keys() {
        let map: BTreeMap<String, String> = [
            ("clear_policy", "reset"),
            ("show_empty_state", "true"),
            ("results_path", "/jobs"),
            ("trace_level", " debug "),
            ("catalog_path", ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_map(&map);

        assert_eq!(config.clear_policy, ClearPolicy::Reset);
        assert!(config.show_empty_state);
        assert_eq!(config.results_path, "/jobs");
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.debounce_ms, 300);
    }

    #[test]
    fn from_map_ignores_invalid_policy() {
        let map = BTreeMap::from([("clear_policy".to_string(), "everything".to_string())]);

        assert_eq!(Config::from_map(&map).clear_policy, ClearPolicy::FacetsOnly);
    }

    #[test]
    fn from_file_reads_toml_with_custom_groups() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
debounce_ms = 250
clear_policy = "reset"

[[facet_groups]]
key = "experience"
label = "Experience"
options = ["0-2", "2-5", "5+"]
kind = "range"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.clear_policy, ClearPolicy::Reset);
        assert_eq!(config.max_suggestions, 6);
        assert_eq!(config.facet_groups.len(), 1);
        assert_eq!(config.facet_groups[0].kind, ValueKind::Range);
    }

    #[test]
    fn from_file_rejects_query_key_collision() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
query_key = "location"
"#
        )
        .unwrap();

        let err = Config::from_file(file.path()).unwrap_err();

        assert!(matches!(err, JobseekError::Config(ref m) if m.contains("collides")));
    }

    #[test]
    fn from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "debounce_ms = \"soon\"").unwrap();

        assert!(matches!(Config::from_file(file.path()), Err(JobseekError::Config(_))));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }
}
