//! Incremental search controller.
//!
//! Owns the free-text query, the debounce timer, the lifecycle of the lookup request
//! in flight and the suggestion list that results from it.
//!
//! # State Machine
//!
//! ```text
//!            query ≤ threshold                      timer expired
//!   ┌──────┐ ◄──────────────── ┌─────────┐ ─────────────────────► ┌──────────┐
//!   │ Idle │                   │ Pending │                        │ Fetching │
//!   └──────┘ ────────────────► └─────────┘ ◄───────────────────── └──────────┘
//!       ▲     query > threshold      ▲        query changed           │    │
//!       │                            │                       response │    │ error
//!       │ select / submit            │ query changed                  ▼    ▼
//!       └──────────────────────── Resolved / Failed ◄─────────────────┘────┘
//! ```
//!
//! # Ordering
//!
//! Every issued request takes the next value of a monotonically increasing sequence
//! number. A response is applied only if its sequence number is the one currently in
//! flight; anything else is stale and is dropped without touching state.

use super::debounce::Debouncer;
use crate::domain::error::Result;
use crate::domain::SuggestionItem;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Tunables of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before a lookup is issued.
    pub debounce: Duration,

    /// A lookup requires the trimmed query to be strictly longer than this.
    pub min_query_chars: usize,

    /// Maximum number of suggestions kept from a response.
    pub max_suggestions: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_chars: 2,
            max_suggestions: 6,
        }
    }
}

/// Lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    Pending,
    Fetching,
    Resolved,
    Failed,
}

/// A lookup the runtime must send to the lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub seq: u64,
    pub query: String,
}

/// Effect of a query change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryUpdate {
    /// The text did not change.
    Unchanged,

    /// The debounce timer was (re-)armed; the runtime should tick at `deadline`.
    Armed { deadline: Instant },

    /// The query fell to or below the threshold; suggestions were cleared.
    Idle,
}

/// Outcome of applying the response of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The service answered; `total` is the unsliced number of matches.
    Matches { shown: usize, total: usize },

    /// The lookup failed; suggestions were cleared.
    Failed,
}

#[derive(Debug, Clone)]
pub struct SearchController {
    settings: SearchSettings,
    query: String,
    phase: SearchPhase,
    debouncer: Debouncer,
    last_issued: u64,
    in_flight: Option<u64>,
    suggestions: Vec<SuggestionItem>,
    total_matches: usize,
}

impl SearchController {
    #[must_use]
    pub const fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            query: String::new(),
            phase: SearchPhase::Idle,
            debouncer: Debouncer::new(settings.debounce),
            last_issued: 0,
            in_flight: None,
            suggestions: Vec::new(),
            total_matches: 0,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Current suggestions, at most `max_suggestions` long.
    #[must_use]
    pub fn suggestions(&self) -> &[SuggestionItem] {
        &self.suggestions
    }

    /// Number of matches in the last applied response, before truncation.
    #[must_use]
    pub const fn total_matches(&self) -> usize {
        self.total_matches
    }

    /// Sequence number of the request whose response is still awaited.
    #[must_use]
    pub const fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    #[must_use]
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    #[must_use]
    pub const fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Whether the trimmed query is long enough to be looked up.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        Self::is_searchable_text(&self.query, self.settings.min_query_chars)
    }

    /// Replaces the query text at `now`.
    ///
    /// A searchable query (re-)arms the debounce timer. A query at or below the
    /// threshold cancels the timer, invalidates any request in flight and clears the
    /// suggestions immediately.
    pub fn set_query(&mut self, text: impl Into<String>, now: Instant) -> QueryUpdate {
        let text = text.into();
        if text == self.query {
            return QueryUpdate::Unchanged;
        }
        self.query = text;

        if self.is_searchable() {
            let deadline = self.debouncer.arm(now);
            self.phase = SearchPhase::Pending;
            tracing::trace!(query = %self.query, "lookup debounced");
            QueryUpdate::Armed { deadline }
        } else {
            self.reset_to_idle();
            tracing::trace!(query = %self.query, "query below lookup threshold");
            QueryUpdate::Idle
        }
    }

    /// Issues the lookup if the debounce deadline has passed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<LookupRequest> {
        if !self.debouncer.fire(now) || !self.is_searchable() {
            return None;
        }

        self.last_issued += 1;
        let seq = self.last_issued;
        self.in_flight = Some(seq);
        self.phase = SearchPhase::Fetching;

        let query = self.query.trim().to_string();
        tracing::debug!(seq, query = %query, "issuing lookup");
        Some(LookupRequest { seq, query })
    }

    /// Applies the response of request `seq`.
    ///
    /// Returns `None` when the response is stale (a newer request was issued, or the
    /// controller went idle since), in which case nothing changes.
    pub fn apply(&mut self, seq: u64, response: Result<Vec<SuggestionItem>>) -> Option<Resolution> {
        if self.in_flight != Some(seq) {
            tracing::debug!(seq, in_flight = ?self.in_flight, "discarding stale lookup response");
            return None;
        }
        self.in_flight = None;

        match response {
            Ok(mut matches) => {
                let total = matches.len();
                matches.truncate(self.settings.max_suggestions);
                self.suggestions = matches;
                self.total_matches = total;
                self.phase = SearchPhase::Resolved;
                tracing::debug!(seq, total, shown = self.suggestions.len(), "lookup resolved");
                Some(Resolution::Matches {
                    shown: self.suggestions.len(),
                    total,
                })
            }
            Err(e) => {
                self.suggestions.clear();
                self.total_matches = 0;
                self.phase = SearchPhase::Failed;
                tracing::warn!(seq, query = %self.query, error = %e, "lookup failed");
                Some(Resolution::Failed)
            }
        }
    }

    /// Submits the raw query. Returns the trimmed text to navigate with, if any.
    pub fn submit(&mut self) -> Option<String> {
        let text = self.query.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.reset_to_idle();
        Some(text)
    }

    /// Picks suggestion `index`; its title becomes the query text.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let title = self.suggestions.get(index)?.title.clone();
        tracing::debug!(index, title = %title, "suggestion selected");
        self.query.clone_from(&title);
        self.reset_to_idle();
        Some(title)
    }

    /// "View all results": navigates with the whole query, not the shown list.
    ///
    /// The text is trimmed the same way the footer label and the lookup trim it.
    pub fn view_all(&mut self) -> Option<String> {
        let text = self.query.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.reset_to_idle();
        Some(text)
    }

    /// Overwrites the text without scheduling a lookup, e.g. to mirror the address
    /// after a navigation.
    pub fn replace_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.query {
            return;
        }
        self.query = text;
        self.reset_to_idle();
    }

    /// Drops the pending timer and any request in flight without touching the text.
    pub fn cancel(&mut self) {
        self.reset_to_idle();
    }

    fn reset_to_idle(&mut self) {
        self.debouncer.cancel();
        self.in_flight = None;
        self.suggestions.clear();
        self.total_matches = 0;
        self.phase = SearchPhase::Idle;
    }

    fn is_searchable_text(text: &str, min_chars: usize) -> bool {
        text.trim().chars().count() > min_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobseekError;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn items(n: usize) -> Vec<SuggestionItem> {
        (0..n)
            .map(|i| SuggestionItem::new(i.to_string(), format!("Engineer {i}"), "Acme"))
            .collect()
    }

    /// Types `text` one character at a time, `gap` apart, polling after each key.
    fn type_slowly(
        controller: &mut SearchController,
        start: Instant,
        text: &str,
        gap: Duration,
    ) -> (Instant, Vec<LookupRequest>) {
        let mut issued = Vec::new();
        let mut now = start;
        for end in 1..=text.len() {
            controller.set_query(&text[..end], now);
            now += gap;
            issued.extend(controller.poll(now));
        }
        (now, issued)
    }

    #[test]
    fn short_queries_never_issue_lookups() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());

        for text in ["", "a", "ab", "  ab  ", "a b", "\tx\t"] {
            assert_eq!(controller.set_query(text, start), QueryUpdate::Idle);
            assert_eq!(controller.poll(start + ms(10_000)), None);
            assert_eq!(controller.phase(), SearchPhase::Idle);
            assert!(controller.suggestions().is_empty());
        }
    }

    #[test]
    fn burst_of_keystrokes_issues_one_lookup_for_final_text() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());

        let (after_typing, issued) = type_slowly(&mut controller, start, "engineer", ms(50));
        assert!(issued.is_empty());

        let last_keystroke = start + ms(50 * 7);
        assert_eq!(controller.pending_deadline(), Some(last_keystroke + ms(300)));
        assert_eq!(controller.poll(last_keystroke + ms(299)), None);

        let request = controller.poll(last_keystroke + ms(300)).unwrap();
        assert_eq!(request, LookupRequest { seq: 1, query: "engineer".to_string() });
        assert_eq!(controller.phase(), SearchPhase::Fetching);
        assert_eq!(controller.poll(after_typing + ms(10_000)), None);
    }

    #[test]
    fn response_keeps_first_six_in_service_order() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());
        controller.set_query("engineer", start);
        let request = controller.poll(start + ms(300)).unwrap();

        let resolution = controller.apply(request.seq, Ok(items(10)));

        assert_eq!(resolution, Some(Resolution::Matches { shown: 6, total: 10 }));
        let ids: Vec<&str> = controller.suggestions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["0", "1", "2", "3", "4", "5"]);
        assert_eq!(controller.total_matches(), 10);
        assert_eq!(controller.phase(), SearchPhase::Resolved);
    }

    #[test]
    fn stale_response_is_discarded() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());

        controller.set_query("rust", start);
        let first = controller.poll(start + ms(300)).unwrap();
        controller.set_query("python", start + ms(400));
        let second = controller.poll(start + ms(700)).unwrap();
        assert!(second.seq > first.seq);

        let resolved = controller.apply(second.seq, Ok(items(2)));
        let before = controller.suggestions().to_vec();
        let late = controller.apply(first.seq, Ok(items(9)));

        assert!(resolved.is_some());
        assert_eq!(late, None);
        assert_eq!(controller.suggestions(), before.as_slice());
        assert_eq!(controller.phase(), SearchPhase::Resolved);
    }

    #[test]
    fn in_flight_response_applies_while_next_lookup_is_pending() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());
        controller.set_query("rust", start);
        let first = controller.poll(start + ms(300)).unwrap();

        controller.set_query("rusty", start + ms(310));

        assert_eq!(controller.apply(first.seq, Ok(items(1))), Some(Resolution::Matches { shown: 1, total: 1 }));
    }

    #[test]
    fn dropping_below_threshold_invalidates_in_flight_request() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());
        controller.set_query("rust", start);
        let request = controller.poll(start + ms(300)).unwrap();

        assert_eq!(controller.set_query("ru", start + ms(350)), QueryUpdate::Idle);

        assert_eq!(controller.apply(request.seq, Ok(items(3))), None);
        assert!(controller.suggestions().is_empty());
        assert_eq!(controller.phase(), SearchPhase::Idle);
    }

    #[test]
    fn failure_clears_suggestions() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());
        controller.set_query("rust", start);
        let first = controller.poll(start + ms(300)).unwrap();
        controller.apply(first.seq, Ok(items(3)));

        controller.set_query("rusty", start + ms(400));
        let second = controller.poll(start + ms(700)).unwrap();
        let resolution = controller.apply(second.seq, Err(JobseekError::LookupTransport("502".into())));

        assert_eq!(resolution, Some(Resolution::Failed));
        assert!(controller.suggestions().is_empty());
        assert_eq!(controller.phase(), SearchPhase::Failed);
    }

    #[test]
    fn select_uses_title_and_returns_to_idle() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());
        controller.set_query("eng", start);
        let request = controller.poll(start + ms(300)).unwrap();
        controller.apply(request.seq, Ok(items(3)));

        assert_eq!(controller.select(2).as_deref(), Some("Engineer 2"));
        assert_eq!(controller.query(), "Engineer 2");
        assert_eq!(controller.phase(), SearchPhase::Idle);
        assert!(controller.suggestions().is_empty());
        assert_eq!(controller.select(0), None);
    }

    #[test]
    fn submit_trims_and_ignores_blank_queries() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());

        controller.set_query("   ", start);
        assert_eq!(controller.submit(), None);

        controller.set_query("  data engineer ", start);
        assert_eq!(controller.submit().as_deref(), Some("data engineer"));
        assert_eq!(controller.pending_deadline(), None);
        assert_eq!(controller.poll(start + ms(1_000)), None);
    }

    #[test]
    fn view_all_uses_trimmed_query_text() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());
        controller.set_query("engineer ", start);
        let request = controller.poll(start + ms(300)).unwrap();
        controller.apply(request.seq, Ok(items(10)));

        assert_eq!(controller.view_all().as_deref(), Some("engineer"));
        assert_eq!(controller.phase(), SearchPhase::Idle);
    }

    #[test]
    fn unchanged_text_does_not_rearm() {
        let start = Instant::now();
        let mut controller = SearchController::new(SearchSettings::default());
        controller.set_query("rust", start);

        assert_eq!(controller.set_query("rust", start + ms(200)), QueryUpdate::Unchanged);
        assert_eq!(controller.pending_deadline(), Some(start + ms(300)));
    }
}
