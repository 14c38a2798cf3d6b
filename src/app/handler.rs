//! Event handling and state transition logic.
//!
//! The handler translates events from the runtime (keystrokes, timer ticks, pointer
//! input, navigation, worker responses) into state changes and action sequences.
//!
//! # Event Types
//!
//! - **Search input**: `QueryChanged`, `Tick`, `FocusIn`, `Submit`
//! - **Overlay**: `PointerDown`, `Layout`, `SelectSuggestion`, `ViewAllResults`
//! - **Facets**: `ToggleFacet`, `ClearFilters`
//! - **Navigation**: `Navigated`, `NavigateBack`, `NavigateForward`
//! - **Lifecycle**: `Mount`, `Unmount`
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Example
//!
//! ```rust
//! use jobseek::{handle_event, Action, AppState, Config, Event};
//! use std::time::{Duration, Instant};
//!
//! let mut state = AppState::new(&Config::default(), "/search".parse().unwrap());
//! let start = Instant::now();
//!
//! let (_, actions) = handle_event(&mut state, &Event::QueryChanged { text: "rust".into(), now: start })?;
//! assert!(matches!(actions[..], [Action::ScheduleTick { .. }]));
//!
//! let (_, actions) = handle_event(&mut state, &Event::Tick { now: start + Duration::from_millis(300) })?;
//! assert!(matches!(actions[..], [Action::PostToWorker(_)]));
//! # Ok::<(), jobseek::JobseekError>(())
//! ```

use crate::app::{Action, AppState};
use crate::domain::error::{JobseekError, Result};
use crate::domain::Location;
use crate::infrastructure::Navigator;
use crate::search::{Bounds, OverlaySignal, Point, QueryUpdate, Resolution};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::time::Instant;

/// Events triggered by user input, the clock, navigation, or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The search input text changed at `now`.
    QueryChanged { text: String, now: Instant },

    /// The clock reached `now`; fires the debounce timer if it is due.
    Tick { now: Instant },

    /// The search input gained focus.
    FocusIn,

    /// A pointer press anywhere in the window.
    PointerDown { point: Point },

    /// The control was laid out at `bounds`.
    Layout { bounds: Bounds },

    /// A suggestion row was chosen.
    SelectSuggestion(usize),

    /// The "view all results" footer was chosen.
    ViewAllResults,

    /// The input was submitted (Enter).
    Submit,

    ToggleFacet { group: String, value: String },

    ClearFilters,

    /// The host navigated somewhere on its own (link, typed address, reload).
    Navigated(Location),

    /// The host's back button.
    NavigateBack,

    /// The host's forward button.
    NavigateForward,

    WorkerResponse(WorkerResponse),

    /// The control was attached to the page.
    Mount,

    /// The control was detached from the page.
    Unmount,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The returned flag tells the runtime whether the view must be re-rendered.
///
/// # Errors
///
/// Reserved for runtime failures; recoverable conditions (malformed facet values,
/// lookup failures, stale responses) are logged and folded into state instead.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::QueryChanged { text, now } => match state.search.set_query(text.as_str(), *now) {
            QueryUpdate::Unchanged => Ok((false, vec![])),
            QueryUpdate::Armed { deadline } => Ok((true, vec![Action::ScheduleTick { at: deadline }])),
            QueryUpdate::Idle => {
                state.overlay.apply(OverlaySignal::QueryTooShort);
                Ok((true, vec![]))
            }
        },

        Event::Tick { now } => {
            let Some(request) = state.search.poll(*now) else {
                return Ok((false, vec![]));
            };
            state.overlay.apply(OverlaySignal::FetchStarted);
            let message = WorkerMessage::lookup(request.seq, request.query);
            Ok((true, vec![Action::PostToWorker(message)]))
        }

        Event::FocusIn => {
            let changed = state.overlay.apply(OverlaySignal::FocusIn {
                query_searchable: state.search.is_searchable(),
                has_suggestions: !state.search.suggestions().is_empty(),
            });
            Ok((changed, vec![]))
        }

        Event::PointerDown { point } => Ok((state.overlay.pointer_down(*point), vec![])),

        Event::Layout { bounds } => {
            state.overlay.set_bounds(*bounds);
            Ok((false, vec![]))
        }

        Event::SelectSuggestion(index) => {
            let Some(title) = state.search.select(*index) else {
                tracing::debug!(index, "no suggestion at index");
                return Ok((false, vec![]));
            };
            Ok(dismiss_and_load(state, &title))
        }

        Event::ViewAllResults => {
            let Some(text) = state.search.view_all() else {
                return Ok((false, vec![]));
            };
            Ok(dismiss_and_load(state, &text))
        }

        Event::Submit => {
            let Some(text) = state.search.submit() else {
                tracing::debug!("ignoring submit of blank query");
                return Ok((false, vec![]));
            };
            Ok(dismiss_and_load(state, &text))
        }

        Event::ToggleFacet { group, value } => match state.facets.toggle(&mut state.history, group, value) {
            Ok(location) => {
                state.sync_query_from_location();
                state.overlay.apply(OverlaySignal::Dismissed);
                Ok((true, vec![Action::LoadResults(location)]))
            }
            Err(e @ JobseekError::MalformedAddress { .. }) => {
                tracing::warn!(error = %e, "rejected facet toggle");
                Ok((false, vec![]))
            }
            Err(e) => Err(e),
        },

        Event::ClearFilters => {
            let location = state.facets.clear_all_filters(&mut state.history);
            state.sync_query_from_location();
            state.overlay.apply(OverlaySignal::Dismissed);
            Ok((true, vec![Action::LoadResults(location)]))
        }

        Event::Navigated(location) => {
            state.history.push(location.clone());
            state.sync_query_from_location();
            state.overlay.apply(OverlaySignal::Dismissed);
            Ok((true, vec![Action::LoadResults(location.clone())]))
        }

        Event::NavigateBack => {
            let Some(location) = state.history.back().cloned() else {
                tracing::debug!("already at oldest history entry");
                return Ok((false, vec![]));
            };
            Ok(restore_from_history(state, location))
        }

        Event::NavigateForward => {
            let Some(location) = state.history.forward().cloned() else {
                tracing::debug!("already at newest history entry");
                return Ok((false, vec![]));
            };
            Ok(restore_from_history(state, location))
        }

        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),

        Event::Mount => {
            state.overlay.mount(&state.listeners);
            Ok((false, vec![]))
        }

        Event::Unmount => {
            state.overlay.unmount();
            state.search.cancel();
            Ok((true, vec![]))
        }
    }
}

/// Closes the overlay and navigates to the results view for `text`.
fn dismiss_and_load(state: &mut AppState, text: &str) -> (bool, Vec<Action>) {
    state.overlay.apply(OverlaySignal::Dismissed);
    let location = state.navigate_to_results(text);
    (true, vec![Action::LoadResults(location)])
}

/// Re-derives the page from a history entry the host moved to.
fn restore_from_history(state: &mut AppState, location: Location) -> (bool, Vec<Action>) {
    state.sync_query_from_location();
    state.overlay.apply(OverlaySignal::Dismissed);
    (true, vec![Action::LoadResults(location)])
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    let resolution = match response {
        WorkerResponse::LookupCompleted { seq, items } => state.search.apply(*seq, Ok(items.clone())),
        WorkerResponse::LookupFailed { seq, message } => state
            .search
            .apply(*seq, Err(JobseekError::LookupTransport(message.clone()))),
        WorkerResponse::CatalogReloaded { records } => {
            tracing::info!(records, "lookup catalog reloaded");
            return (false, vec![]);
        }
        WorkerResponse::Error { message } => {
            tracing::warn!(error = %message, "worker reported error");
            return (false, vec![]);
        }
    };

    let signal = match resolution {
        Some(Resolution::Matches { total, .. }) => OverlaySignal::Resolved { matches: total },
        Some(Resolution::Failed) => OverlaySignal::Failed,
        None => return (false, vec![]),
    };
    state.overlay.apply(signal);
    (true, vec![])
}
