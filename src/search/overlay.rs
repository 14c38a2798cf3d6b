//! Suggestion overlay visibility.
//!
//! One [`OverlayCoordinator`] per search control. It reacts to signals from the
//! controller and to pointer input, and owns the control's outside-interaction
//! listener registration while the control is mounted.

use crate::infrastructure::{ControlId, ListenerGuard, ListenerRegistry};
use serde::Serialize;

/// Visibility of the suggestion dropdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayState {
    #[default]
    Closed,
    Loading,
    ShowingResults,
    ShowingEmpty,
}

impl OverlayState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Inputs the coordinator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlaySignal {
    /// The input gained focus.
    FocusIn {
        query_searchable: bool,
        has_suggestions: bool,
    },
    /// A pointer press landed outside the control.
    PointerOutside,
    /// A lookup was issued.
    FetchStarted,
    /// The current lookup answered with `matches` results before truncation.
    Resolved { matches: usize },
    Failed,
    /// The query fell to or below the lookup threshold.
    QueryTooShort,
    /// A suggestion, "view all" or a submit was chosen.
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Screen rectangle of the control: input plus dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let (px, py) = (i64::from(point.x), i64::from(point.y));
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        px >= x && py >= y && px < x + i64::from(self.width) && py < y + i64::from(self.height)
    }
}

#[derive(Debug)]
pub struct OverlayCoordinator {
    control: ControlId,
    state: OverlayState,
    show_empty_state: bool,
    bounds: Option<Bounds>,
    listener: Option<ListenerGuard>,
}

impl OverlayCoordinator {
    #[must_use]
    pub const fn new(control: ControlId, show_empty_state: bool) -> Self {
        Self {
            control,
            state: OverlayState::Closed,
            show_empty_state,
            bounds: None,
            listener: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> OverlayState {
        self.state
    }

    #[must_use]
    pub const fn control(&self) -> ControlId {
        self.control
    }

    #[must_use]
    pub const fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = Some(bounds);
    }

    /// Applies a signal. Returns `true` if the visible state changed.
    pub fn apply(&mut self, signal: OverlaySignal) -> bool {
        let next = match signal {
            OverlaySignal::FocusIn {
                query_searchable,
                has_suggestions,
            } => {
                // A lookup still in flight keeps its loading indicator.
                if query_searchable && has_suggestions && self.state != OverlayState::Loading {
                    OverlayState::ShowingResults
                } else {
                    self.state
                }
            }
            OverlaySignal::FetchStarted => OverlayState::Loading,
            OverlaySignal::Resolved { matches } if matches > 0 => OverlayState::ShowingResults,
            OverlaySignal::Resolved { .. } if self.show_empty_state => OverlayState::ShowingEmpty,
            OverlaySignal::Resolved { .. }
            | OverlaySignal::PointerOutside
            | OverlaySignal::Failed
            | OverlaySignal::QueryTooShort
            | OverlaySignal::Dismissed => OverlayState::Closed,
        };

        if next == self.state {
            return false;
        }
        tracing::debug!(
            control = self.control.0,
            from = ?self.state,
            to = ?next,
            signal = ?signal,
            "overlay transition"
        );
        self.state = next;
        true
    }

    /// Handles a pointer press anywhere in the window.
    ///
    /// Presses are only observed while mounted. A press outside the known bounds
    /// closes the overlay; before the first layout every press counts as outside.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        if self.listener.is_none() {
            return false;
        }
        let inside = self.bounds.is_some_and(|b| b.contains(point));
        if inside {
            return false;
        }
        self.apply(OverlaySignal::PointerOutside)
    }

    /// Registers the outside-interaction listener. Mounting twice keeps one registration.
    pub fn mount(&mut self, registry: &ListenerRegistry) {
        if self.listener.is_some() {
            return;
        }
        self.listener = Some(registry.register(self.control));
    }

    /// Tears down the listener and closes the overlay.
    pub fn unmount(&mut self) {
        self.listener = None;
        self.state = OverlayState::Closed;
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.listener.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONTROL: ControlId = ControlId(1);

    fn bounds() -> Bounds {
        Bounds {
            x: 10,
            y: 10,
            width: 100,
            height: 40,
        }
    }

    fn mounted(registry: &ListenerRegistry) -> OverlayCoordinator {
        let mut overlay = OverlayCoordinator::new(CONTROL, false);
        overlay.mount(registry);
        overlay.set_bounds(bounds());
        overlay
    }

    #[test]
    fn fetch_then_results_then_outside_click() {
        let registry = ListenerRegistry::new();
        let mut overlay = mounted(&registry);

        assert!(overlay.apply(OverlaySignal::FetchStarted));
        assert_eq!(overlay.state(), OverlayState::Loading);
        assert!(overlay.apply(OverlaySignal::Resolved { matches: 10 }));
        assert_eq!(overlay.state(), OverlayState::ShowingResults);

        assert!(!overlay.pointer_down(Point { x: 50, y: 20 }));
        assert!(overlay.pointer_down(Point { x: 500, y: 20 }));
        assert_eq!(overlay.state(), OverlayState::Closed);
    }

    #[test]
    fn empty_results_close_unless_empty_state_enabled() {
        let mut overlay = OverlayCoordinator::new(CONTROL, false);
        overlay.apply(OverlaySignal::FetchStarted);
        overlay.apply(OverlaySignal::Resolved { matches: 0 });
        assert_eq!(overlay.state(), OverlayState::Closed);

        let mut overlay = OverlayCoordinator::new(CONTROL, true);
        overlay.apply(OverlaySignal::FetchStarted);
        overlay.apply(OverlaySignal::Resolved { matches: 0 });
        assert_eq!(overlay.state(), OverlayState::ShowingEmpty);
    }

    #[test]
    fn focus_reopens_only_with_searchable_query_and_suggestions() {
        let mut overlay = OverlayCoordinator::new(CONTROL, false);

        overlay.apply(OverlaySignal::FocusIn {
            query_searchable: false,
            has_suggestions: true,
        });
        assert_eq!(overlay.state(), OverlayState::Closed);

        overlay.apply(OverlaySignal::FocusIn {
            query_searchable: true,
            has_suggestions: false,
        });
        assert_eq!(overlay.state(), OverlayState::Closed);

        overlay.apply(OverlaySignal::FocusIn {
            query_searchable: true,
            has_suggestions: true,
        });
        assert_eq!(overlay.state(), OverlayState::ShowingResults);
    }

    #[test]
    fn focus_during_fetch_keeps_loading() {
        let mut overlay = OverlayCoordinator::new(CONTROL, false);
        overlay.apply(OverlaySignal::Resolved { matches: 4 });
        overlay.apply(OverlaySignal::FetchStarted);

        let changed = overlay.apply(OverlaySignal::FocusIn {
            query_searchable: true,
            has_suggestions: true,
        });

        assert!(!changed);
        assert_eq!(overlay.state(), OverlayState::Loading);
    }

    #[test]
    fn failure_short_query_and_dismiss_all_close() {
        for signal in [
            OverlaySignal::Failed,
            OverlaySignal::QueryTooShort,
            OverlaySignal::Dismissed,
        ] {
            let mut overlay = OverlayCoordinator::new(CONTROL, false);
            overlay.apply(OverlaySignal::FetchStarted);
            overlay.apply(signal);
            assert_eq!(overlay.state(), OverlayState::Closed, "{signal:?}");
        }
    }

    #[test]
    fn listener_registered_once_and_torn_down_on_unmount() {
        let registry = ListenerRegistry::new();
        let mut overlay = mounted(&registry);
        overlay.mount(&registry);
        assert_eq!(registry.registrations(CONTROL), 1);

        overlay.unmount();
        assert_eq!(registry.registrations(CONTROL), 0);
        assert!(!overlay.is_mounted());
    }

    #[test]
    fn unmounted_control_ignores_pointer_presses() {
        let mut overlay = OverlayCoordinator::new(CONTROL, false);
        overlay.apply(OverlaySignal::FetchStarted);

        assert!(!overlay.pointer_down(Point { x: -5, y: -5 }));
        assert_eq!(overlay.state(), OverlayState::Loading);
    }

    #[test]
    fn dropping_coordinator_unregisters() {
        let registry = ListenerRegistry::new();
        {
            let _overlay = mounted(&registry);
            assert_eq!(registry.total(), 1);
        }
        assert_eq!(registry.total(), 0);
    }

    #[test]
    fn bounds_edges() {
        let b = bounds();
        assert!(b.contains(Point { x: 10, y: 10 }));
        assert!(b.contains(Point { x: 109, y: 49 }));
        assert!(!b.contains(Point { x: 110, y: 49 }));
        assert!(!b.contains(Point { x: 9, y: 20 }));
    }
}
