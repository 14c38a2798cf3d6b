//! Cancelable single-slot debounce timer.
//!
//! The timer never sleeps or spawns anything: the event loop passes the current
//! instant in and asks whether the deadline has passed. Arming replaces whatever was
//! pending, so at most one deferred task exists per timer at any moment.
//!
//! ```
//! use jobseek::search::Debouncer;
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut timer = Debouncer::new(Duration::from_millis(300));
//!
//! timer.arm(start);
//! timer.arm(start + Duration::from_millis(50)); // cancels the first deadline
//!
//! assert!(!timer.fire(start + Duration::from_millis(300)));
//! assert!(timer.fire(start + Duration::from_millis(350)));
//! assert!(!timer.is_pending());
//! ```

use std::time::{Duration, Instant};

/// The task currently waiting in the timer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTask {
    pub armed_at: Instant,
    pub deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    slot: Option<PendingTask>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay, slot: None }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms the timer at `now`, cancelling any pending task. Returns the new deadline.
    pub fn arm(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        if let Some(previous) = self.slot.replace(PendingTask { armed_at: now, deadline }) {
            tracing::trace!(
                superseded_after_ms = u64::try_from(now.saturating_duration_since(previous.armed_at).as_millis()).unwrap_or(u64::MAX),
                "debounce re-armed"
            );
        }
        deadline
    }

    /// Cancels the pending task. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.slot.take().is_some()
    }

    /// Consumes the pending task if its deadline has passed at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.slot {
            Some(task) if now >= task.deadline => {
                self.slot = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.slot.map(|task| task.deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn fires_once_at_deadline() {
        let start = Instant::now();
        let mut timer = Debouncer::new(DELAY);
        let deadline = timer.arm(start);

        assert_eq!(deadline, start + DELAY);
        assert!(!timer.fire(start + Duration::from_millis(299)));
        assert!(timer.fire(deadline));
        assert!(!timer.fire(deadline + DELAY));
    }

    #[test]
    fn rearming_keeps_a_single_slot() {
        let start = Instant::now();
        let mut timer = Debouncer::new(DELAY);

        for step in 0..5 {
            timer.arm(start + Duration::from_millis(step * 50));
        }

        assert_eq!(timer.deadline(), Some(start + Duration::from_millis(200) + DELAY));
        assert!(!timer.fire(start + DELAY));
    }

    #[test]
    fn cancel_clears_pending_task() {
        let start = Instant::now();
        let mut timer = Debouncer::new(DELAY);
        timer.arm(start);

        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert!(!timer.fire(start + DELAY * 2));
    }
}
