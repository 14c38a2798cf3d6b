//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. Actions
//! bridge pure state transitions and effectful operations: talking to the lookup
//! worker, arming a real timer, and loading the results view.
//!
//! # Example
//!
//! ```rust
//! use jobseek::Action;
//! use jobseek::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::lookup(1, "rust".to_string()))];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::domain::Location;
use crate::worker::WorkerMessage;
use std::time::Instant;

/// Commands the runtime executes after an event has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Posts a message to the lookup worker thread.
    PostToWorker(WorkerMessage),

    /// Deliver an `Event::Tick` no earlier than `at`.
    ///
    /// Ticks are idempotent, so a runtime may coalesce or over-deliver them.
    ScheduleTick { at: Instant },

    /// The current location changed; the results view should load it.
    ///
    /// The navigator has already been updated when this is emitted.
    LoadResults(Location),
}
