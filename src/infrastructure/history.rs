//! Navigation history: the read/write capability over the current location.
//!
//! The address is the only state shared between views, so instead of a global
//! router every consumer receives a [`Navigator`] explicitly. [`History`] is the
//! in-memory implementation used by the runtime and the tests; a browser or
//! desktop shell would implement the trait over its own history stack.

use crate::domain::Location;
use chrono::{DateTime, Utc};

/// Read/write access to the current location.
pub trait Navigator {
    /// The location currently displayed.
    fn location(&self) -> &Location;

    /// Navigates to `location`, making it current.
    ///
    /// Navigation is fire-and-forget: whatever the destination view loads happens
    /// outside of this call.
    fn push(&mut self, location: Location);
}

/// One visited location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub location: Location,
    pub visited_at: DateTime<Utc>,
}

/// Browser-style history stack with a cursor.
///
/// Pushing discards every entry after the cursor, then appends.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    #[must_use]
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![HistoryEntry {
                location: initial,
                visited_at: Utc::now(),
            }],
            cursor: 0,
        }
    }

    /// Steps back one entry, returning the new current location.
    ///
    /// Returns `None` (and stays put) when already at the oldest entry.
    pub fn back(&mut self) -> Option<&Location> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        tracing::debug!(cursor = self.cursor, location = %self.location(), "history back");
        Some(self.location())
    }

    /// Steps forward one entry if a later entry exists.
    pub fn forward(&mut self) -> Option<&Location> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        tracing::debug!(cursor = self.cursor, location = %self.location(), "history forward");
        Some(self.location())
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Navigator for History {
    fn location(&self) -> &Location {
        &self.entries[self.cursor].location
    }

    fn push(&mut self, location: Location) {
        self.entries.truncate(self.cursor + 1);
        tracing::debug!(location = %location, depth = self.entries.len() + 1, "history push");
        self.entries.push(HistoryEntry {
            location,
            visited_at: Utc::now(),
        });
        self.cursor = self.entries.len() - 1;
    }
}
