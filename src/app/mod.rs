//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the runtime (main.rs) and the search, facet and worker
//! layers.
//!
//! ```text
//! Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                       ↑                                  ↓
//!                       └────── Ticks / Worker Responses ──┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use state::AppState;
