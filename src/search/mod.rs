//! Incremental search: debounced lookups and the suggestion overlay.
//!
//! # Modules
//!
//! - [`debounce`]: Cancelable single-slot timer driven by explicit instants
//! - [`controller`]: Query, request sequencing and suggestion list
//! - [`overlay`]: Dropdown visibility state machine

pub mod controller;
pub mod debounce;
pub mod overlay;

pub use controller::{LookupRequest, QueryUpdate, Resolution, SearchController, SearchPhase, SearchSettings};
pub use debounce::{Debouncer, PendingTask};
pub use overlay::{Bounds, OverlayCoordinator, OverlaySignal, OverlayState, Point};
