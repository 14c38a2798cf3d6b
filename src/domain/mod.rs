//! Domain layer for the search and filter engine.
//!
//! Core data types shared by every other layer, independent of the event loop or
//! the lookup transport.
//!
//! # Organization
//!
//! - [`address`]: Navigable address and route location
//! - [`error`]: Error types and result aliases
//! - [`suggestion`]: Suggestion items returned by lookups

pub mod address;
pub mod error;
pub mod suggestion;

pub use address::{Location, NavigableAddress};
pub use error::{JobseekError, Result};
pub use suggestion::SuggestionItem;
