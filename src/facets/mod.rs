//! Facet filters whose single source of truth is the navigable address.
//!
//! # Modules
//!
//! - [`groups`]: Facet group definitions and value validation
//! - [`codec`]: Pure address transformations (toggle, decode, clear)
//! - [`store`]: Filter reads and mutations over a navigator

pub mod codec;
pub mod groups;
pub mod store;

pub use codec::{FacetSelection, ValueSet};
pub use groups::{FacetGroup, ValueKind};
pub use store::{ClearPolicy, FacetStore};
