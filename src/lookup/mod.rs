//! Lookup services answering free-text queries.
//!
//! # Modules
//!
//! - `backend`: The [`LookupService`] trait
//! - `catalog`: Fuzzy-ranked JSON job catalog
//! - `models`: Catalog record types separate from suggestion items

pub mod backend;
pub mod catalog;
pub mod models;

pub use backend::LookupService;
pub use catalog::JsonCatalog;
pub use models::JobRecord;
