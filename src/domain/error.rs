//! Error types for the search and filter engine.
//!
//! This module defines the centralized error type [`JobseekError`] and a type alias
//! [`Result`] used throughout the crate. None of these errors is fatal to the host
//! application: lookup failures collapse the suggestion list and malformed facet values
//! collapse a single facet group to "no selection".

use thiserror::Error;

/// The main error type for jobseek operations.
///
/// # Examples
///
/// ```
/// use jobseek::JobseekError;
///
/// let err = JobseekError::LookupTransport("503 Service Unavailable".to_string());
/// assert_eq!(err.to_string(), "Lookup transport error: 503 Service Unavailable");
/// ```
#[derive(Debug, Error)]
pub enum JobseekError {
    /// The lookup service could not be reached or answered with a non-success status.
    ///
    /// Recovered locally by clearing the suggestion list and closing the overlay.
    #[error("Lookup transport error: {0}")]
    LookupTransport(String),

    /// A facet group carried a value the group cannot interpret.
    ///
    /// Recovered by treating the whole group as having no selection.
    #[error("Malformed address: facet `{group}` has value `{value}` ({reason})")]
    MalformedAddress {
        /// Facet group key as it appears in the address.
        group: String,
        /// Offending raw value.
        value: String,
        /// Short description of what was expected.
        reason: String,
    },

    /// The reference job catalog could not be loaded or parsed.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Communication with the lookup worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

/// A specialized `Result` type for jobseek operations.
pub type Result<T> = std::result::Result<T, JobseekError>;
