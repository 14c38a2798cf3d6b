//! Lookup service abstraction.
//!
//! The engine treats the search/ranking service as opaque: a query string goes in, an
//! ordered list of matches (best first) comes out. Truncation to the dropdown size is
//! the controller's job, so implementations should return everything they matched.

use crate::domain::error::Result;
use crate::domain::SuggestionItem;

/// A source of suggestions for a free-text query.
///
/// Implementations run on the lookup worker thread, hence `Send`.
///
/// # Implementations
///
/// - [`JsonCatalog`](crate::lookup::JsonCatalog): fuzzy matching over a JSON job file
/// - any `Fn(&str) -> Result<Vec<SuggestionItem>> + Send` closure
///
/// # Examples
///
/// ```
/// use jobseek::lookup::LookupService;
/// use jobseek::{JobseekError, SuggestionItem};
///
/// let offline = |_: &str| -> jobseek::Result<Vec<SuggestionItem>> {
///     Err(JobseekError::LookupTransport("offline".to_string()))
/// };
/// assert!(offline.lookup("rust").is_err());
/// ```
pub trait LookupService: Send {
    /// Returns every match for `query`, best first.
    ///
    /// # Errors
    ///
    /// Returns [`JobseekError::LookupTransport`](crate::JobseekError::LookupTransport)
    /// when the service cannot answer.
    fn lookup(&self, query: &str) -> Result<Vec<SuggestionItem>>;
}

impl<F> LookupService for F
where
    F: Fn(&str) -> Result<Vec<SuggestionItem>> + Send,
{
    fn lookup(&self, query: &str) -> Result<Vec<SuggestionItem>> {
        self(query)
    }
}
