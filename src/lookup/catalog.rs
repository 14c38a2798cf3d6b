//! JSON job catalog with fuzzy ranking.
//!
//! A reference [`LookupService`] that keeps a list of job records in memory and ranks
//! them against the query with the skim fuzzy matcher. Every whitespace-separated
//! query token must match the record's title or employer; the score is the sum of the
//! token scores.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "jobs": [
//!     {
//!       "id": "2",
//!       "job_title": "Senior Rust Engineer",
//!       "employer_name": "Deodar Systems",
//!       "job_location": "dehradun",
//!       "job_employment_type_text": "remote",
//!       "posted_at": 1736294400
//!     }
//!   ]
//! }
//! ```
//!
//! A bare array of records is accepted as well.

use super::backend::LookupService;
use super::models::JobRecord;
use crate::domain::error::{JobseekError, Result};
use crate::domain::SuggestionItem;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Deserialize;
use std::cmp::Reverse;
use std::path::Path;

const SAMPLE_CATALOG: &str = include_str!("../../data/sample_jobs.json");

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Versioned {
        #[allow(dead_code)]
        version: u32,
        jobs: Vec<JobRecord>,
    },
    Bare(Vec<JobRecord>),
}

/// In-memory job catalog.
pub struct JsonCatalog {
    records: Vec<JobRecord>,
    matcher: SkimMatcherV2,
}

impl std::fmt::Debug for JsonCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonCatalog")
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

impl JsonCatalog {
    #[must_use]
    pub fn new(records: Vec<JobRecord>) -> Self {
        Self {
            records,
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Loads a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = ?path, "loading job catalog");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parses a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`JobseekError::Catalog`] if the text is not a valid catalog.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(contents)
            .map_err(|e| JobseekError::Catalog(format!("failed to parse catalog: {e}")))?;
        let records = match file {
            CatalogFile::Versioned { jobs, .. } => jobs,
            CatalogFile::Bare(jobs) => jobs,
        };
        tracing::debug!(records = records.len(), "catalog loaded");
        Ok(Self::new(records))
    }

    /// The catalog bundled with the crate, used when no file is configured.
    ///
    /// # Errors
    ///
    /// Returns [`JobseekError::Catalog`] if the bundled data fails to parse.
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_CATALOG)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn score(&self, record: &JobRecord, tokens: &[String]) -> Option<i64> {
        let haystack = record.haystack();
        tokens
            .iter()
            .map(|token| self.matcher.fuzzy_match(&haystack, token))
            .sum()
    }
}

impl LookupService for JsonCatalog {
    fn lookup(&self, query: &str) -> Result<Vec<SuggestionItem>> {
        let _span = tracing::debug_span!("catalog_lookup", query = %query, records = self.records.len()).entered();

        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(i64, &JobRecord)> = self
            .records
            .iter()
            .filter_map(|record| self.score(record, &tokens).map(|score| (score, record)))
            .collect();

        scored.sort_by_key(|(score, record)| (Reverse(*score), Reverse(record.posted_at), record.id.clone()));

        tracing::debug!(matches = scored.len(), "catalog lookup finished");
        Ok(scored.into_iter().map(|(_, record)| SuggestionItem::from(record)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(id: &str, title: &str, employer: &str, posted_at: i64) -> JobRecord {
        let mut record = JobRecord::new(id, title, employer);
        record.posted_at = Some(posted_at);
        record
    }

    fn titles(items: &[SuggestionItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn every_token_must_match() {
        let catalog = JsonCatalog::new(vec![
            record("1", "Rust Engineer", "Acme", 1),
            record("2", "Data Engineer", "Globex", 1),
            record("3", "Rust Trainer", "Globex", 1),
        ]);

        let items = catalog.lookup("rust engineer").unwrap();

        assert_eq!(titles(&items), ["Rust Engineer"]);
    }

    #[test]
    fn employer_name_is_searchable() {
        let catalog = JsonCatalog::new(vec![
            record("1", "Rust Engineer", "Acme", 1),
            record("2", "Data Engineer", "Globex", 1),
        ]);

        let items = catalog.lookup("globex").unwrap();

        assert_eq!(titles(&items), ["Data Engineer"]);
    }

    #[test]
    fn equal_scores_prefer_newer_postings() {
        let catalog = JsonCatalog::new(vec![
            record("1", "QA Engineer", "Acme", 100),
            record("2", "QA Engineer", "Acme", 300),
            record("3", "QA Engineer", "Acme", 200),
        ]);

        let ids: Vec<String> = catalog.lookup("qa").unwrap().into_iter().map(|i| i.id).collect();

        assert_eq!(ids, ["2", "3", "1"]);
    }

    #[test]
    fn blank_query_matches_nothing() {
        let catalog = JsonCatalog::sample().unwrap();
        assert!(catalog.lookup("   ").unwrap().is_empty());
    }

    #[test]
    fn sample_catalog_has_many_engineers() {
        let catalog = JsonCatalog::sample().unwrap();

        let items = catalog.lookup("engineer").unwrap();

        assert_eq!(catalog.len(), 12);
        assert!(items.len() > 6);
    }

    #[test]
    fn loads_versioned_and_bare_files() {
        let mut versioned = NamedTempFile::new().unwrap();
        write!(
            versioned,
            r#"{{"version":1,"jobs":[{{"id":"1","job_title":"SRE","employer_name":"Acme"}}]}}"#
        )
        .unwrap();
        let mut bare = NamedTempFile::new().unwrap();
        write!(bare, r#"[{{"id":"1","job_title":"SRE","employer_name":"Acme"}}]"#).unwrap();

        assert_eq!(JsonCatalog::from_file(versioned.path()).unwrap().len(), 1);
        assert_eq!(JsonCatalog::from_file(bare.path()).unwrap().len(), 1);
    }

    #[test]
    fn invalid_file_is_a_catalog_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = JsonCatalog::from_file(file.path()).unwrap_err();

        assert!(matches!(err, JobseekError::Catalog(_)));
    }
}
