//! Job records as stored in a catalog file.
//!
//! Records are separate from [`SuggestionItem`]: they carry fields the dropdown never
//! shows (the posting time) but the catalog uses for ranking.

use crate::domain::SuggestionItem;
use serde::{Deserialize, Serialize};

/// One job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,

    pub job_title: String,

    pub employer_name: String,

    #[serde(default)]
    pub job_location: Option<String>,

    /// Employment type value, e.g. `remote`.
    #[serde(default)]
    pub job_employment_type_text: Option<String>,

    /// Unix timestamp of the posting, used to break ranking ties.
    #[serde(default)]
    pub posted_at: Option<i64>,
}

impl JobRecord {
    pub fn new(id: impl Into<String>, job_title: impl Into<String>, employer_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            job_title: job_title.into(),
            employer_name: employer_name.into(),
            job_location: None,
            job_employment_type_text: None,
            posted_at: None,
        }
    }

    /// Text the fuzzy matcher scores against.
    #[must_use]
    pub fn haystack(&self) -> String {
        format!("{} {}", self.job_title, self.employer_name).to_lowercase()
    }
}

impl From<&JobRecord> for SuggestionItem {
    fn from(record: &JobRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.job_title.clone(),
            organization: record.employer_name.clone(),
            location: record.job_location.clone(),
            employment_type: record.job_employment_type_text.clone(),
        }
    }
}
