//! Suggestion items shown in the search dropdown.

use serde::{Deserialize, Serialize};

/// One lookup match, as displayed in the suggestion dropdown.
///
/// Suggestions are transient: a successful lookup replaces the whole list, and the
/// list is cleared whenever the query becomes too short or a newer request supersedes
/// the one that produced it.
///
/// The serialized field names follow the job records returned by the lookup service
/// (`job_title`, `employer_name`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub id: String,
    #[serde(rename = "job_title")]
    pub title: String,
    #[serde(rename = "employer_name")]
    pub organization: String,
    #[serde(rename = "job_location", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        rename = "job_employment_type_text",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub employment_type: Option<String>,
}

impl SuggestionItem {
    /// Creates a suggestion with only the required fields set.
    ///
    /// # Examples
    ///
    /// ```
    /// use jobseek::SuggestionItem;
    ///
    /// let item = SuggestionItem::new("42", "Rust Engineer", "Acme")
    ///     .with_location("Shimla")
    ///     .with_employment_type("remote");
    /// assert_eq!(item.location.as_deref(), Some("Shimla"));
    /// ```
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            organization: organization.into(),
            location: None,
            employment_type: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_employment_type(mut self, employment_type: impl Into<String>) -> Self {
        self.employment_type = Some(employment_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_service_field_names() {
        let json = r#"{
            "id": "7",
            "job_title": "Backend Engineer",
            "employer_name": "Hill Labs",
            "job_location": "Dehradun"
        }"#;

        let item: SuggestionItem = serde_json::from_str(json).unwrap();

        assert_eq!(
            item,
            SuggestionItem::new("7", "Backend Engineer", "Hill Labs").with_location("Dehradun")
        );
    }

    #[test]
    fn omits_absent_optional_fields() {
        let item = SuggestionItem::new("1", "Engineer", "Acme");
        let json = serde_json::to_string(&item).unwrap();

        assert!(!json.contains("job_location"));
        assert!(!json.contains("job_employment_type_text"));
    }
}
