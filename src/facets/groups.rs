//! Facet group definitions and value validation.
//!
//! A facet group is a named, independently togglable filter dimension. Its key is the
//! address key the group's values are stored under, so a group with key `location`
//! owns every `location=...` pair of the address.

use crate::domain::error::{JobseekError, Result};
use serde::{Deserialize, Serialize};

/// Address key of the employment type facet.
pub const EMPLOYMENT_TYPE: &str = "job_employment_type_text";

/// Address key of the location facet.
pub const LOCATION: &str = "location";

/// Address key of the salary band facet.
pub const SALARY_BAND: &str = "salary_band";

/// How the values of a facet group are encoded in the address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    /// Any non-empty string.
    #[default]
    Text,

    /// A numeric band written as `<lo>-<hi>` (with `lo < hi`) or `<lo>+`.
    Range,
}

/// A tracked facet group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetGroup {
    /// Address key (for example `location`).
    pub key: String,

    /// Heading shown above the group's options.
    pub label: String,

    /// Values offered as options, in display order.
    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default)]
    pub kind: ValueKind,
}

impl FacetGroup {
    #[must_use]
    pub fn text(key: &str, label: &str, options: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            options: options.iter().map(ToString::to_string).collect(),
            kind: ValueKind::Text,
        }
    }

    #[must_use]
    pub fn range(key: &str, label: &str, options: &[&str]) -> Self {
        Self {
            kind: ValueKind::Range,
            ..Self::text(key, label, options)
        }
    }

    /// The groups tracked when no configuration overrides them.
    ///
    /// ```
    /// use jobseek::facets::FacetGroup;
    ///
    /// let keys: Vec<String> = FacetGroup::builtin().into_iter().map(|g| g.key).collect();
    /// assert_eq!(keys, ["job_employment_type_text", "location", "salary_band"]);
    /// ```
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::text(EMPLOYMENT_TYPE, "Job Type", &["onsite", "remote", "hybrid"]),
            Self::text(LOCATION, "Location", &["himachal", "dehradun", "shimla"]),
            Self::range(SALARY_BAND, "Salary (LPA)", &["0-3", "3-6", "6-10", "10+"]),
        ]
    }

    /// Checks that `value` is a valid encoding for this group.
    ///
    /// Text groups accept any non-empty value, including values that are not among
    /// the offered options.
    ///
    /// # Errors
    ///
    /// Returns [`JobseekError::MalformedAddress`] describing the rejected value.
    pub fn validate(&self, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(self.malformed(value, "empty value"));
        }

        match self.kind {
            ValueKind::Text => Ok(()),
            ValueKind::Range => {
                if parse_band(value).is_some() {
                    Ok(())
                } else {
                    Err(self.malformed(value, "expected `<lo>-<hi>` or `<lo>+`"))
                }
            }
        }
    }

    /// Display label for one option value: the value with its first letter upper-cased.
    #[must_use]
    pub fn option_label(value: &str) -> String {
        let mut chars = value.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    fn malformed(&self, value: &str, reason: &str) -> JobseekError {
        JobseekError::MalformedAddress {
            group: self.key.clone(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Parses a salary band into `(lo, Some(hi))` or `(lo, None)` for open bands.
fn parse_band(value: &str) -> Option<(u32, Option<u32>)> {
    if let Some(lo) = value.strip_suffix('+') {
        return lo.parse().ok().map(|lo| (lo, None));
    }

    let (lo, hi) = value.split_once('-')?;
    let lo: u32 = lo.parse().ok()?;
    let hi: u32 = hi.parse().ok()?;
    (lo < hi).then_some((lo, Some(hi)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary() -> FacetGroup {
        FacetGroup::range(SALARY_BAND, "Salary", &[])
    }

    #[test]
    fn range_group_accepts_bands() {
        assert!(salary().validate("3-6").is_ok());
        assert!(salary().validate("10+").is_ok());
    }

    #[test]
    fn range_group_rejects_other_encodings() {
        for value in ["six", "6-3", "3-", "-3", "3-6-9", "+", ""] {
            let err = salary().validate(value).unwrap_err();
            assert!(
                matches!(err, JobseekError::MalformedAddress { ref group, .. } if group == SALARY_BAND),
                "{value} should be malformed"
            );
        }
    }

    #[test]
    fn text_group_accepts_unknown_values() {
        let group = FacetGroup::text(LOCATION, "Location", &["shimla"]);
        assert!(group.validate("manali").is_ok());
        assert!(group.validate("  ").is_err());
    }

    #[test]
    fn option_label_capitalizes_first_letter() {
        assert_eq!(FacetGroup::option_label("onsite"), "Onsite");
        assert_eq!(FacetGroup::option_label("10+"), "10+");
        assert_eq!(FacetGroup::option_label(""), "");
    }
}
