//! Bidirectional mapping between facet selections and the navigable address.
//!
//! Every function here is pure: it takes an address and returns a new one. Keys the
//! codec is not asked about are never touched, which keeps unknown keys (future
//! facets, tracking parameters, the free-text query) intact across every operation.

use super::groups::FacetGroup;
use crate::domain::error::Result;
use crate::domain::NavigableAddress;
use std::collections::{BTreeMap, BTreeSet};

/// Selected values of one facet group. Ordered so encoding is stable.
pub type ValueSet = BTreeSet<String>;

/// Selected values per facet group key.
pub type FacetSelection = BTreeMap<String, ValueSet>;

/// Returns `address` with `(group, value)` selected or deselected.
///
/// Every existing `(group, value)` pair is removed; when `next_selected` is `true` the
/// pair is then appended once at the end. All other pairs keep their relative order.
/// Applying the same toggle twice yields the same address as applying it once.
///
/// ```
/// use jobseek::facets::codec::encode_toggle;
/// use jobseek::NavigableAddress;
///
/// let address = NavigableAddress::parse("job_employment_type_text=remote");
/// let next = encode_toggle(&address, "location", "shimla", true);
/// assert_eq!(next.to_string(), "job_employment_type_text=remote&location=shimla");
/// ```
#[must_use]
pub fn encode_toggle(
    address: &NavigableAddress,
    group: &str,
    value: &str,
    next_selected: bool,
) -> NavigableAddress {
    let mut next = address.clone();
    next.retain(|k, v| !(k == group && v == value));
    if next_selected {
        next.append(group, value);
    }
    next
}

/// Returns every value stored under `group`, duplicates collapsed.
#[must_use]
pub fn decode_group(address: &NavigableAddress, group: &str) -> ValueSet {
    address.get_all(group).map(ToString::to_string).collect()
}

/// Decodes `group` and validates every value against the group's encoding.
///
/// # Errors
///
/// Returns [`crate::JobseekError::MalformedAddress`] for the first value the group
/// cannot interpret.
pub fn decode_validated(address: &NavigableAddress, group: &FacetGroup) -> Result<ValueSet> {
    let values = decode_group(address, &group.key);
    for value in &values {
        group.validate(value)?;
    }
    Ok(values)
}

/// Returns `address` without the values of `group` the group cannot interpret.
///
/// Valid values and every other key keep their relative order.
///
/// ```
/// use jobseek::facets::codec::strip_invalid;
/// use jobseek::facets::FacetGroup;
/// use jobseek::NavigableAddress;
///
/// let group = FacetGroup::range("salary_band", "Salary", &[]);
/// let address = NavigableAddress::parse("salary_band=lots&q=qa&salary_band=3-6");
/// assert_eq!(strip_invalid(&address, &group).to_string(), "q=qa&salary_band=3-6");
/// ```
#[must_use]
pub fn strip_invalid(address: &NavigableAddress, group: &FacetGroup) -> NavigableAddress {
    let mut next = address.clone();
    next.retain(|k, v| k != group.key || group.validate(v).is_ok());
    next
}

/// Returns `address` with every pair of the given facet groups removed.
///
/// ```
/// use jobseek::facets::codec::clear_all;
/// use jobseek::NavigableAddress;
///
/// let address = NavigableAddress::parse("q=rust&location=shimla&utm=mail&salary_band=3-6");
/// let cleared = clear_all(&address, ["location", "salary_band"]);
/// assert_eq!(cleared.to_string(), "q=rust&utm=mail");
/// ```
#[must_use]
pub fn clear_all<'a>(
    address: &NavigableAddress,
    groups: impl IntoIterator<Item = &'a str>,
) -> NavigableAddress {
    let groups: BTreeSet<&str> = groups.into_iter().collect();
    let mut next = address.clone();
    next.retain(|k, _| !groups.contains(k));
    next
}
