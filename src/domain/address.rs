//! Navigable address model: the ordered, multi-valued query string.
//!
//! The address is the single persisted source of truth for search and filter state.
//! It is an ordered sequence of `(key, value)` pairs where keys may repeat, exactly
//! like the query component of a URL. [`Location`] pairs an address with the route
//! path it belongs to.
//!
//! # Text form
//!
//! Addresses serialize to `application/x-www-form-urlencoded` text: pairs joined by
//! `&`, keys and values percent-encoded, spaces written as `+`. Parsing is lenient:
//! empty segments are skipped, a segment without `=` is a key with an empty value and
//! invalid UTF-8 is decoded lossily.
//!
//! ```
//! use jobseek::NavigableAddress;
//!
//! let address: NavigableAddress = "q=rust+dev&location=shimla&location=dehradun".parse().unwrap();
//! assert_eq!(address.get("q"), Some("rust dev"));
//! assert_eq!(address.get_all("location").collect::<Vec<_>>(), ["shimla", "dehradun"]);
//! assert_eq!(address.to_string(), "q=rust+dev&location=shimla&location=dehradun");
//! ```

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Bytes left unescaped by form encoding (besides alphanumerics).
const FORM_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Ordered multi-valued key/value state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigableAddress {
    pairs: Vec<(String, String)>,
}

impl NavigableAddress {
    /// Creates an empty address.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Parses form-encoded text, ignoring one leading `?`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('?').unwrap_or(text);
        text.split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
                (decode_component(key), decode_component(value))
            })
            .collect()
    }

    /// All pairs in order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `key`, in address order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.pairs.iter().any(|(k, v)| k == key && v == value)
    }

    /// Appends a pair at the end, keeping any existing pairs with the same key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Keeps only the pairs for which `keep` returns `true`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.pairs.retain(|(k, v)| keep(k, v));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NavigableAddress {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl fmt::Display for NavigableAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.pairs.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", encode_component(key), encode_component(value))?;
        }
        Ok(())
    }
}

impl FromStr for NavigableAddress {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, FORM_COMPONENT)
        .to_string()
        .replace("%20", "+")
}

fn decode_component(encoded: &str) -> String {
    let spaced = encoded.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// A route path together with its navigable address.
///
/// ```
/// use jobseek::Location;
///
/// let location: Location = "/search?q=engineer&location=shimla".parse().unwrap();
/// assert_eq!(location.path, "/search");
/// assert_eq!(location.address.get("location"), Some("shimla"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    pub address: NavigableAddress,
}

impl Location {
    #[must_use]
    pub fn new(path: impl Into<String>, address: NavigableAddress) -> Self {
        Self {
            path: path.into(),
            address,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.address.is_empty() {
            write!(f, "?{}", self.address)?;
        }
        Ok(())
    }
}

impl FromStr for Location {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let without_fragment = s.split_once('#').map_or(s, |(head, _)| head);
        let (path, query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));
        Ok(Self::new(path, NavigableAddress::parse(query)))
    }
}
