//! Case-insensitive, order-preserving header map.
//!
//! Header names are compared case-insensitively (`Content-Type` and
//! `content-type` address the same entry) while the first spelling seen is
//! kept for display. Distinct names keep their insertion order.

use std::fmt;
use std::ops::Index;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use indexmap::IndexMap;

use crate::error::{DriverError, DriverResult};

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

/// Ordered multi-map of HTTP headers with case-insensitive lookup.
///
/// # Example
///
/// ```
/// use courier_core::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Content-Type", "application/json");
///
/// assert_eq!(headers.get("content-type"), Some("application/json"));
/// assert_eq!(&headers["CONTENT-TYPE"], "application/json");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: IndexMap<String, HeaderEntry>,
}

impl Headers {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing every existing value for the same name.
    ///
    /// The original spelling of an existing name is kept.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.get_mut(&normalize(&name)) {
            Some(entry) => entry.values = vec![value],
            None => {
                self.entries.insert(
                    normalize(&name),
                    HeaderEntry {
                        name,
                        values: vec![value],
                    },
                );
            }
        }
    }

    /// Adds a value for a header, keeping any existing values.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries
            .entry(normalize(&name))
            .or_insert_with(|| HeaderEntry {
                name,
                values: Vec::new(),
            })
            .values
            .push(value.into());
    }

    /// Returns the first value of a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&normalize(name))
            .and_then(|entry| entry.values.first())
            .map(String::as_str)
    }

    /// Returns every value of a header, in the order received.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .get(&normalize(name))
            .map_or(&[] as &[String], |entry| entry.values.as_slice())
    }

    /// Returns true if the header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize(name))
    }

    /// Removes a header, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries
            .shift_remove(&normalize(name))
            .map(|entry| entry.values)
    }

    /// Number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over distinct header names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|entry| entry.name.as_str())
    }

    /// Iterates over `(name, value)` pairs, one per value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.values().flat_map(|entry| {
            entry
                .values
                .iter()
                .map(move |value| (entry.name.as_str(), value.as_str()))
        })
    }

    /// Merges `other` into `self`; names present in `other` replace ours.
    pub fn merge(&mut self, other: &Headers) {
        for entry in other.entries.values() {
            self.remove(&entry.name);
            for value in &entry.values {
                self.append(entry.name.clone(), value.clone());
            }
        }
    }

    /// Builds a map from an `http` header map, decoding values lossily.
    #[must_use]
    pub fn from_http(map: &HeaderMap) -> Self {
        let mut headers = Self::new();
        for (name, value) in map {
            headers.append(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        headers
    }

    /// Converts into an `http` header map.
    ///
    /// Fails with [`DriverError::InvalidRequest`] if a name or value is not
    /// valid on the wire.
    pub fn to_http(&self) -> DriverResult<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in self.iter() {
            let header_name = HeaderName::try_from(name)
                .map_err(|e| DriverError::invalid_request(format!("header name {name:?}: {e}")))?;
            let header_value = HeaderValue::try_from(value).map_err(|e| {
                DriverError::invalid_request(format!("value for header {name:?}: {e}"))
            })?;
            map.append(header_name, header_value);
        }
        Ok(map)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

impl Index<&str> for Headers {
    type Output = str;

    /// Returns the first value of a header.
    ///
    /// # Panics
    ///
    /// Panics if the header is not present.
    fn index(&self, name: &str) -> &str {
        self.get(name)
            .unwrap_or_else(|| panic!("header {name:?} not present"))
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        headers.extend(iter);
        headers
    }
}

impl<K, V> Extend<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "application/json");

        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(&headers["Content-Type"], "application/json");
        assert!(headers.contains("content-TYPE"));
    }

    #[test]
    fn test_insert_replaces_and_keeps_spelling() {
        let mut headers = Headers::new();
        headers.insert("X-Token", "one");
        headers.insert("x-token", "two");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-Token"), Some("two"));
        assert_eq!(headers.names().collect::<Vec<_>>(), vec!["X-Token"]);
    }

    #[test]
    fn test_append_keeps_all_values() {
        let mut headers = Headers::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("set-cookie", "b=2");

        assert_eq!(headers.get("Set-Cookie"), Some("a=1"));
        assert_eq!(headers.get_all("SET-COOKIE"), ["a=1", "b=2"]);
        assert_eq!(headers.iter().count(), 2);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let headers: Headers = [("B", "2"), ("A", "1"), ("C", "3")].into_iter().collect();
        assert_eq!(headers.names().collect::<Vec<_>>(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_merge_overrides_case_insensitively() {
        let mut defaults: Headers = [("Accept", "application/json"), ("X-Trace", "1")]
            .into_iter()
            .collect();
        let overrides: Headers = [("accept", "text/plain")].into_iter().collect();

        defaults.merge(&overrides);

        assert_eq!(defaults.get("Accept"), Some("text/plain"));
        assert_eq!(defaults.get_all("accept").len(), 1);
        assert_eq!(defaults.get("X-Trace"), Some("1"));
    }

    #[test]
    fn test_remove() {
        let mut headers: Headers = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(headers.remove("a"), Some(vec!["1".to_string()]));
        assert!(!headers.contains("A"));
        assert_eq!(headers.remove("missing"), None);
    }

    #[test]
    fn test_http_round_trip() {
        let headers: Headers = [("X-Custom-Header", "custom header")].into_iter().collect();
        let map = headers.to_http().unwrap();
        assert_eq!(map.get("x-custom-header").unwrap(), "custom header");

        let back = Headers::from_http(&map);
        assert_eq!(back.get("X-Custom-Header"), Some("custom header"));
    }

    #[test]
    fn test_to_http_rejects_invalid_name() {
        let headers: Headers = [("Bad Header", "v")].into_iter().collect();
        let err = headers.to_http().unwrap_err();
        assert!(matches!(err, DriverError::InvalidRequest { .. }));
    }

    #[test]
    #[should_panic(expected = "not present")]
    fn test_index_missing_panics() {
        let headers = Headers::new();
        let _ = &headers["Missing"];
    }
}
