//! Route parameter mapping.
//!
//! [`Params`] is the single mapping handed to filters and handlers. It merges
//! query-string entries with named and splat captures, and it is also the
//! input of reverse URL building.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// A flat, string-keyed parameter mapping.
///
/// Values are `Option<String>`: `Some` is a string value, `None` is the
/// "undefined" value produced by a query item without `=`. Keys iterate in
/// sorted order.
///
/// # Example
///
/// ```rust
/// use switchyard_core::{Params, params};
///
/// let params = params! { "type" => "name", "q" => "Joe" };
/// assert_eq!(params.get("type"), Some("name"));
/// assert!(params.contains_key("q"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, Option<String>>);

impl Params {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the string value for `key`, if present and defined.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    /// Returns the raw entry for `key`: `Some(None)` for an undefined value.
    pub fn get_raw(&self, key: &str) -> Option<&Option<String>> {
        self.0.get(key)
    }

    /// Whether `key` is present, defined or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a string value, returning the previous entry.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<Option<String>> {
        self.0.insert(key.into(), Some(value.into()))
    }

    /// Insert an undefined value for `key`.
    pub fn insert_undefined(&mut self, key: impl Into<String>) -> Option<Option<String>> {
        self.0.insert(key.into(), None)
    }

    /// Insert a raw entry.
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) -> Option<Option<String>> {
        self.0.insert(key.into(), value)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove `key`, returning its entry.
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        self.0.remove(key)
    }

    /// Copy every entry of `other` over this mapping; `other` wins on collision.
    pub fn merge(&mut self, other: Params) {
        self.0.extend(other.0);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over the raw entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Option<String>> {
        self.0.iter()
    }
}

impl IntoIterator for Params {
    type Item = (String, Option<String>);
    type IntoIter = btree_map::IntoIter<String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Option<String>);
    type IntoIter = btree_map::Iter<'a, String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Build a [`Params`] mapping from `key => value` pairs.
///
/// ```rust
/// use switchyard_core::params;
///
/// let empty = params! {};
/// assert!(empty.is_empty());
///
/// let params = params! { "id" => "42" };
/// assert_eq!(params.get("id"), Some("42"));
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(
            params.insert($key, $value);
        )+
        params
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_is_present_but_has_no_value() {
        let mut params = Params::new();
        params.insert_undefined("flag");

        assert!(params.contains_key("flag"));
        assert_eq!(params.get("flag"), None);
        assert_eq!(params.get_raw("flag"), Some(&None));
    }

    #[test]
    fn test_merge_overrides_existing_keys() {
        let mut params = params! { "type" => "query", "q" => "Joe" };
        params.merge(params! { "type" => "path" });

        assert_eq!(params.get("type"), Some("path"));
        assert_eq!(params.get("q"), Some("Joe"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_keys_are_sorted() {
        let params = Params::from([("b", "2"), ("a", "1"), ("c", "3")]);
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}
