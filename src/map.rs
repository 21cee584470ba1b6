//! Ordered map type for building JSON objects.
//!
//! [`JsonMap`] wraps [`IndexMap`] so objects built through it keep their
//! insertion order. The encoder emits entries in exactly the order the
//! source yields them, so the map must not reorder behind the caller's back.
//! Unlike raw [`JsonValue::Object`](crate::JsonValue::Object) entries, a
//! `JsonMap` also deduplicates keys on insert, which is what callers almost
//! always want when assembling an object by hand.
//!
//! ## Examples
//!
//! ```rust
//! use async_json::{JsonMap, JsonValue};
//!
//! let mut map = JsonMap::new();
//! map.insert("name".to_string(), JsonValue::from("Alice"));
//! map.insert("age".to_string(), JsonValue::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//!
//! let value = JsonValue::from(map);
//! assert!(value.is_object());
//! ```

use crate::value::JsonValue;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to values.
///
/// Converts into [`JsonValue::Object`](crate::JsonValue::Object) via `From`,
/// preserving entry order.
#[derive(Debug, Default, PartialEq)]
pub struct JsonMap(IndexMap<String, JsonValue>);

impl JsonMap {
    /// Creates an empty `JsonMap`.
    #[must_use]
    pub fn new() -> Self {
        JsonMap(IndexMap::new())
    }

    /// Creates an empty `JsonMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JsonMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the entry keeps its original position.
    pub fn insert(&mut self, key: String, value: JsonValue) -> Option<JsonValue> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, JsonValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, JsonValue> {
        self.0.values()
    }

    /// Returns an iterator over the entries of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, JsonValue> {
        self.0.iter()
    }
}

impl From<HashMap<String, JsonValue>> for JsonMap {
    fn from(map: HashMap<String, JsonValue>) -> Self {
        JsonMap(map.into_iter().collect())
    }
}

impl IntoIterator for JsonMap {
    type Item = (String, JsonValue);
    type IntoIter = indexmap::map::IntoIter<String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, JsonValue)> for JsonMap {
    fn from_iter<T: IntoIterator<Item = (String, JsonValue)>>(iter: T) -> Self {
        JsonMap(IndexMap::from_iter(iter))
    }
}

impl Extend<(String, JsonValue)> for JsonMap {
    fn extend<T: IntoIterator<Item = (String, JsonValue)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut map = JsonMap::new();
        map.insert("z".to_string(), JsonValue::from(1));
        map.insert("a".to_string(), JsonValue::from(2));
        map.insert("m".to_string(), JsonValue::from(3));

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map = JsonMap::new();
        assert!(map.insert("key".to_string(), JsonValue::from(42)).is_none());
        assert!(map.insert("key".to_string(), JsonValue::from(43)).is_some());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key").and_then(|v| v.as_i64()), Some(43));
    }

    #[test]
    fn converts_to_object_entries() {
        let mut map = JsonMap::new();
        map.insert("first".to_string(), JsonValue::from(1));
        map.insert("second".to_string(), JsonValue::from(2));

        let value = JsonValue::from(map);
        let entries = value.as_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, JsonValue::from("first"));
        assert_eq!(entries[1].1, JsonValue::from(2));
    }
}
