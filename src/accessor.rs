//! Safe nested field access
//!
//! `deep_get` walks a key path through nested mappings and yields `None` as
//! soon as a key is missing or an intermediate value is not a mapping. Every
//! enrichment view goes through this one traversal.

use crate::event::{Event, EventValue, Fields};

/// Anything that can be indexed by a string key.
pub trait FieldLookup {
    fn lookup(&self, key: &str) -> Option<&EventValue>;
}

impl FieldLookup for EventValue {
    fn lookup(&self, key: &str) -> Option<&EventValue> {
        self.get(key)
    }
}

impl FieldLookup for Fields {
    fn lookup(&self, key: &str) -> Option<&EventValue> {
        self.get(key)
    }
}

impl FieldLookup for Event {
    fn lookup(&self, key: &str) -> Option<&EventValue> {
        self.get_field(key)
    }
}

/// Traverse `root` by each key of `path` in order.
///
/// Returns the final value unchanged, or `None` on the first missing key or
/// non-mapping intermediate. An empty path yields `None`.
pub fn deep_get<'a, R>(root: &'a R, path: &[&str]) -> Option<&'a EventValue>
where
    R: FieldLookup + ?Sized,
{
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(root.lookup(first)?, |current, key| current.lookup(key))
}

/// Like [`deep_get`], with a caller-supplied default for failed traversals.
pub fn deep_get_or<'a, R>(root: &'a R, path: &[&str], default: &'a EventValue) -> &'a EventValue
where
    R: FieldLookup + ?Sized,
{
    deep_get(root, path).unwrap_or(default)
}

impl Event {
    /// Nested lookup starting at the event's top-level fields.
    pub fn deep_get(&self, path: &[&str]) -> Option<&EventValue> {
        deep_get(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Event {
        Event::from_json_value(json!({
            "t": 10,
            "a": [{"b": 1, "c": 2}],
            "d": {"e": {"f": true, "g": null, "h": ""}}
        }))
        .expect("Failed to build sample event")
    }

    #[test]
    fn test_full_path_returns_leaf_unchanged() {
        let event = sample();
        assert_eq!(event.deep_get(&["d", "e", "f"]), Some(&EventValue::Bool(true)));
        assert_eq!(event.deep_get(&["d", "e", "h"]), Some(&EventValue::from("")));
        assert_eq!(event.deep_get(&["d", "e", "g"]), Some(&EventValue::Null));
        assert_eq!(event.deep_get(&["t"]), Some(&EventValue::from(10)));
    }

    #[test]
    fn test_partial_path_returns_subtree() {
        let event = sample();
        let subtree = event.deep_get(&["d", "e"]).expect("subtree should exist");
        assert_eq!(subtree.get("f"), Some(&EventValue::Bool(true)));
    }

    #[test]
    fn test_missing_key_at_any_depth() {
        let event = sample();
        assert!(event.deep_get(&["x"]).is_none());
        assert!(event.deep_get(&["x", "e", "f"]).is_none());
        assert!(event.deep_get(&["d", "x", "f"]).is_none());
        assert!(event.deep_get(&["d", "e", "x"]).is_none());
    }

    #[test]
    fn test_non_mapping_intermediate() {
        let event = sample();
        // scalar, sequence and null are not traversable
        assert!(event.deep_get(&["t", "anything"]).is_none());
        assert!(event.deep_get(&["a", "b"]).is_none());
        assert!(event.deep_get(&["a", "0"]).is_none());
        assert!(event.deep_get(&["d", "e", "g", "deeper"]).is_none());
    }

    #[test]
    fn test_empty_path() {
        let event = sample();
        assert!(event.deep_get(&[]).is_none());
    }

    #[test]
    fn test_value_and_fields_roots() {
        let event = sample();
        let root = event.get_field("d").expect("d should exist");
        assert_eq!(deep_get(root, &["e", "f"]), Some(&EventValue::Bool(true)));
        assert_eq!(deep_get(event.fields(), &["d", "e", "f"]), Some(&EventValue::Bool(true)));
        assert!(deep_get(&EventValue::from("text"), &["e"]).is_none());
    }

    #[test]
    fn test_deep_get_or_default() {
        let event = sample();
        let fallback = EventValue::from("<MISSING>");
        assert_eq!(deep_get_or(&event, &["d", "x"], &fallback), &fallback);
        assert_eq!(
            deep_get_or(&event, &["d", "e", "f"], &fallback),
            &EventValue::Bool(true)
        );
    }
}
