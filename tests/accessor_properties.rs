//! Property tests for nested field access
//!
//! Any path that leaves the mapping structure, through a missing key or a
//! non-mapping value, yields None and never panics.

use proptest::prelude::*;
use serde_json::{json, Value};

use siem_enrichment::{deep_get, Event, EventValue};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
        prop::collection::vec(any::<i32>().prop_map(Value::from), 0..4).prop_map(Value::from),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop::collection::hash_map("[a-d]", inner, 0..4)
            .prop_map(|map| Value::Object(map.into_iter().collect()))
    })
}

/// Reference traversal over serde_json values.
fn expected<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.iter()
        .try_fold(root, |current, key| current.as_object()?.get(key))
}

proptest! {
    #[test]
    fn deep_get_matches_reference_traversal(
        root in tree(),
        path in prop::collection::vec("[a-e]", 0..6),
    ) {
        let value = EventValue::from(root.clone());
        let keys: Vec<&str> = path.iter().map(String::as_str).collect();

        let found = deep_get(&value, &keys).map(EventValue::to_json_value);
        prop_assert_eq!(found.as_ref(), expected(&root, &path));
    }

    #[test]
    fn deep_get_through_scalar_is_none(
        scalar in leaf(),
        key in "[a-z]{1,8}",
        rest in prop::collection::vec("[a-z]{1,8}", 0..4),
    ) {
        let event = Event::from_json_value(json!({ "field": scalar })).unwrap();
        let mut path = vec!["field", key.as_str()];
        path.extend(rest.iter().map(String::as_str));

        prop_assert!(event.deep_get(&path).is_none());
    }
}
