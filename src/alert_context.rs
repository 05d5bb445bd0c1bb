//! Alert context builders for specific log sources

use serde_json::{json, Value};

use crate::event::Event;

/// Alert context for an AWS GuardDuty finding.
///
/// Missing scalar fields are replaced with a `<MISSING ...>` marker and missing
/// `resource`/`service` with `{}`. Fields present with a null value are kept
/// as null.
pub fn guardduty_context(event: &Event) -> Value {
    let field_or = |name: &str, fallback: Value| {
        event.get_field(name).map_or(fallback, Value::from)
    };

    json!({
        "description": field_or("description", json!("<MISSING DESCRIPTION>")),
        "severity": field_or("severity", json!("<MISSING SEVERITY>")),
        "id": field_or("id", json!("<MISSING ID>")),
        "type": field_or("type", json!("<MISSING TYPE>")),
        "resource": field_or("resource", json!({})),
        "service": field_or("service", json!({})),
    })
}
