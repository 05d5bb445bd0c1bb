//! Event and EventValue definitions
//!
//! Events arrive from the log pipeline as loosely-typed mappings. `EventValue`
//! is the tagged value model every helper in this crate reads from: the JSON
//! shapes plus raw byte payloads, which some sources attach without decoding.
//!
//! Events are read-only to this crate. Helpers borrow from an `Event` and
//! never mutate it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Field map used for events, nested mappings and enrichment records.
pub type Fields = HashMap<String, EventValue>;

/// A single value inside an event.
///
/// Deserializing from JSON never produces `Bytes`; hosts that receive binary
/// fields construct that variant directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<EventValue>),
    Map(Fields),
}

impl EventValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Self::Map(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[EventValue]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Look up `key` if this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&EventValue> {
        self.as_map().and_then(|fields| fields.get(key))
    }

    /// Convert to a `serde_json::Value`. Byte payloads become arrays of
    /// integers, matching the serialized form.
    pub fn to_json_value(&self) -> Value {
        Value::from(self)
    }
}

impl<'de> Deserialize<'de> for EventValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(EventValue::from)
    }
}

impl From<Value> for EventValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&EventValue> for Value {
    fn from(value: &EventValue) -> Self {
        match value {
            EventValue::Null => Value::Null,
            EventValue::Bool(flag) => Value::Bool(*flag),
            EventValue::Number(number) => Value::Number(number.clone()),
            EventValue::Text(text) => Value::String(text.clone()),
            EventValue::Bytes(bytes) => {
                Value::Array(bytes.iter().map(|byte| Value::from(*byte)).collect())
            }
            EventValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            EventValue::Map(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for EventValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for EventValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for EventValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i32> for EventValue {
    fn from(number: i32) -> Self {
        Self::Number(number.into())
    }
}

impl From<i64> for EventValue {
    fn from(number: i64) -> Self {
        Self::Number(number.into())
    }
}

impl From<Vec<u8>> for EventValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Fields> for EventValue {
    fn from(fields: Fields) -> Self {
        Self::Map(fields)
    }
}

/// A security event as handed to detection rules.
///
/// Wraps the top-level field map; `p_enrichment` and vendor-specific detail
/// fields live alongside the regular fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    fields: Fields,
}

impl Event {
    /// Create a new empty Event
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    /// Add a field, builder style
    pub fn add_field<K: Into<String>, V: Into<EventValue>>(
        &mut self,
        key: K,
        value: V,
    ) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Get a top-level field
    pub fn get_field(&self, key: &str) -> Option<&EventValue> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create from an already decoded JSON value; fails unless it is an object.
    pub fn from_json_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<Fields> for Event {
    fn from(fields: Fields) -> Self {
        Self::from_fields(fields)
    }
}
