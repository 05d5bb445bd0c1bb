//! Detail payload normalization
//!
//! Vendor detail fields (Box `additional_details`, for instance) arrive as a
//! mapping, a sequence, a JSON-encoded string, plain prose or raw bytes
//! depending on the source. `normalize_payload` always hands back a mapping or
//! a sequence so rules can index into the result without checking its shape.
//!
//! Dispatch, in order:
//!
//! | shape    | result                                   |
//! |----------|------------------------------------------|
//! | absent   | empty mapping                            |
//! | mapping  | the mapping, borrowed                    |
//! | sequence | the sequence, borrowed                   |
//! | bytes    | empty mapping, never decoded             |
//! | text     | decoded mapping/sequence, else empty     |
//! | other    | empty mapping                            |

use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

use crate::event::{Event, EventValue, Fields};

/// Field carrying free-form details on Box audit events
pub const ADDITIONAL_DETAILS_FIELD: &str = "additional_details";

/// Runtime shape of a detail field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Absent,
    Mapping,
    Sequence,
    Bytes,
    Text,
    Other,
}

impl PayloadShape {
    pub fn of(value: Option<&EventValue>) -> Self {
        match value {
            None => Self::Absent,
            Some(EventValue::Map(_)) => Self::Mapping,
            Some(EventValue::List(_)) => Self::Sequence,
            Some(EventValue::Bytes(_)) => Self::Bytes,
            Some(EventValue::Text(_)) => Self::Text,
            Some(EventValue::Null | EventValue::Bool(_) | EventValue::Number(_)) => Self::Other,
        }
    }
}

/// Normalized detail payload: always a mapping or a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedPayload<'a> {
    Mapping(Cow<'a, Fields>),
    Sequence(Cow<'a, [EventValue]>),
}

impl<'a> NormalizedPayload<'a> {
    pub fn empty() -> Self {
        Self::Mapping(Cow::Owned(Fields::new()))
    }

    /// Mapping-style lookup; sequences have no keys.
    pub fn get(&self, key: &str) -> Option<&EventValue> {
        match self {
            Self::Mapping(fields) => fields.get(key),
            Self::Sequence(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Self::Mapping(fields) => Some(fields.as_ref()),
            Self::Sequence(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[EventValue]> {
        match self {
            Self::Mapping(_) => None,
            Self::Sequence(items) => Some(items.as_ref()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Mapping(fields) => fields.len(),
            Self::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(
            self,
            Self::Mapping(Cow::Borrowed(_)) | Self::Sequence(Cow::Borrowed(_))
        )
    }

    pub fn into_owned(self) -> NormalizedPayload<'static> {
        match self {
            Self::Mapping(fields) => NormalizedPayload::Mapping(Cow::Owned(fields.into_owned())),
            Self::Sequence(items) => NormalizedPayload::Sequence(Cow::Owned(items.into_owned())),
        }
    }

    pub fn to_json_value(&self) -> Value {
        match self {
            Self::Mapping(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect(),
            ),
            Self::Sequence(items) => Value::Array(items.iter().map(Value::from).collect()),
        }
    }
}

/// Normalize the detail payload stored under `field`.
pub fn normalize_payload<'a>(event: &'a Event, field: &str) -> NormalizedPayload<'a> {
    normalize_value(event.get_field(field))
}

/// Normalize Box `additional_details`.
pub fn parse_additional_details(event: &Event) -> NormalizedPayload<'_> {
    normalize_payload(event, ADDITIONAL_DETAILS_FIELD)
}

/// Normalize a value whose shape is not known in advance.
pub fn normalize_value(value: Option<&EventValue>) -> NormalizedPayload<'_> {
    match value {
        Some(EventValue::Map(fields)) => NormalizedPayload::Mapping(Cow::Borrowed(fields)),
        Some(EventValue::List(items)) => {
            NormalizedPayload::Sequence(Cow::Borrowed(items.as_slice()))
        }
        Some(EventValue::Text(text)) => decode_text(text),
        // byte payloads are not guaranteed to be JSON and are never decoded
        Some(EventValue::Bytes(_))
        | Some(EventValue::Null | EventValue::Bool(_) | EventValue::Number(_))
        | None => {
            debug!(
                shape = ?PayloadShape::of(value),
                "Detail payload is not structured, using empty mapping"
            );
            NormalizedPayload::empty()
        }
    }
}

fn decode_text(text: &str) -> NormalizedPayload<'static> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => NormalizedPayload::Mapping(Cow::Owned(
            map.into_iter()
                .map(|(key, value)| (key, EventValue::from(value)))
                .collect(),
        )),
        Ok(Value::Array(items)) => NormalizedPayload::Sequence(Cow::Owned(
            items.into_iter().map(EventValue::from).collect(),
        )),
        Ok(_) => {
            debug!("Detail payload text decoded to a scalar, using empty mapping");
            NormalizedPayload::empty()
        }
        Err(e) => {
            debug!(error = %e, "Detail payload text is not JSON, using empty mapping");
            NormalizedPayload::empty()
        }
    }
}
