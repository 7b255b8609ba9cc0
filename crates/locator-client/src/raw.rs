//! Helpers for reading untyped JSON values arriving from the RPC boundary.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Names the JSON kind of `value` for shape errors.
pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parses a serialized payload.
pub(crate) fn parse_text(text: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(text).map_err(DecodeError::parse)
}

/// Returns the mapping behind `raw`, parsing it first when it arrives as text.
///
/// `expected` names the structure the caller wanted and ends up in the
/// [`DecodeError::Shape`] raised for anything that is not a mapping.
pub(crate) fn structured<'a>(
    raw: &'a Value,
    expected: &str,
) -> Result<Cow<'a, Map<String, Value>>, DecodeError> {
    match raw {
        Value::Object(map) => Ok(Cow::Borrowed(map)),
        Value::String(text) => match parse_text(text)? {
            Value::Object(map) => Ok(Cow::Owned(map)),
            other => Err(DecodeError::shape(expected, kind_of(&other))),
        },
        other => Err(DecodeError::shape(expected, kind_of(other))),
    }
}

/// Deserializes a flat record from a mapping or its JSON text.
///
/// Anything that is not a mapping is reported with its JSON kind; a mapping
/// whose fields do not fit `T` is reported with serde's description.
pub(crate) fn record<T: DeserializeOwned>(raw: &Value, expected: &str) -> Result<T, DecodeError> {
    let parsed;
    let mapping = match raw {
        Value::String(text) => {
            parsed = parse_text(text)?;
            &parsed
        }
        other => other,
    };
    if !mapping.is_object() {
        return Err(DecodeError::shape(expected, kind_of(mapping)));
    }
    T::deserialize(mapping).map_err(|err| DecodeError::shape(expected, err.to_string()))
}

/// Reads a field by name. Absent and `null` are both reported as `None`.
pub(crate) fn field<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    map.get(name).filter(|value| !value.is_null())
}

/// Reads an optional string field, such as an envelope's `message`.
pub(crate) fn string_field(
    map: &Map<String, Value>,
    name: &str,
) -> Result<Option<String>, DecodeError> {
    match field(map, name) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(DecodeError::shape(
            format!("string field `{name}`"),
            kind_of(other),
        )),
    }
}
