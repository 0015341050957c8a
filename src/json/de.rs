//! Parse-side JSON combinators.
//!
//! Field lookup tries the camelCase `jsonName` first and falls back to the
//! proto name, so both serializer configurations parse. Unknown keys are
//! ignored. A JSON `null` reads as the field's default, per the canonical
//! mapping.

use serde_json::{Map, Value as Json};

use crate::error::DecodeError;
use crate::scalar::Scalar;

/// Looks a field up by its JSON name, then by its proto name.
pub fn get<'a>(
    obj: &'a Map<String, Json>,
    name: &str,
    json_name: &str,
) -> Option<&'a Json> {
    obj.get(json_name).or_else(|| obj.get(name))
}

/// A singular field: missing or null yields the default.
pub fn parse<S: Scalar>(
    obj: &Map<String, Json>,
    name: &'static str,
    json_name: &'static str,
) -> Result<S::Value, DecodeError> {
    match get(obj, name, json_name) {
        None | Some(Json::Null) => Ok(S::default_value()),
        Some(value) => S::from_json(value),
    }
}

/// An optional field: missing or null yields `None`.
pub fn parse_optional<S: Scalar>(
    obj: &Map<String, Json>,
    name: &'static str,
    json_name: &'static str,
) -> Result<Option<S::Value>, DecodeError> {
    match get(obj, name, json_name) {
        None | Some(Json::Null) => Ok(None),
        Some(value) => S::from_json(value).map(Some),
    }
}

/// A proto2 required field: must be present and non-null.
pub fn parse_required<S: Scalar>(
    obj: &Map<String, Json>,
    name: &'static str,
    json_name: &'static str,
    tag: u32,
) -> Result<S::Value, DecodeError> {
    match get(obj, name, json_name) {
        None | Some(Json::Null) => Err(crate::error::DecodeErrorKind::RequiredFieldMissing {
            tag,
            name,
        }
        .into()),
        Some(value) => S::from_json(value),
    }
}

/// A repeated field: a JSON array, with missing or null reading as empty.
pub fn parse_repeated<S: Scalar>(
    obj: &Map<String, Json>,
    name: &'static str,
    json_name: &'static str,
) -> Result<Vec<S::Value>, DecodeError> {
    match get(obj, name, json_name) {
        None | Some(Json::Null) => Ok(Vec::new()),
        Some(Json::Array(items)) => items.iter().map(S::from_json).collect(),
        Some(_) => Err(DecodeError::illegal_value("expected a JSON array")),
    }
}

/// A map field: a JSON object whose keys parse through the key scalar's
/// string form.
pub fn parse_map<K: Scalar, V: Scalar>(
    obj: &Map<String, Json>,
    name: &'static str,
    json_name: &'static str,
) -> Result<Vec<(K::Value, V::Value)>, DecodeError> {
    match get(obj, name, json_name) {
        None | Some(Json::Null) => Ok(Vec::new()),
        Some(Json::Object(map)) => map
            .iter()
            .map(|(k, v)| {
                let key = K::from_json(&Json::String(k.clone()))?;
                let value = V::from_json(v)?;
                Ok((key, value))
            })
            .collect(),
        Some(_) => Err(DecodeError::illegal_value("expected a JSON object")),
    }
}
