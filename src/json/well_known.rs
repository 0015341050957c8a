//! Canonical JSON shapes for the `google.protobuf` well-known types.
//!
//! After a message serializes to its object form, [`into_json`] replaces the
//! object with the special shape when the qualified name matches; on parse,
//! [`from_json`] wraps the special shape back into the object form the
//! generated field parsers expect. Both directions work purely on the JSON
//! tree, so the hooks apply to any message carrying the right name.

use std::borrow::Cow;

use serde_json::{Map, Value as Json};

use crate::datetime;
use crate::error::DecodeError;
use crate::json::de;
use crate::scalar;

/// Seconds magnitude bound of a well-formed `Duration`: ±10,000 years.
const DURATION_MAX_SECONDS: i64 = 315_576_000_000;

/// Applies the well-known-type mapping for `name`, or wraps the object
/// unchanged.
pub fn into_json(name: &str, obj: Map<String, Json>) -> Json {
    match name {
        "google.protobuf.Duration" => duration_to_json(&obj),
        "google.protobuf.Timestamp" => timestamp_to_json(&obj),
        "google.protobuf.FieldMask" => field_mask_to_json(&obj),
        "google.protobuf.Value" => value_to_json(obj),
        "google.protobuf.Struct" => take(obj, "fields").unwrap_or_else(|| Json::Object(Map::new())),
        "google.protobuf.ListValue" => take(obj, "values").unwrap_or_else(|| Json::Array(Vec::new())),
        _ => {
            if let Some(default) = wrapper_default(name) {
                take(obj, "value").unwrap_or(default)
            } else {
                Json::Object(obj)
            }
        }
    }
}

/// Undoes the well-known-type mapping for `name`, yielding the object form
/// consumed by the generated field parsers.
pub fn from_json<'a>(name: &str, value: &'a Json) -> Result<Cow<'a, Map<String, Json>>, DecodeError> {
    let wrapped = match name {
        "google.protobuf.Duration" => duration_from_json(value)?,
        "google.protobuf.Timestamp" => timestamp_from_json(value)?,
        "google.protobuf.FieldMask" => field_mask_from_json(value)?,
        "google.protobuf.Value" => value_from_json(value),
        "google.protobuf.Struct" => match value {
            Json::Object(fields) => single("fields", Json::Object(fields.clone())),
            _ => return Err(DecodeError::illegal_value("Struct expects a JSON object")),
        },
        "google.protobuf.ListValue" => match value {
            Json::Array(values) => single("values", Json::Array(values.clone())),
            _ => return Err(DecodeError::illegal_value("ListValue expects a JSON array")),
        },
        _ => {
            if wrapper_default(name).is_some() {
                single("value", value.clone())
            } else {
                return match value {
                    Json::Object(obj) => Ok(Cow::Borrowed(obj)),
                    _ => Err(DecodeError::illegal_value("expected a JSON object")),
                };
            }
        }
    };
    Ok(Cow::Owned(wrapped))
}

fn take(mut obj: Map<String, Json>, key: &str) -> Option<Json> {
    obj.remove(key)
}

fn single(key: &str, value: Json) -> Map<String, Json> {
    let mut obj = Map::new();
    obj.insert(key.to_owned(), value);
    obj
}

fn wrapper_default(name: &str) -> Option<Json> {
    match name {
        "google.protobuf.DoubleValue" | "google.protobuf.FloatValue" => Some(Json::from(0)),
        "google.protobuf.Int32Value" | "google.protobuf.UInt32Value" => Some(Json::from(0)),
        "google.protobuf.Int64Value" | "google.protobuf.UInt64Value" => {
            Some(Json::String("0".to_owned()))
        }
        "google.protobuf.BoolValue" => Some(Json::Bool(false)),
        "google.protobuf.StringValue" | "google.protobuf.BytesValue" => {
            Some(Json::String(String::new()))
        }
        _ => None,
    }
}

// Duration: "<sec>[.<nanos>]s", both components sharing one sign. Nanos are
// printed in full nine digits when nonzero.

fn duration_to_json(obj: &Map<String, Json>) -> Json {
    let seconds = de::parse::<scalar::Int64>(obj, "seconds", "seconds").unwrap_or_default();
    let nanos = de::parse::<scalar::Int32>(obj, "nanos", "nanos").unwrap_or_default();
    let text = if nanos == 0 {
        format!("{}s", seconds)
    } else {
        let sign = if seconds < 0 || nanos < 0 { "-" } else { "" };
        format!(
            "{}{}.{:09}s",
            sign,
            seconds.unsigned_abs(),
            nanos.unsigned_abs()
        )
    };
    Json::String(text)
}

fn duration_from_json(value: &Json) -> Result<Map<String, Json>, DecodeError> {
    let Json::String(s) = value else {
        return Err(DecodeError::illegal_value("Duration expects a JSON string"));
    };
    let body = s
        .strip_suffix('s')
        .ok_or_else(|| DecodeError::illegal_value("Duration string must end in 's'"))?;
    let (negative, body) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body.strip_prefix('+').unwrap_or(body)),
    };

    let (sec_digits, nanos) = match body.split_once('.') {
        None => (body, 0u32),
        Some((sec, frac)) => {
            if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DecodeError::illegal_value("Duration fraction"));
            }
            let scale = 10u32.pow(9 - frac.len() as u32);
            let frac: u32 = frac
                .parse()
                .map_err(|_| DecodeError::illegal_value("Duration fraction"))?;
            (sec, frac * scale)
        }
    };
    if sec_digits.is_empty() || !sec_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::illegal_value("Duration seconds"));
    }
    let seconds: i64 = sec_digits
        .parse()
        .map_err(|_| DecodeError::illegal_value("Duration seconds out of range"))?;
    if seconds > DURATION_MAX_SECONDS {
        return Err(DecodeError::illegal_value("Duration seconds out of range"));
    }

    // Both components carry the string's sign, however the input was split.
    let (seconds, nanos) = if negative {
        (-seconds, -(nanos as i32))
    } else {
        (seconds, nanos as i32)
    };

    let mut obj = single("seconds", Json::String(seconds.to_string()));
    obj.insert("nanos".to_owned(), Json::from(nanos));
    Ok(obj)
}

// Timestamp: RFC 3339 UTC with up to nine fractional digits.

fn timestamp_to_json(obj: &Map<String, Json>) -> Json {
    let seconds = de::parse::<scalar::Int64>(obj, "seconds", "seconds").unwrap_or_default();
    let nanos = de::parse::<scalar::Int32>(obj, "nanos", "nanos").unwrap_or_default();
    Json::String(datetime::format_timestamp(seconds, nanos))
}

fn timestamp_from_json(value: &Json) -> Result<Map<String, Json>, DecodeError> {
    let Json::String(s) = value else {
        return Err(DecodeError::illegal_value("Timestamp expects a JSON string"));
    };
    let (seconds, nanos) = datetime::parse_timestamp(s)
        .ok_or_else(|| DecodeError::illegal_value("Timestamp is not valid RFC 3339"))?;
    let mut obj = single("seconds", Json::String(seconds.to_string()));
    obj.insert("nanos".to_owned(), Json::from(nanos));
    Ok(obj)
}

// FieldMask: comma-joined camelCase paths as one string.

fn field_mask_to_json(obj: &Map<String, Json>) -> Json {
    let paths = de::parse_repeated::<scalar::Str>(obj, "paths", "paths").unwrap_or_default();
    let joined = paths
        .iter()
        .map(|p| to_camel_case(p))
        .collect::<Vec<_>>()
        .join(",");
    Json::String(joined)
}

fn field_mask_from_json(value: &Json) -> Result<Map<String, Json>, DecodeError> {
    let Json::String(s) = value else {
        return Err(DecodeError::illegal_value("FieldMask expects a JSON string"));
    };
    let paths = s
        .split(',')
        .filter(|p| !p.is_empty())
        .map(|p| Json::String(to_snake_case(p)))
        .collect();
    Ok(single("paths", Json::Array(paths)))
}

// Value: the single active oneof variant, unwrapped.

fn value_to_json(mut obj: Map<String, Json>) -> Json {
    for key in ["null_value", "nullValue"] {
        if obj.remove(key).is_some() {
            return Json::Null;
        }
    }
    for key in [
        "number_value",
        "numberValue",
        "string_value",
        "stringValue",
        "bool_value",
        "boolValue",
        "struct_value",
        "structValue",
        "list_value",
        "listValue",
    ] {
        if let Some(inner) = obj.remove(key) {
            return inner;
        }
    }
    Json::Null
}

fn value_from_json(value: &Json) -> Map<String, Json> {
    match value {
        Json::Null => single("null_value", Json::Null),
        Json::Number(_) => single("number_value", value.clone()),
        Json::String(_) => single("string_value", value.clone()),
        Json::Bool(_) => single("bool_value", value.clone()),
        Json::Object(_) => single("struct_value", value.clone()),
        Json::Array(_) => single("list_value", value.clone()),
    }
}

/// The `jsonName` derivation: drop underscores, capitalize what followed.
pub fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for c in snake.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn to_snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for c in camel.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
