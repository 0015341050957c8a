//! Serialize-side JSON combinators: each helper projects one field into the
//! message's JSON object, honoring the naming and default-elision options.

use serde_json::{Map, Value as Json};

use crate::json::JsonOptions;
use crate::scalar::Scalar;
use crate::sentinel::Oneof;

fn key(name: &'static str, json_name: &'static str, opts: &JsonOptions) -> String {
    if opts.json_names {
        json_name.to_owned()
    } else {
        name.to_owned()
    }
}

/// A singular proto3 field: elided when it holds the default (unless the
/// options say otherwise).
pub fn emit<S: Scalar>(
    obj: &mut Map<String, Json>,
    name: &'static str,
    json_name: &'static str,
    value: &S::Value,
    opts: &JsonOptions,
) {
    if opts.omit_default_values && S::is_default(value) {
        return;
    }
    obj.insert(key(name, json_name, opts), S::to_json(value, opts));
}

/// A field whose value is always written when present: proto2 required and
/// explicit-default fields.
pub fn emit_always<S: Scalar>(
    obj: &mut Map<String, Json>,
    name: &'static str,
    json_name: &'static str,
    value: &S::Value,
    opts: &JsonOptions,
) {
    obj.insert(key(name, json_name, opts), S::to_json(value, opts));
}

/// An optional field (including singular message fields): written iff set.
pub fn emit_optional<S: Scalar>(
    obj: &mut Map<String, Json>,
    name: &'static str,
    json_name: &'static str,
    value: &Option<S::Value>,
    opts: &JsonOptions,
) {
    if let Some(value) = value {
        obj.insert(key(name, json_name, opts), S::to_json(value, opts));
    }
}

/// A repeated field: a JSON array, elided when empty.
pub fn emit_repeated<S: Scalar>(
    obj: &mut Map<String, Json>,
    name: &'static str,
    json_name: &'static str,
    values: &[S::Value],
    opts: &JsonOptions,
) {
    if opts.omit_default_values && values.is_empty() {
        return;
    }
    let array = values.iter().map(|v| S::to_json(v, opts)).collect();
    obj.insert(key(name, json_name, opts), Json::Array(array));
}

/// A map field: a JSON object with stringified keys, elided when empty.
pub fn emit_map<K: Scalar, V: Scalar>(
    obj: &mut Map<String, Json>,
    name: &'static str,
    json_name: &'static str,
    entries: &[(K::Value, V::Value)],
    opts: &JsonOptions,
) {
    if opts.omit_default_values && entries.is_empty() {
        return;
    }
    let mut map = Map::new();
    for (k, v) in entries {
        map.insert(map_key(K::to_json(k, opts)), V::to_json(v, opts));
    }
    obj.insert(key(name, json_name, opts), Json::Object(map));
}

/// The active oneof variant, or nothing when not set.
pub fn emit_oneof<O: Oneof>(obj: &mut Map<String, Json>, value: &O, opts: &JsonOptions) {
    if value.is_set() {
        value.insert_json(obj, opts);
    }
}

// Map keys are always JSON strings; the scalar's own JSON form is reused
// and flattened to a string, so int64 keys keep their quoted shape.
fn map_key(value: Json) -> String {
    match value {
        Json::String(s) => s,
        Json::Bool(b) => b.to_string(),
        Json::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
