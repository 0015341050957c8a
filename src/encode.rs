//! Serialize-side field combinators.
//!
//! Each helper writes one complete field (tag, framing, payload) for a given
//! scalar spec. Length-delimited payloads are serialized into a scratch
//! writer first so the length prefix is known before the tag goes out; the
//! scratch segments are spliced in without copying.

use crate::field::FieldKind;
use crate::scalar::Scalar;
use crate::sentinel::Oneof;
use crate::writer::Writer;

/// Writes one tagged occurrence unconditionally.
pub fn field<S: Scalar>(w: &mut Writer, tag: u32, value: &S::Value) {
    match S::KIND {
        FieldKind::LengthDelimited => {
            let mut scratch = w.scratch();
            S::encode(value, &mut scratch);
            w.write_tag(tag, FieldKind::LengthDelimited);
            w.write_varint(scratch.len() as u64);
            w.append(scratch);
        }
        kind => {
            w.write_tag(tag, kind);
            S::encode(value, w);
        }
    }
}

/// A singular proto3 field: elided when it holds the default.
pub fn basic<S: Scalar>(w: &mut Writer, tag: u32, value: &S::Value) {
    if S::is_default(value) {
        return;
    }
    field::<S>(w, tag, value);
}

/// A proto2 singular or required field: always emitted.
pub fn basic_always<S: Scalar>(w: &mut Writer, tag: u32, value: &S::Value) {
    field::<S>(w, tag, value);
}

/// An optional field: emitted iff set.
pub fn optional<S: Scalar>(w: &mut Writer, tag: u32, value: &Option<S::Value>) {
    if let Some(value) = value {
        field::<S>(w, tag, value);
    }
}

/// A repeated field. Packable element kinds may use the packed encoding:
/// one length-delimited field holding the untagged element payloads.
/// Strings, bytes, and messages always emit one tagged occurrence each.
pub fn repeated<S: Scalar>(w: &mut Writer, tag: u32, values: &[S::Value], packed: bool) {
    if packed && S::KIND.packable() {
        if values.is_empty() {
            return;
        }
        let mut scratch = w.scratch();
        for value in values {
            S::encode(value, &mut scratch);
        }
        w.write_tag(tag, FieldKind::LengthDelimited);
        w.write_varint(scratch.len() as u64);
        w.append(scratch);
    } else {
        for value in values {
            field::<S>(w, tag, value);
        }
    }
}

/// A map field: one length-delimited entry per pair, each a two-field
/// sub-message with the key at tag 1 and the value at tag 2. Default keys
/// and values are elided inside the entry.
pub fn map<K: Scalar, V: Scalar>(w: &mut Writer, tag: u32, entries: &[(K::Value, V::Value)]) {
    for (key, value) in entries {
        let mut entry = w.scratch();
        basic::<K>(&mut entry, 1, key);
        basic::<V>(&mut entry, 2, value);
        w.write_tag(tag, FieldKind::LengthDelimited);
        w.write_varint(entry.len() as u64);
        w.append(entry);
    }
}

/// The active oneof variant, or nothing when not set.
pub fn oneof<O: Oneof>(w: &mut Writer, value: &O) {
    value.encode(w);
}
