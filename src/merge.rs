//! Field-wise merge helpers.
//!
//! Merging two values of one message type must equal decoding the
//! concatenation of their encodings: scalars take the right operand when it
//! is set (approximated for proto3 by "not the default"), sub-messages merge
//! recursively, repeated fields concatenate, map entries overwrite by key,
//! and a set oneof replaces the left variant entirely.

use crate::message::Message;
use crate::scalar::Scalar;
use crate::sentinel::Oneof;

/// Scalar and enum fields: `b` overwrites unless it holds the default.
pub fn scalar<S: Scalar>(a: &mut S::Value, b: S::Value) {
    if !S::is_default(&b) {
        *a = b;
    }
}

/// Proto2 required fields always carry a wire occurrence, so `b` wins
/// unconditionally.
pub fn required<T>(a: &mut T, b: T) {
    *a = b;
}

/// Optional fields: a set `b` replaces `a`.
pub fn optional<T>(a: &mut Option<T>, b: Option<T>) {
    if b.is_some() {
        *a = b;
    }
}

/// Singular message fields: recursively merged when both are set.
pub fn message<M: Message>(a: &mut Option<M>, b: Option<M>) {
    match (a.as_mut(), b) {
        (Some(a), Some(b)) => a.merge_from(b),
        (None, Some(b)) => *a = Some(b),
        (_, None) => {}
    }
}

/// Repeated fields concatenate.
pub fn repeated<T>(a: &mut Vec<T>, b: Vec<T>) {
    a.extend(b);
}

/// Map fields: `b`'s entries overwrite `a`'s by key and take the last
/// position, matching the wire semantics of re-decoded duplicate keys.
pub fn map<K: PartialEq, V>(a: &mut Vec<(K, V)>, b: Vec<(K, V)>) {
    for (key, value) in b {
        a.retain(|(existing, _)| *existing != key);
        a.push((key, value));
    }
}

/// Oneof fields: a set `b` replaces whatever variant `a` held.
pub fn oneof<O: Oneof>(a: &mut O, b: O) {
    if b.is_set() {
        *a = b;
    }
}
