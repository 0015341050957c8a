//! Proto2 extension storage.
//!
//! A message with declared extension ranges carries an [`ExtensionSet`]:
//! the wire fields that fell inside those ranges during decode, in wire
//! order. The set re-encodes verbatim after the regular fields, so unknown
//! extensions survive a decode/encode round trip byte for byte. Declared
//! extensions decode their value lazily out of the set through a typed
//! [`Extension`] accessor.

use core::marker::PhantomData;

use crate::decode::DecodeContext;
use crate::error::DecodeError;
use crate::field::{FieldKind, OwnedField, WireField};
use crate::reader::Reader;
use crate::scalar::Scalar;
use crate::writer::Writer;

/// The ordered sideband of wire fields captured from a message's extension
/// ranges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtensionSet {
    fields: Vec<(u32, OwnedField)>,
}

impl ExtensionSet {
    pub fn new() -> ExtensionSet {
        ExtensionSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &OwnedField)> {
        self.fields.iter().map(|(tag, field)| (*tag, field))
    }

    pub(crate) fn capture(&mut self, tag: u32, field: WireField<'_>) {
        self.fields.push((tag, field.to_owned()));
    }

    /// Appends an already-owned wire field, as merging does.
    pub fn push(&mut self, tag: u32, field: OwnedField) {
        self.fields.push((tag, field));
    }

    /// Decodes the extension at `tag` through the scalar spec `S`, taking
    /// the last wire occurrence. `None` when the tag never occurred.
    pub fn get<S: Scalar>(&self, tag: u32) -> Result<Option<S::Value>, DecodeError> {
        let Some((_, field)) = self.fields.iter().rev().find(|(t, _)| *t == tag) else {
            return Ok(None);
        };
        S::decode(tag, field.borrow(), DecodeContext::default()).map(Some)
    }

    /// Replaces every occurrence of `tag` with the encoding of `value`, or
    /// appends when the tag was absent.
    pub fn set<S: Scalar>(&mut self, tag: u32, value: &S::Value) {
        let encoded = encode_owned::<S>(value);
        match self.fields.iter().position(|(t, _)| *t == tag) {
            Some(index) => {
                self.fields.retain(|(t, _)| *t != tag);
                self.fields.insert(index, (tag, encoded));
            }
            None => self.fields.push((tag, encoded)),
        }
    }

    pub fn clear(&mut self, tag: u32) {
        self.fields.retain(|(t, _)| *t != tag);
    }

    /// Re-encodes every captured field in preserved order.
    pub fn encode(&self, w: &mut Writer) {
        for (tag, field) in self.iter() {
            match field {
                OwnedField::Varint(v) => {
                    w.write_tag(tag, FieldKind::Varint);
                    w.write_varint(*v);
                }
                OwnedField::Fixed32(v) => {
                    w.write_tag(tag, FieldKind::Fixed32);
                    w.write_fixed32(*v);
                }
                OwnedField::Fixed64(v) => {
                    w.write_tag(tag, FieldKind::Fixed64);
                    w.write_fixed64(*v);
                }
                OwnedField::LengthDelimited(data) => {
                    w.write_tag(tag, FieldKind::LengthDelimited);
                    w.write_length_delimited(data);
                }
            }
        }
    }
}

impl IntoIterator for ExtensionSet {
    type Item = (u32, OwnedField);
    type IntoIter = std::vec::IntoIter<(u32, OwnedField)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

fn encode_owned<S: Scalar>(value: &S::Value) -> OwnedField {
    let mut scratch = Writer::new();
    S::encode(value, &mut scratch);
    let payload = scratch.contents();
    match S::KIND {
        FieldKind::LengthDelimited => OwnedField::LengthDelimited(payload),
        kind => {
            let mut reader = Reader::new(&payload);
            match kind {
                FieldKind::Varint => OwnedField::Varint(reader.read_varint().unwrap()),
                FieldKind::Fixed32 => OwnedField::Fixed32(reader.read_fixed32().unwrap()),
                FieldKind::Fixed64 => OwnedField::Fixed64(reader.read_fixed64().unwrap()),
                FieldKind::LengthDelimited => unreachable!(),
            }
        }
    }
}

/// A declared extension field: its tag plus the scalar spec to decode it
/// with. Generated code exposes one of these per `extend` declaration.
pub struct Extension<S: Scalar> {
    pub tag: u32,
    _spec: PhantomData<S>,
}

impl<S: Scalar> Extension<S> {
    pub const fn new(tag: u32) -> Extension<S> {
        Extension {
            tag,
            _spec: PhantomData,
        }
    }

    pub fn get(&self, set: &ExtensionSet) -> Result<Option<S::Value>, DecodeError> {
        set.get::<S>(self.tag)
    }

    pub fn set(&self, set: &mut ExtensionSet, value: &S::Value) {
        set.set::<S>(self.tag, value);
    }
}
