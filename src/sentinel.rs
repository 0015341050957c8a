//! Field sentinels: the decode-side combinators.
//!
//! Generated code allocates one sentinel per field, hands them to
//! [`crate::decode::run`], then reads each sentinel back in declaration
//! order to feed the message constructor. A sentinel is a single-slot
//! accumulator; mutation stays inside one deserialize call.

use core::fmt;

use serde_json::{Map, Value as Json};

use crate::decode::{DecodeContext, FieldSink};
use crate::error::{DecodeError, DecodeErrorKind};
use crate::field::{FieldKind, WireField};
use crate::json::JsonOptions;
use crate::reader::Reader;
use crate::scalar::Scalar;
use crate::writer::Writer;

/// A singular field with proto3 (or proto2 explicit-default) semantics:
/// last wire occurrence wins, absence reads as the default.
pub struct Basic<S: Scalar> {
    tag: u32,
    default: Option<S::Value>,
    slot: Option<S::Value>,
}

pub fn basic<S: Scalar>(tag: u32) -> Basic<S> {
    Basic {
        tag,
        default: None,
        slot: None,
    }
}

/// A proto2 field with a declared default value.
pub fn basic_with_default<S: Scalar>(tag: u32, default: S::Value) -> Basic<S> {
    Basic {
        tag,
        default: Some(default),
        slot: None,
    }
}

impl<S: Scalar> Basic<S> {
    pub fn finish(self) -> S::Value {
        self.slot
            .or(self.default)
            .unwrap_or_else(S::default_value)
    }
}

impl<S: Scalar> FieldSink for Basic<S> {
    fn register(&self, tags: &mut Vec<u32>) {
        tags.push(self.tag);
    }

    fn consume(
        &mut self,
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        S::merge_decode(&mut self.slot, tag, field, ctx)
    }
}

/// A proto2 required field: reading it back fails if nothing arrived.
pub struct Required<S: Scalar> {
    tag: u32,
    name: &'static str,
    slot: Option<S::Value>,
}

pub fn required<S: Scalar>(tag: u32, name: &'static str) -> Required<S> {
    Required {
        tag,
        name,
        slot: None,
    }
}

impl<S: Scalar> Required<S> {
    pub fn finish(self) -> Result<S::Value, DecodeError> {
        self.slot.ok_or_else(|| {
            DecodeErrorKind::RequiredFieldMissing {
                tag: self.tag,
                name: self.name,
            }
            .into()
        })
    }
}

impl<S: Scalar> FieldSink for Required<S> {
    fn register(&self, tags: &mut Vec<u32>) {
        tags.push(self.tag);
    }

    fn consume(
        &mut self,
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        S::merge_decode(&mut self.slot, tag, field, ctx)
    }
}

/// An optional field: absence is distinguishable from the default. Singular
/// message fields use this shape in both proto2 and proto3.
pub struct Optional<S: Scalar> {
    tag: u32,
    slot: Option<S::Value>,
}

pub fn optional<S: Scalar>(tag: u32) -> Optional<S> {
    Optional { tag, slot: None }
}

impl<S: Scalar> Optional<S> {
    pub fn finish(self) -> Option<S::Value> {
        self.slot
    }
}

impl<S: Scalar> FieldSink for Optional<S> {
    fn register(&self, tags: &mut Vec<u32>) {
        tags.push(self.tag);
    }

    fn consume(
        &mut self,
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        S::merge_decode(&mut self.slot, tag, field, ctx)
    }
}

/// A repeated field accumulating elements in wire order.
///
/// A length-delimited occurrence of a packable scalar is read as a packed
/// run; tagged occurrences append one element each. The two encodings may be
/// mixed for the same tag and all elements concatenate.
pub struct Repeated<S: Scalar> {
    tag: u32,
    values: Vec<S::Value>,
}

pub fn repeated<S: Scalar>(tag: u32) -> Repeated<S> {
    Repeated {
        tag,
        values: Vec::new(),
    }
}

impl<S: Scalar> Repeated<S> {
    pub fn finish(self) -> Vec<S::Value> {
        self.values
    }
}

impl<S: Scalar> FieldSink for Repeated<S> {
    fn register(&self, tags: &mut Vec<u32>) {
        tags.push(self.tag);
    }

    fn consume(
        &mut self,
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        match field {
            WireField::LengthDelimited(data) if S::KIND.packable() => {
                let mut reader = Reader::new(data);
                while reader.has_more() {
                    let element = match S::KIND {
                        FieldKind::Varint => WireField::Varint(reader.read_varint()?),
                        FieldKind::Fixed32 => WireField::Fixed32(reader.read_fixed32()?),
                        FieldKind::Fixed64 => WireField::Fixed64(reader.read_fixed64()?),
                        FieldKind::LengthDelimited => unreachable!(),
                    };
                    self.values.push(S::decode(tag, element, ctx)?);
                }
                Ok(())
            }
            field => {
                self.values.push(S::decode(tag, field, ctx)?);
                Ok(())
            }
        }
    }
}

/// A map field: repeated over the synthetic `{key = 1, value = 2}` entry
/// message. Entries keep the order of each key's last occurrence; duplicate
/// keys collapse last-wins.
pub struct MapField<K: Scalar, V: Scalar> {
    tag: u32,
    entries: Vec<(K::Value, V::Value)>,
}

pub fn map<K: Scalar, V: Scalar>(tag: u32) -> MapField<K, V> {
    MapField {
        tag,
        entries: Vec::new(),
    }
}

impl<K: Scalar, V: Scalar> MapField<K, V> {
    pub fn finish(self) -> Vec<(K::Value, V::Value)> {
        self.entries
    }
}

impl<K: Scalar, V: Scalar> FieldSink for MapField<K, V> {
    fn register(&self, tags: &mut Vec<u32>) {
        tags.push(self.tag);
    }

    fn consume(
        &mut self,
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        let data = match field {
            WireField::LengthDelimited(data) => data,
            other => {
                return Err(DecodeErrorKind::WrongFieldType {
                    expected: FieldKind::LengthDelimited,
                    actual: other.kind(),
                    field: tag,
                }
                .into())
            }
        };
        let ctx = ctx.enter()?;

        let mut key: Option<K::Value> = None;
        let mut value: Option<V::Value> = None;
        let mut reader = Reader::new(data);
        while reader.has_more() {
            let (entry_tag, entry_field) = reader.read_field()?;
            match entry_tag {
                1 => K::merge_decode(&mut key, entry_tag, entry_field, ctx)?,
                2 => V::merge_decode(&mut value, entry_tag, entry_field, ctx)?,
                _ => {}
            }
        }
        let key = key.unwrap_or_else(K::default_value);
        let value = value.unwrap_or_else(V::default_value);

        self.entries.retain(|(existing, _)| *existing != key);
        self.entries.push((key, value));
        Ok(())
    }
}

/// A group of fields of which at most one may be set, modeled as a closed
/// tagged variant with a not-set sentinel.
///
/// Generated code implements this per oneof; within one decode pass, the
/// last variant on the wire wins in full.
pub trait Oneof: Clone + PartialEq + fmt::Debug + 'static {
    /// The tags of every member field.
    const TAGS: &'static [u32];

    fn not_set() -> Self;

    fn is_set(&self) -> bool;

    /// Decodes the member carrying `tag` into a freshly-set variant.
    fn decode_variant(
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<Self, DecodeError>;

    /// Writes the active variant's complete field (tag included), or nothing
    /// when not set.
    fn encode(&self, w: &mut Writer);

    /// Inserts the active variant into the message's JSON object.
    fn insert_json(&self, obj: &mut Map<String, Json>, opts: &JsonOptions);
}

/// The sentinel for a [`Oneof`].
pub struct OneofField<O: Oneof> {
    slot: O,
}

pub fn oneof<O: Oneof>() -> OneofField<O> {
    OneofField { slot: O::not_set() }
}

impl<O: Oneof> OneofField<O> {
    pub fn finish(self) -> O {
        self.slot
    }

    /// For oneofs the schema demands be populated.
    pub fn finish_required(self) -> Result<O, DecodeError> {
        if self.slot.is_set() {
            Ok(self.slot)
        } else {
            Err(DecodeErrorKind::OneofMissing.into())
        }
    }
}

impl<O: Oneof> FieldSink for OneofField<O> {
    fn register(&self, tags: &mut Vec<u32>) {
        tags.extend_from_slice(O::TAGS);
    }

    fn consume(
        &mut self,
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        self.slot = O::decode_variant(tag, field, ctx)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar;

    fn ctx() -> DecodeContext {
        DecodeContext::default()
    }

    #[test]
    fn basic_last_wins() {
        let mut field = basic::<scalar::Int32>(1);
        field.consume(1, WireField::Varint(1), ctx()).unwrap();
        field.consume(1, WireField::Varint(2), ctx()).unwrap();
        assert_eq!(field.finish(), 2);
    }

    #[test]
    fn basic_defaults() {
        assert_eq!(basic::<scalar::Int32>(1).finish(), 0);
        assert_eq!(
            basic_with_default::<scalar::Int32>(1, 42).finish(),
            42
        );
        let mut overridden = basic_with_default::<scalar::Int32>(1, 42);
        overridden.consume(1, WireField::Varint(7), ctx()).unwrap();
        assert_eq!(overridden.finish(), 7);
    }

    #[test]
    fn required_fails_when_absent() {
        let err = required::<scalar::Str>(3, "street").finish().unwrap_err();
        assert!(matches!(
            err.kind(),
            DecodeErrorKind::RequiredFieldMissing { tag: 3, name: "street" }
        ));

        let mut present = required::<scalar::Str>(3, "street");
        present
            .consume(3, WireField::LengthDelimited(b"Main"), ctx())
            .unwrap();
        assert_eq!(present.finish().unwrap(), "Main");
    }

    #[test]
    fn optional_distinguishes_absence() {
        assert_eq!(optional::<scalar::Int32>(1).finish(), None);
        let mut zero = optional::<scalar::Int32>(1);
        zero.consume(1, WireField::Varint(0), ctx()).unwrap();
        assert_eq!(zero.finish(), Some(0));
    }

    #[test]
    fn repeated_mixes_packed_and_unpacked() {
        let mut field = repeated::<scalar::Int32>(5);
        field.consume(5, WireField::Varint(1), ctx()).unwrap();
        // Packed run [2, 3].
        field
            .consume(5, WireField::LengthDelimited(&[0x02, 0x03]), ctx())
            .unwrap();
        field.consume(5, WireField::Varint(4), ctx()).unwrap();
        assert_eq!(field.finish(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn repeated_strings_never_unpack() {
        let mut field = repeated::<scalar::Str>(5);
        field
            .consume(5, WireField::LengthDelimited(b"ab"), ctx())
            .unwrap();
        assert_eq!(field.finish(), vec!["ab".to_owned()]);
    }

    #[test]
    fn map_duplicate_keys_collapse_last_wins() {
        let mut field = map::<scalar::Str, scalar::Int32>(7);
        // {"a": 1}
        field
            .consume(7, WireField::LengthDelimited(&[0x0A, 0x01, b'a', 0x10, 0x01]), ctx())
            .unwrap();
        // {"b": 2}
        field
            .consume(7, WireField::LengthDelimited(&[0x0A, 0x01, b'b', 0x10, 0x02]), ctx())
            .unwrap();
        // {"a": 3} again: replaces and moves to the back.
        field
            .consume(7, WireField::LengthDelimited(&[0x0A, 0x01, b'a', 0x10, 0x03]), ctx())
            .unwrap();
        assert_eq!(
            field.finish(),
            vec![("b".to_owned(), 2), ("a".to_owned(), 3)]
        );
    }

    #[test]
    fn map_entry_defaults_missing_halves() {
        let mut field = map::<scalar::Str, scalar::Int32>(7);
        field
            .consume(7, WireField::LengthDelimited(&[]), ctx())
            .unwrap();
        assert_eq!(field.finish(), vec![(String::new(), 0)]);
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    enum Either {
        #[default]
        NotSet,
        Left(i32),
        Right(String),
    }

    impl Oneof for Either {
        const TAGS: &'static [u32] = &[1, 2];

        fn not_set() -> Either {
            Either::NotSet
        }

        fn is_set(&self) -> bool {
            !matches!(self, Either::NotSet)
        }

        fn decode_variant(
            tag: u32,
            field: WireField<'_>,
            ctx: DecodeContext,
        ) -> Result<Either, DecodeError> {
            Ok(match tag {
                1 => Either::Left(scalar::Int32::decode(tag, field, ctx)?),
                2 => Either::Right(scalar::Str::decode(tag, field, ctx)?),
                _ => Either::NotSet,
            })
        }

        fn encode(&self, _w: &mut Writer) {}

        fn insert_json(&self, _obj: &mut Map<String, Json>, _opts: &JsonOptions) {}
    }

    #[test]
    fn oneof_last_variant_wins() {
        let mut field = oneof::<Either>();
        field.consume(1, WireField::Varint(5), ctx()).unwrap();
        field
            .consume(2, WireField::LengthDelimited(b"x"), ctx())
            .unwrap();
        assert_eq!(field.finish(), Either::Right("x".to_owned()));
    }

    #[test]
    fn required_oneof_fails_when_not_set() {
        let err = oneof::<Either>().finish_required().unwrap_err();
        assert!(matches!(err.kind(), DecodeErrorKind::OneofMissing));

        let mut set = oneof::<Either>();
        set.consume(1, WireField::Varint(5), ctx()).unwrap();
        assert_eq!(set.finish_required().unwrap(), Either::Left(5));
    }
}
