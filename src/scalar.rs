//! Phantom-typed scalar specs.
//!
//! Each protobuf scalar type is described by a marker type implementing
//! [`Scalar`]: the wire kind it frames as, its proto3 default, and its
//! conversions to and from the wire payload and the JSON tree. The same
//! marker drives the binary encoder, the binary decoder, and both JSON
//! directions, so the two sides of a field can never disagree.

use core::fmt;
use core::marker::PhantomData;

use base64::Engine as _;
use serde_json::Value as Json;

use crate::decode::DecodeContext;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::field::{FieldKind, WireField};
use crate::json::JsonOptions;
use crate::message::{Message, ProtoEnum};
use crate::reader::Reader;
use crate::varint::{decode_zigzag32, decode_zigzag64, encode_zigzag32, encode_zigzag64};
use crate::writer::Writer;

/// A typed description of one scalar protobuf type.
pub trait Scalar: 'static {
    /// The in-memory type a field of this spec decodes to.
    type Value: Clone + PartialEq + fmt::Debug;

    /// The wire framing for this spec.
    const KIND: FieldKind;

    fn default_value() -> Self::Value;

    fn is_default(value: &Self::Value) -> bool {
        *value == Self::default_value()
    }

    /// Transforms one wire occurrence into a value.
    fn decode(
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<Self::Value, DecodeError>;

    /// Folds one wire occurrence into a single-field slot. Scalars overwrite
    /// (last-wins); embedded messages merge into the existing value.
    fn merge_decode(
        slot: &mut Option<Self::Value>,
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        *slot = Some(Self::decode(tag, field, ctx)?);
        Ok(())
    }

    /// Writes the payload only; tags and length prefixes are the field
    /// combinators' concern.
    fn encode(value: &Self::Value, w: &mut Writer);

    fn to_json(value: &Self::Value, opts: &JsonOptions) -> Json;

    fn from_json(value: &Json) -> Result<Self::Value, DecodeError>;
}

fn wrong_kind(expected: FieldKind, actual: FieldKind, field: u32) -> DecodeError {
    DecodeErrorKind::WrongFieldType {
        expected,
        actual,
        field,
    }
    .into()
}

fn expect_varint(tag: u32, field: WireField<'_>) -> Result<u64, DecodeError> {
    match field {
        WireField::Varint(v) => Ok(v),
        other => Err(wrong_kind(FieldKind::Varint, other.kind(), tag)),
    }
}

fn expect_fixed32(tag: u32, field: WireField<'_>) -> Result<u32, DecodeError> {
    match field {
        WireField::Fixed32(v) => Ok(v),
        other => Err(wrong_kind(FieldKind::Fixed32, other.kind(), tag)),
    }
}

fn expect_fixed64(tag: u32, field: WireField<'_>) -> Result<u64, DecodeError> {
    match field {
        WireField::Fixed64(v) => Ok(v),
        other => Err(wrong_kind(FieldKind::Fixed64, other.kind(), tag)),
    }
}

fn expect_length_delimited<'a>(tag: u32, field: WireField<'a>) -> Result<&'a [u8], DecodeError> {
    match field {
        WireField::LengthDelimited(data) => Ok(data),
        other => Err(wrong_kind(FieldKind::LengthDelimited, other.kind(), tag)),
    }
}

// JSON number coercion. 64-bit integers are accepted both as JSON numbers
// and as decimal strings; this mirrors the canonical proto3 mapping, which
// *emits* them as strings to dodge double rounding.

fn json_to_i64(value: &Json) -> Result<i64, DecodeError> {
    match value {
        Json::Number(n) => {
            if let Some(v) = n.as_i64() {
                return Ok(v);
            }
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    return Ok(f as i64);
                }
            }
            Err(DecodeError::illegal_value("JSON number is not an integer"))
        }
        Json::String(s) => s
            .parse::<i64>()
            .map_err(|_| DecodeError::illegal_value("JSON string is not an integer")),
        _ => Err(DecodeError::illegal_value("expected a JSON integer")),
    }
}

fn json_to_u64(value: &Json) -> Result<u64, DecodeError> {
    match value {
        Json::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Ok(v);
            }
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64 {
                    return Ok(f as u64);
                }
            }
            Err(DecodeError::illegal_value("JSON number is not an unsigned integer"))
        }
        Json::String(s) => s
            .parse::<u64>()
            .map_err(|_| DecodeError::illegal_value("JSON string is not an unsigned integer")),
        _ => Err(DecodeError::illegal_value("expected a JSON unsigned integer")),
    }
}

fn json_to_i32(value: &Json) -> Result<i32, DecodeError> {
    i32::try_from(json_to_i64(value)?)
        .map_err(|_| DecodeError::illegal_value("integer out of 32-bit range"))
}

fn json_to_u32(value: &Json) -> Result<u32, DecodeError> {
    u32::try_from(json_to_u64(value)?)
        .map_err(|_| DecodeError::illegal_value("integer out of unsigned 32-bit range"))
}

fn json_to_f64(value: &Json) -> Result<f64, DecodeError> {
    match value {
        Json::Number(n) => n
            .as_f64()
            .ok_or_else(|| DecodeError::illegal_value("JSON number out of double range")),
        Json::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            _ => s
                .parse::<f64>()
                .map_err(|_| DecodeError::illegal_value("JSON string is not a number")),
        },
        _ => Err(DecodeError::illegal_value("expected a JSON number")),
    }
}

fn f64_to_json(value: f64) -> Json {
    if value.is_nan() {
        return Json::String("NaN".to_owned());
    }
    if value.is_infinite() {
        let name = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return Json::String(name.to_owned());
    }
    // An exact integer may be emitted as one.
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        return Json::from(value as i64);
    }
    Json::from(value)
}

/// Macro emitting a varint-framed scalar marker.
macro_rules! varint_scalar {
    ($(#[$attr:meta])* $name:ident, $ty:ty,
     to_wire($to_value:ident) $to_wire:expr,
     from_wire($from_value:ident) $from_wire:expr,
     to_json($json_value:ident) $to_json:expr,
     from_json($parse_value:ident) $from_json:expr) => {
        $(#[$attr])*
        pub struct $name;

        impl Scalar for $name {
            type Value = $ty;
            const KIND: FieldKind = FieldKind::Varint;

            fn default_value() -> $ty {
                <$ty>::default()
            }

            fn decode(
                tag: u32,
                field: WireField<'_>,
                _ctx: DecodeContext,
            ) -> Result<$ty, DecodeError> {
                let $from_value = expect_varint(tag, field)?;
                Ok($from_wire)
            }

            fn encode($to_value: &$ty, w: &mut Writer) {
                w.write_varint($to_wire);
            }

            fn to_json($json_value: &$ty, _opts: &JsonOptions) -> Json {
                $to_json
            }

            fn from_json($parse_value: &Json) -> Result<$ty, DecodeError> {
                $from_json
            }
        }
    };
}

varint_scalar!(
    /// `int32`: two's-complement varint, negatives take ten bytes.
    Int32, i32,
    to_wire(value) *value as u64,
    from_wire(value) value as i32,
    to_json(value) Json::from(*value),
    from_json(value) json_to_i32(value)
);

varint_scalar!(
    /// `int64`: two's-complement varint. JSON carries it as a string.
    Int64, i64,
    to_wire(value) *value as u64,
    from_wire(value) value as i64,
    to_json(value) Json::String(value.to_string()),
    from_json(value) json_to_i64(value)
);

varint_scalar!(
    /// `uint32`.
    UInt32, u32,
    to_wire(value) u64::from(*value),
    from_wire(value) value as u32,
    to_json(value) Json::from(*value),
    from_json(value) json_to_u32(value)
);

varint_scalar!(
    /// `uint64`. JSON carries it as a string.
    UInt64, u64,
    to_wire(value) *value,
    from_wire(value) value,
    to_json(value) Json::String(value.to_string()),
    from_json(value) json_to_u64(value)
);

varint_scalar!(
    /// `sint32`: zigzag varint.
    SInt32, i32,
    to_wire(value) encode_zigzag32(*value),
    from_wire(value) decode_zigzag32(value),
    to_json(value) Json::from(*value),
    from_json(value) json_to_i32(value)
);

varint_scalar!(
    /// `sint64`: zigzag varint. JSON carries it as a string.
    SInt64, i64,
    to_wire(value) encode_zigzag64(*value),
    from_wire(value) decode_zigzag64(value),
    to_json(value) Json::String(value.to_string()),
    from_json(value) json_to_i64(value)
);

varint_scalar!(
    /// `bool`. The JSON parser also accepts the strings "true" and "false".
    Bool, bool,
    to_wire(value) u64::from(*value),
    from_wire(value) value != 0,
    to_json(value) Json::Bool(*value),
    from_json(value) match value {
        Json::Bool(b) => Ok(*b),
        Json::String(s) if s == "true" => Ok(true),
        Json::String(s) if s == "false" => Ok(false),
        _ => Err(DecodeError::illegal_value("expected a JSON boolean")),
    }
);

/// Macro emitting a fixed-width scalar marker.
macro_rules! fixed_scalar {
    ($(#[$attr:meta])* $name:ident, $ty:ty, $kind:expr,
     expect($expect:ident), write($write:ident),
     to_wire($to_value:ident) $to_wire:expr,
     from_wire($from_value:ident) $from_wire:expr,
     to_json($json_value:ident) $to_json:expr,
     from_json($parse_value:ident) $from_json:expr) => {
        $(#[$attr])*
        pub struct $name;

        impl Scalar for $name {
            type Value = $ty;
            const KIND: FieldKind = $kind;

            fn default_value() -> $ty {
                <$ty>::default()
            }

            fn decode(
                tag: u32,
                field: WireField<'_>,
                _ctx: DecodeContext,
            ) -> Result<$ty, DecodeError> {
                let $from_value = $expect(tag, field)?;
                Ok($from_wire)
            }

            fn encode($to_value: &$ty, w: &mut Writer) {
                w.$write($to_wire);
            }

            fn to_json($json_value: &$ty, _opts: &JsonOptions) -> Json {
                $to_json
            }

            fn from_json($parse_value: &Json) -> Result<$ty, DecodeError> {
                $from_json
            }
        }
    };
}

fixed_scalar!(
    /// `fixed32`: little-endian unsigned 32-bit.
    Fixed32, u32, FieldKind::Fixed32,
    expect(expect_fixed32), write(write_fixed32),
    to_wire(value) *value,
    from_wire(value) value,
    to_json(value) Json::from(*value),
    from_json(value) json_to_u32(value)
);

fixed_scalar!(
    /// `fixed64`: little-endian unsigned 64-bit. JSON carries it as a string.
    Fixed64, u64, FieldKind::Fixed64,
    expect(expect_fixed64), write(write_fixed64),
    to_wire(value) *value,
    from_wire(value) value,
    to_json(value) Json::String(value.to_string()),
    from_json(value) json_to_u64(value)
);

fixed_scalar!(
    /// `sfixed32`: little-endian signed 32-bit.
    SFixed32, i32, FieldKind::Fixed32,
    expect(expect_fixed32), write(write_fixed32),
    to_wire(value) *value as u32,
    from_wire(value) value as i32,
    to_json(value) Json::from(*value),
    from_json(value) json_to_i32(value)
);

fixed_scalar!(
    /// `sfixed64`: little-endian signed 64-bit. JSON carries it as a string.
    SFixed64, i64, FieldKind::Fixed64,
    expect(expect_fixed64), write(write_fixed64),
    to_wire(value) *value as u64,
    from_wire(value) value as i64,
    to_json(value) Json::String(value.to_string()),
    from_json(value) json_to_i64(value)
);

fixed_scalar!(
    /// `float`: IEEE 754 single precision.
    Float, f32, FieldKind::Fixed32,
    expect(expect_fixed32), write(write_fixed32),
    to_wire(value) value.to_bits(),
    from_wire(value) f32::from_bits(value),
    to_json(value) {
        if value.is_finite() {
            // Round-trip through the shortest decimal form so 0.1f32 prints
            // as 0.1 rather than its f64 widening.
            f64_to_json(value.to_string().parse::<f64>().unwrap_or(f64::from(*value)))
        } else {
            f64_to_json(f64::from(*value))
        }
    },
    from_json(value) json_to_f64(value).map(|v| v as f32)
);

fixed_scalar!(
    /// `double`: IEEE 754 double precision.
    Double, f64, FieldKind::Fixed64,
    expect(expect_fixed64), write(write_fixed64),
    to_wire(value) value.to_bits(),
    from_wire(value) f64::from_bits(value),
    to_json(value) f64_to_json(*value),
    from_json(value) json_to_f64(value)
);

/// `string`: UTF-8 text. Non-UTF-8 payloads fail decoding.
pub struct Str;

impl Scalar for Str {
    type Value = String;
    const KIND: FieldKind = FieldKind::LengthDelimited;

    fn default_value() -> String {
        String::new()
    }

    fn decode(tag: u32, field: WireField<'_>, _ctx: DecodeContext) -> Result<String, DecodeError> {
        let data = expect_length_delimited(tag, field)?;
        String::from_utf8(data.to_vec())
            .map_err(|_| DecodeError::illegal_value("string is not valid UTF-8"))
    }

    fn encode(value: &String, w: &mut Writer) {
        w.put_slice(value.as_bytes());
    }

    fn to_json(value: &String, _opts: &JsonOptions) -> Json {
        Json::String(value.clone())
    }

    fn from_json(value: &Json) -> Result<String, DecodeError> {
        match value {
            Json::String(s) => Ok(s.clone()),
            _ => Err(DecodeError::illegal_value("expected a JSON string")),
        }
    }
}

/// `bytes`: an opaque byte string. JSON carries it as padded standard
/// base64; the parser also accepts the URL-safe alphabet.
pub struct Bytes;

impl Scalar for Bytes {
    type Value = Vec<u8>;
    const KIND: FieldKind = FieldKind::LengthDelimited;

    fn default_value() -> Vec<u8> {
        Vec::new()
    }

    fn decode(tag: u32, field: WireField<'_>, _ctx: DecodeContext) -> Result<Vec<u8>, DecodeError> {
        Ok(expect_length_delimited(tag, field)?.to_vec())
    }

    fn encode(value: &Vec<u8>, w: &mut Writer) {
        w.put_slice(value);
    }

    fn to_json(value: &Vec<u8>, _opts: &JsonOptions) -> Json {
        Json::String(base64::engine::general_purpose::STANDARD.encode(value))
    }

    fn from_json(value: &Json) -> Result<Vec<u8>, DecodeError> {
        let Json::String(s) = value else {
            return Err(DecodeError::illegal_value("expected a base64 JSON string"));
        };
        decode_base64(s).ok_or_else(|| DecodeError::illegal_value("invalid base64"))
    }
}

fn decode_base64(s: &str) -> Option<Vec<u8>> {
    const RELAXED: base64::engine::GeneralPurposeConfig =
        base64::engine::GeneralPurposeConfig::new()
            .with_decode_padding_mode(base64::engine::DecodePaddingMode::Indifferent);
    const STANDARD: base64::engine::GeneralPurpose =
        base64::engine::GeneralPurpose::new(&base64::alphabet::STANDARD, RELAXED);
    const URL_SAFE: base64::engine::GeneralPurpose =
        base64::engine::GeneralPurpose::new(&base64::alphabet::URL_SAFE, RELAXED);
    STANDARD.decode(s).or_else(|_| URL_SAFE.decode(s)).ok()
}

/// An enum field, described by its [`ProtoEnum`] implementation.
pub struct Enumeration<E> {
    _marker: PhantomData<E>,
}

impl<E: ProtoEnum> Scalar for Enumeration<E> {
    type Value = E;
    const KIND: FieldKind = FieldKind::Varint;

    fn default_value() -> E {
        E::default_value()
    }

    fn decode(tag: u32, field: WireField<'_>, _ctx: DecodeContext) -> Result<E, DecodeError> {
        let raw = expect_varint(tag, field)? as i32;
        E::from_i32(raw)
    }

    fn encode(value: &E, w: &mut Writer) {
        w.write_varint(value.to_i32() as u64);
    }

    fn to_json(value: &E, opts: &JsonOptions) -> Json {
        value.to_json(opts)
    }

    fn from_json(value: &Json) -> Result<E, DecodeError> {
        E::from_json(value)
    }
}

/// An embedded message field, described by its [`Message`] implementation.
///
/// Repeated wire occurrences of the same singular message field merge
/// rather than overwrite.
pub struct Embedded<M> {
    _marker: PhantomData<M>,
}

impl<M: Message> Scalar for Embedded<M> {
    type Value = M;
    const KIND: FieldKind = FieldKind::LengthDelimited;

    fn default_value() -> M {
        M::default_value()
    }

    fn decode(tag: u32, field: WireField<'_>, ctx: DecodeContext) -> Result<M, DecodeError> {
        let data = expect_length_delimited(tag, field)?;
        M::decode_fields(&mut Reader::new(data), ctx.enter()?)
    }

    fn merge_decode(
        slot: &mut Option<M>,
        tag: u32,
        field: WireField<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        let next = Self::decode(tag, field, ctx)?;
        match slot {
            Some(prev) => prev.merge_from(next),
            None => *slot = Some(next),
        }
        Ok(())
    }

    fn encode(value: &M, w: &mut Writer) {
        value.encode_fields(w);
    }

    fn to_json(value: &M, opts: &JsonOptions) -> Json {
        value.to_json(opts)
    }

    fn from_json(value: &Json) -> Result<M, DecodeError> {
        M::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonOptions;

    fn decode<S: Scalar>(field: WireField<'_>) -> Result<S::Value, DecodeError> {
        S::decode(1, field, DecodeContext::default())
    }

    #[test]
    fn int32_negative_sign_extends() {
        let mut w = Writer::new();
        Int32::encode(&-1, &mut w);
        assert_eq!(w.len(), 10);

        assert_eq!(decode::<Int32>(WireField::Varint(u64::MAX)).unwrap(), -1);
    }

    #[test]
    fn sint_zigzags() {
        let mut w = Writer::new();
        SInt32::encode(&-1, &mut w);
        assert_eq!(&w.contents()[..], &[0x01]);
        assert_eq!(decode::<SInt64>(WireField::Varint(1)).unwrap(), -1);
    }

    #[test]
    fn wrong_kind_is_reported() {
        let err = decode::<Int32>(WireField::Fixed32(0)).unwrap_err();
        assert!(matches!(
            err.kind(),
            DecodeErrorKind::WrongFieldType {
                expected: FieldKind::Varint,
                actual: FieldKind::Fixed32,
                field: 1,
            }
        ));
    }

    #[test]
    fn string_requires_utf8() {
        let err = decode::<Str>(WireField::LengthDelimited(&[0x80, 0x80])).unwrap_err();
        assert!(matches!(err.kind(), DecodeErrorKind::IllegalValue { .. }));
    }

    #[test]
    fn json_sixty_four_bit_ints_are_strings() {
        let opts = JsonOptions::default();
        assert_eq!(Int64::to_json(&-5, &opts), Json::String("-5".to_owned()));
        assert_eq!(UInt64::to_json(&5, &opts), Json::String("5".to_owned()));
        assert_eq!(Int32::to_json(&-5, &opts), Json::from(-5));

        assert_eq!(Int64::from_json(&Json::from(-5)).unwrap(), -5);
        assert_eq!(Int64::from_json(&Json::String("-5".to_owned())).unwrap(), -5);
        assert!(Int32::from_json(&Json::String("2147483648".to_owned())).is_err());
    }

    #[test]
    fn json_floats() {
        let opts = JsonOptions::default();
        assert_eq!(Double::to_json(&1.0, &opts), Json::from(1));
        assert_eq!(Double::to_json(&1.5, &opts), Json::from(1.5));
        assert_eq!(
            Double::to_json(&f64::NAN, &opts),
            Json::String("NaN".to_owned())
        );
        assert_eq!(Float::to_json(&0.1f32, &opts), Json::from(0.1));
        assert!(Double::from_json(&Json::String("Infinity".to_owned()))
            .unwrap()
            .is_infinite());
        assert_eq!(
            Double::from_json(&Json::String("2.5".to_owned())).unwrap(),
            2.5
        );
    }

    #[test]
    fn json_bool_accepts_strings() {
        assert!(Bool::from_json(&Json::String("true".to_owned())).unwrap());
        assert!(!Bool::from_json(&Json::Bool(false)).unwrap());
        assert!(Bool::from_json(&Json::from(1)).is_err());
    }

    #[test]
    fn json_bytes_base64() {
        let opts = JsonOptions::default();
        let value = b"hello world".to_vec();
        let json = Bytes::to_json(&value, &opts);
        assert_eq!(json, Json::String("aGVsbG8gd29ybGQ=".to_owned()));
        assert_eq!(Bytes::from_json(&json).unwrap(), value);
        // Unpadded and URL-safe forms parse too.
        assert_eq!(
            Bytes::from_json(&Json::String("aGVsbG8gd29ybGQ".to_owned())).unwrap(),
            value
        );
    }
}
