//! The message and enum traits implemented by generated code.

use core::fmt;

use serde_json::{Map, Value as Json};

use crate::decode::{DecodeContext, DecodeStrategy};
use crate::error::{DecodeError, DecodeErrorKind};
use crate::json::{well_known, JsonOptions};
use crate::open_enum::OpenEnum;
use crate::reader::Reader;
use crate::writer::{Mode, Writer};

/// A Protocol Buffers message.
///
/// Generated code supplies the five field-walking methods, each a traversal
/// of the message's field spec; everything else is provided. Messages are
/// immutable values: decoding builds a fresh one, encoding only reads.
pub trait Message: Clone + PartialEq + fmt::Debug + Sized + 'static {
    /// The fully qualified protobuf name, e.g. `"google.protobuf.Duration"`.
    const NAME: &'static str;

    /// The message with every field at its default.
    fn default_value() -> Self;

    /// Writes the raw fields, without any outer framing.
    fn encode_fields(&self, w: &mut Writer);

    /// Decodes the raw fields until the reader is exhausted.
    fn decode_fields(reader: &mut Reader<'_>, ctx: DecodeContext) -> Result<Self, DecodeError>;

    /// The plain JSON object form, before any well-known-type mapping.
    fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json>;

    /// Parses the plain JSON object form.
    fn from_json_fields(obj: &Map<String, Json>) -> Result<Self, DecodeError>;

    /// Folds `other` into `self` with protobuf merge semantics.
    fn merge_from(&mut self, other: Self);

    /// The fully qualified protobuf name.
    fn name() -> &'static str {
        Self::NAME
    }

    /// Appends this message's encoding to an existing writer.
    fn write_to(&self, w: &mut Writer) {
        self.encode_fields(w);
    }

    /// Encodes into a fresh writer with the default allocation mode.
    fn to_proto(&self) -> Writer {
        self.to_proto_with(Mode::default())
    }

    fn to_proto_with(&self, mode: Mode) -> Writer {
        let mut w = Writer::with_mode(mode);
        self.encode_fields(&mut w);
        w
    }

    /// Appends this message with a varint length prefix, for stream framing.
    fn to_proto_length_delimited(&self, w: &mut Writer) {
        let mut scratch = w.scratch();
        self.encode_fields(&mut scratch);
        w.write_varint(scratch.len() as u64);
        w.append(scratch);
    }

    /// Decodes a message from the remainder of the reader.
    fn from_proto(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Self::decode_fields(reader, DecodeContext::default())
    }

    /// Like [`Message::from_proto`] with an explicit dispatch strategy.
    fn from_proto_with(
        reader: &mut Reader<'_>,
        strategy: DecodeStrategy,
    ) -> Result<Self, DecodeError> {
        Self::decode_fields(reader, DecodeContext::new(strategy))
    }

    /// Decoding variant that panics on malformed input, for callers that
    /// treat it as a bug.
    fn from_proto_exn(reader: &mut Reader<'_>) -> Self {
        match Self::from_proto(reader) {
            Ok(message) => message,
            Err(err) => panic!("{}", err),
        }
    }

    /// Reads a varint length prefix and decodes a message from that many
    /// bytes.
    fn from_proto_length_delimited(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let data = reader.read_length_delimited()?;
        Self::from_proto(&mut Reader::new(data))
    }

    /// Serializes to the canonical JSON mapping, applying the well-known-type
    /// shape when this message's qualified name calls for one.
    fn to_json(&self, opts: &JsonOptions) -> Json {
        well_known::into_json(Self::NAME, self.json_fields(opts))
    }

    /// Parses the canonical JSON mapping.
    fn from_json(value: &Json) -> Result<Self, DecodeError> {
        let obj = well_known::from_json(Self::NAME, value)?;
        Self::from_json_fields(&obj)
    }

    /// Merges two values; equivalent to decoding the concatenation of their
    /// encodings.
    fn merge(mut a: Self, b: Self) -> Self {
        a.merge_from(b);
        a
    }
}

/// A protobuf enumeration.
///
/// Generated code maps variants to their declared integers and names; the
/// provided JSON conversions honor the `enum_names` option on output and
/// accept either form on input.
pub trait ProtoEnum: Clone + Copy + PartialEq + fmt::Debug + Sized + 'static {
    /// The first-declared variant, protobuf's enum default.
    fn default_value() -> Self;

    fn from_i32(value: i32) -> Result<Self, DecodeError>;

    /// The permissive decode path: an undeclared integer becomes
    /// [`OpenEnum::Unknown`] instead of an error. Fields spec'd as
    /// `Enumeration<OpenEnum<E>>` use this to stay forward compatible with
    /// peers whose schema has grown new variants.
    fn from_opt(value: i32) -> OpenEnum<Self> {
        OpenEnum::from_raw(value)
    }

    fn to_i32(self) -> i32;

    fn from_name(name: &str) -> Option<Self>;

    fn name(self) -> &'static str;

    fn to_json(self, opts: &JsonOptions) -> Json {
        if opts.enum_names {
            Json::String(self.name().to_owned())
        } else {
            Json::from(self.to_i32())
        }
    }

    fn from_json(value: &Json) -> Result<Self, DecodeError> {
        match value {
            Json::String(s) => {
                if let Some(variant) = Self::from_name(s) {
                    return Ok(variant);
                }
                // Integer spellings of enum values also arrive as strings.
                match s.parse::<i32>() {
                    Ok(raw) => Self::from_i32(raw),
                    Err(_) => Err(DecodeError::illegal_value("unknown enum name")),
                }
            }
            Json::Number(n) => {
                let raw = n
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| DecodeError::illegal_value("enum value out of range"))?;
                Self::from_i32(raw)
            }
            _ => Err(DecodeError::illegal_value("expected an enum name or value")),
        }
    }

    /// The error decoding an undeclared integer surfaces.
    fn unknown(value: i32) -> DecodeError {
        DecodeErrorKind::UnknownEnumValue { value }.into()
    }
}
