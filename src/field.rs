//! The in-memory model of a single wire-format field.

use bytes::Bytes;

use crate::error::{DecodeError, DecodeErrorKind};

/// The four framing kinds of the protobuf wire format.
///
/// The numeric value of each kind equals the 3-bit wire type carried in a
/// field key. Every scalar spec maps to exactly one kind, which determines
/// both how the reader frames its bytes and whether a repeated field of that
/// spec may be packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FieldKind {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl FieldKind {
    /// Decomposes the wire type bits of a field key.
    ///
    /// Group wire types (3 and 4) are rejected as unsupported rather than
    /// skipped, so their nested payload can never be misinterpreted.
    pub(crate) fn from_wire_type(value: u64) -> Result<FieldKind, DecodeError> {
        match value {
            0 => Ok(FieldKind::Varint),
            1 => Ok(FieldKind::Fixed64),
            2 => Ok(FieldKind::LengthDelimited),
            5 => Ok(FieldKind::Fixed32),
            3 | 4 => Err(DecodeErrorKind::NotImplemented {
                what: "group wire types",
            }
            .into()),
            _ => Err(DecodeErrorKind::IllegalWireType { value }.into()),
        }
    }

    /// The wire type bits this kind encodes to.
    pub fn wire_type(self) -> u32 {
        self as u32
    }

    /// Whether repeated fields of this kind may use the packed encoding.
    pub fn packable(self) -> bool {
        !matches!(self, FieldKind::LengthDelimited)
    }
}

/// A single wire field as produced by [`Reader::read_field`].
///
/// Length-delimited payloads borrow from the reader's input; a `WireField`
/// is transient and lives within one field-decoding step.
///
/// [`Reader::read_field`]: crate::Reader::read_field
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WireField<'a> {
    Varint(u64),
    Fixed32(u32),
    Fixed64(u64),
    LengthDelimited(&'a [u8]),
}

impl<'a> WireField<'a> {
    pub fn kind(&self) -> FieldKind {
        match self {
            WireField::Varint(_) => FieldKind::Varint,
            WireField::Fixed32(_) => FieldKind::Fixed32,
            WireField::Fixed64(_) => FieldKind::Fixed64,
            WireField::LengthDelimited(_) => FieldKind::LengthDelimited,
        }
    }

    /// Copies the payload out of the input buffer.
    pub fn to_owned(&self) -> OwnedField {
        match *self {
            WireField::Varint(v) => OwnedField::Varint(v),
            WireField::Fixed32(v) => OwnedField::Fixed32(v),
            WireField::Fixed64(v) => OwnedField::Fixed64(v),
            WireField::LengthDelimited(data) => {
                OwnedField::LengthDelimited(Bytes::copy_from_slice(data))
            }
        }
    }
}

/// An owned wire field, as retained by extension sets and debug listings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OwnedField {
    Varint(u64),
    Fixed32(u32),
    Fixed64(u64),
    LengthDelimited(Bytes),
}

impl OwnedField {
    pub fn kind(&self) -> FieldKind {
        self.borrow().kind()
    }

    /// Reborrows the payload for decoding.
    pub fn borrow(&self) -> WireField<'_> {
        match self {
            OwnedField::Varint(v) => WireField::Varint(*v),
            OwnedField::Fixed32(v) => WireField::Fixed32(*v),
            OwnedField::Fixed64(v) => WireField::Fixed64(*v),
            OwnedField::LengthDelimited(data) => WireField::LengthDelimited(data),
        }
    }
}
