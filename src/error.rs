//! Protobuf encoding and decoding errors.

use core::fmt;

use crate::field::FieldKind;

/// A Protobuf message decoding error.
///
/// `DecodeError` indicates that the input does not contain a valid Protobuf
/// message, or that it violates a constraint of the message's field spec
/// (a missing required field, an unknown enum value, and so on).
#[derive(Clone, PartialEq, Eq)]
pub struct DecodeError {
    inner: Box<DecodeErrorKind>,
}

/// The root cause of a [`DecodeError`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// The input ended in the middle of a varint, fixed-width value, or
    /// length-delimited payload.
    Truncated,
    /// A varint ran past ten bytes or exceeded `u64::MAX`.
    VarintOverflow,
    /// A field key carried a wire type outside the protobuf encoding.
    IllegalWireType { value: u64 },
    /// A field arrived with a wire kind other than the one its spec expects.
    WrongFieldType {
        expected: FieldKind,
        actual: FieldKind,
        field: u32,
    },
    /// A payload was framed correctly but its contents are malformed, e.g.
    /// a non-UTF-8 string, invalid base64, or an out-of-range JSON number.
    IllegalValue { what: &'static str },
    /// An enum field carried an integer with no corresponding variant.
    UnknownEnumValue { value: i32 },
    /// A oneof required to be populated had no variant set.
    OneofMissing,
    /// A proto2 required field did not occur on the wire.
    RequiredFieldMissing { tag: u32, name: &'static str },
    /// Nested messages exceeded the recursion limit.
    RecursionLimitReached,
    /// A wire feature outside this runtime, e.g. proto2 groups.
    NotImplemented { what: &'static str },
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind) -> DecodeError {
        DecodeError {
            inner: Box::new(kind),
        }
    }

    /// The root cause of this error.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.inner
    }

    /// Shorthand for an [`DecodeErrorKind::IllegalValue`] error; generated
    /// code uses this for malformed payloads it rejects itself.
    pub fn illegal_value(what: &'static str) -> DecodeError {
        DecodeErrorKind::IllegalValue { what }.into()
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(kind)
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeError")
            .field("kind", &self.inner)
            .finish()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode Protobuf message: {}", self.inner)
    }
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::Truncated => write!(f, "truncated input"),
            DecodeErrorKind::VarintOverflow => write!(f, "invalid varint"),
            DecodeErrorKind::IllegalWireType { value } => {
                write!(f, "invalid wire type value: {}", value)
            }
            DecodeErrorKind::WrongFieldType {
                expected,
                actual,
                field,
            } => write!(
                f,
                "field {} has wire kind {:?} (expected {:?})",
                field, actual, expected
            ),
            DecodeErrorKind::IllegalValue { what } => write!(f, "illegal value: {}", what),
            DecodeErrorKind::UnknownEnumValue { value } => {
                write!(f, "unknown enumeration value {}", value)
            }
            DecodeErrorKind::OneofMissing => write!(f, "no oneof variant set"),
            DecodeErrorKind::RequiredFieldMissing { tag, name } => {
                write!(f, "required field missing: {} (tag {})", name, tag)
            }
            DecodeErrorKind::RecursionLimitReached => write!(f, "recursion limit reached"),
            DecodeErrorKind::NotImplemented { what } => write!(f, "not implemented: {}", what),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<DecodeError> for std::io::Error {
    fn from(error: DecodeError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::InvalidData, error)
    }
}
