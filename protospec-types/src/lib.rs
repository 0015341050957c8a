#![doc(html_root_url = "https://docs.rs/protospec-types/0.4.0")]

//! Protocol Buffers well-known types, defined against the `protospec`
//! runtime in the shape generated code takes.
//!
//! See the [Protobuf reference][1] for more information about well-known
//! types.
//!
//! [1]: https://developers.google.com/protocol-buffers/docs/reference/google.protobuf

use protospec::{
    decode, encode, json, merge, scalar, sentinel, DecodeContext, DecodeError, JsonOptions,
    Message, Reader, Writer,
};
use serde_json::{Map, Value as Json};

mod duration;
mod field_mask;
mod structs;
mod timestamp;
mod wrappers;

pub use duration::{Duration, DurationError};
pub use field_mask::FieldMask;
pub use structs::{value, ListValue, NullValue, Struct, Value};
pub use timestamp::{Timestamp, TimestampError};
pub use wrappers::{
    BoolValue, BytesValue, DoubleValue, FloatValue, Int32Value, Int64Value, StringValue,
    UInt32Value, UInt64Value,
};

pub(crate) const NANOS_PER_SECOND: i32 = 1_000_000_000;
pub(crate) const NANOS_MAX: i32 = NANOS_PER_SECOND - 1;

/// `google.protobuf.Empty`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Empty {}

impl Message for Empty {
    const NAME: &'static str = "google.protobuf.Empty";

    fn default_value() -> Empty {
        Empty {}
    }

    fn encode_fields(&self, _w: &mut Writer) {}

    fn decode_fields(reader: &mut Reader<'_>, ctx: DecodeContext) -> Result<Empty, DecodeError> {
        decode::run(reader, ctx, &mut [])?;
        Ok(Empty {})
    }

    fn json_fields(&self, _opts: &JsonOptions) -> Map<String, Json> {
        Map::new()
    }

    fn from_json_fields(_obj: &Map<String, Json>) -> Result<Empty, DecodeError> {
        Ok(Empty {})
    }

    fn merge_from(&mut self, _other: Empty) {}
}
