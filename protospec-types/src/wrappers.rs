//! The `google.protobuf.*Value` wrapper messages.
//!
//! Each wraps one scalar so that absence is distinguishable from the
//! default; the JSON form is the bare inner value.

use super::*;

macro_rules! wrapper {
    ($(#[$attr:meta])* $name:ident, $spec:ty, $value_ty:ty, $proto_name:literal) => {
        $(#[$attr])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            pub value: $value_ty,
        }

        impl Message for $name {
            const NAME: &'static str = $proto_name;

            fn default_value() -> $name {
                $name::default()
            }

            fn encode_fields(&self, w: &mut Writer) {
                encode::basic::<$spec>(w, 1, &self.value);
            }

            fn decode_fields(
                reader: &mut Reader<'_>,
                ctx: DecodeContext,
            ) -> Result<$name, DecodeError> {
                let mut value = sentinel::basic::<$spec>(1);
                decode::run(reader, ctx, &mut [&mut value])?;
                Ok($name {
                    value: value.finish(),
                })
            }

            fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json> {
                let mut obj = Map::new();
                json::ser::emit::<$spec>(&mut obj, "value", "value", &self.value, opts);
                obj
            }

            fn from_json_fields(obj: &Map<String, Json>) -> Result<$name, DecodeError> {
                Ok($name {
                    value: json::de::parse::<$spec>(obj, "value", "value")?,
                })
            }

            fn merge_from(&mut self, other: $name) {
                merge::scalar::<$spec>(&mut self.value, other.value);
            }
        }
    };
}

wrapper!(
    /// `google.protobuf.DoubleValue`
    DoubleValue, scalar::Double, f64, "google.protobuf.DoubleValue"
);
wrapper!(
    /// `google.protobuf.FloatValue`
    FloatValue, scalar::Float, f32, "google.protobuf.FloatValue"
);
wrapper!(
    /// `google.protobuf.Int64Value`
    Int64Value, scalar::Int64, i64, "google.protobuf.Int64Value"
);
wrapper!(
    /// `google.protobuf.UInt64Value`
    UInt64Value, scalar::UInt64, u64, "google.protobuf.UInt64Value"
);
wrapper!(
    /// `google.protobuf.Int32Value`
    Int32Value, scalar::Int32, i32, "google.protobuf.Int32Value"
);
wrapper!(
    /// `google.protobuf.UInt32Value`
    UInt32Value, scalar::UInt32, u32, "google.protobuf.UInt32Value"
);
wrapper!(
    /// `google.protobuf.BoolValue`
    BoolValue, scalar::Bool, bool, "google.protobuf.BoolValue"
);
wrapper!(
    /// `google.protobuf.StringValue`
    StringValue, scalar::Str, String, "google.protobuf.StringValue"
);
wrapper!(
    /// `google.protobuf.BytesValue`
    BytesValue, scalar::Bytes, Vec<u8>, "google.protobuf.BytesValue"
);
