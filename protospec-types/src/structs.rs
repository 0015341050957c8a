//! `google.protobuf.Struct` and friends: the dynamically-typed JSON value
//! messages.

use protospec::scalar::Scalar as _;
use protospec::{Oneof, ProtoEnum, WireField};

use super::*;

/// `google.protobuf.NullValue`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NullValue {
    #[default]
    NullValue = 0,
}

impl ProtoEnum for NullValue {
    fn default_value() -> NullValue {
        NullValue::NullValue
    }

    fn from_i32(value: i32) -> Result<NullValue, DecodeError> {
        match value {
            0 => Ok(NullValue::NullValue),
            other => Err(Self::unknown(other)),
        }
    }

    fn to_i32(self) -> i32 {
        self as i32
    }

    fn from_name(name: &str) -> Option<NullValue> {
        match name {
            "NULL_VALUE" => Some(NullValue::NullValue),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        "NULL_VALUE"
    }

    /// The canonical JSON form of `NullValue` is `null`, not the name.
    fn to_json(self, _opts: &JsonOptions) -> Json {
        Json::Null
    }

    fn from_json(value: &Json) -> Result<NullValue, DecodeError> {
        match value {
            Json::Null => Ok(NullValue::NullValue),
            Json::String(s) if s == "NULL_VALUE" => Ok(NullValue::NullValue),
            Json::Number(n) if n.as_i64() == Some(0) => Ok(NullValue::NullValue),
            _ => Err(DecodeError::illegal_value("expected null")),
        }
    }
}

/// `google.protobuf.Struct`
///
/// A map of dynamically-typed values, keeping wire order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Struct {
    pub fields: Vec<(String, Value)>,
}

impl Message for Struct {
    const NAME: &'static str = "google.protobuf.Struct";

    fn default_value() -> Struct {
        Struct::default()
    }

    fn encode_fields(&self, w: &mut Writer) {
        encode::map::<scalar::Str, scalar::Embedded<Value>>(w, 1, &self.fields);
    }

    fn decode_fields(reader: &mut Reader<'_>, ctx: DecodeContext) -> Result<Struct, DecodeError> {
        let mut fields = sentinel::map::<scalar::Str, scalar::Embedded<Value>>(1);
        decode::run(reader, ctx, &mut [&mut fields])?;
        Ok(Struct {
            fields: fields.finish(),
        })
    }

    fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json> {
        let mut obj = Map::new();
        json::ser::emit_map::<scalar::Str, scalar::Embedded<Value>>(
            &mut obj,
            "fields",
            "fields",
            &self.fields,
            opts,
        );
        obj
    }

    fn from_json_fields(obj: &Map<String, Json>) -> Result<Struct, DecodeError> {
        Ok(Struct {
            fields: json::de::parse_map::<scalar::Str, scalar::Embedded<Value>>(
                obj, "fields", "fields",
            )?,
        })
    }

    fn merge_from(&mut self, other: Struct) {
        merge::map(&mut self.fields, other.fields);
    }
}

/// `google.protobuf.Value`
///
/// A dynamically-typed value: exactly one of the kinds below, or nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Value {
    pub kind: value::Kind,
}

pub mod value {
    use super::*;

    /// The kind of a [`Value`](super::Value).
    #[derive(Clone, Debug, Default, PartialEq)]
    pub enum Kind {
        #[default]
        NotSet,
        NullValue(super::NullValue),
        NumberValue(f64),
        StringValue(String),
        BoolValue(bool),
        StructValue(super::Struct),
        ListValue(super::ListValue),
    }

    impl Oneof for Kind {
        const TAGS: &'static [u32] = &[1, 2, 3, 4, 5, 6];

        fn not_set() -> Kind {
            Kind::NotSet
        }

        fn is_set(&self) -> bool {
            !matches!(self, Kind::NotSet)
        }

        fn decode_variant(
            tag: u32,
            field: WireField<'_>,
            ctx: DecodeContext,
        ) -> Result<Kind, DecodeError> {
            Ok(match tag {
                1 => Kind::NullValue(scalar::Enumeration::<super::NullValue>::decode(
                    tag, field, ctx,
                )?),
                2 => Kind::NumberValue(scalar::Double::decode(tag, field, ctx)?),
                3 => Kind::StringValue(scalar::Str::decode(tag, field, ctx)?),
                4 => Kind::BoolValue(scalar::Bool::decode(tag, field, ctx)?),
                5 => Kind::StructValue(scalar::Embedded::<super::Struct>::decode(tag, field, ctx)?),
                6 => Kind::ListValue(scalar::Embedded::<super::ListValue>::decode(
                    tag, field, ctx,
                )?),
                _ => Kind::NotSet,
            })
        }

        fn encode(&self, w: &mut Writer) {
            match self {
                Kind::NotSet => {}
                Kind::NullValue(v) => {
                    encode::field::<scalar::Enumeration<super::NullValue>>(w, 1, v)
                }
                Kind::NumberValue(v) => encode::field::<scalar::Double>(w, 2, v),
                Kind::StringValue(v) => encode::field::<scalar::Str>(w, 3, v),
                Kind::BoolValue(v) => encode::field::<scalar::Bool>(w, 4, v),
                Kind::StructValue(v) => encode::field::<scalar::Embedded<super::Struct>>(w, 5, v),
                Kind::ListValue(v) => encode::field::<scalar::Embedded<super::ListValue>>(w, 6, v),
            }
        }

        fn insert_json(&self, obj: &mut Map<String, Json>, opts: &JsonOptions) {
            let key = |name: &'static str, json_name: &'static str| {
                if opts.json_names { json_name } else { name }.to_owned()
            };
            match self {
                Kind::NotSet => {}
                Kind::NullValue(v) => {
                    obj.insert(key("null_value", "nullValue"), v.to_json(opts));
                }
                Kind::NumberValue(v) => {
                    obj.insert(
                        key("number_value", "numberValue"),
                        scalar::Double::to_json(v, opts),
                    );
                }
                Kind::StringValue(v) => {
                    obj.insert(
                        key("string_value", "stringValue"),
                        scalar::Str::to_json(v, opts),
                    );
                }
                Kind::BoolValue(v) => {
                    obj.insert(key("bool_value", "boolValue"), Json::Bool(*v));
                }
                Kind::StructValue(v) => {
                    obj.insert(key("struct_value", "structValue"), v.to_json(opts));
                }
                Kind::ListValue(v) => {
                    obj.insert(key("list_value", "listValue"), v.to_json(opts));
                }
            }
        }
    }
}

impl Message for Value {
    const NAME: &'static str = "google.protobuf.Value";

    fn default_value() -> Value {
        Value::default()
    }

    fn encode_fields(&self, w: &mut Writer) {
        encode::oneof(w, &self.kind);
    }

    fn decode_fields(reader: &mut Reader<'_>, ctx: DecodeContext) -> Result<Value, DecodeError> {
        let mut kind = sentinel::oneof::<value::Kind>();
        decode::run(reader, ctx, &mut [&mut kind])?;
        Ok(Value {
            kind: kind.finish(),
        })
    }

    fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json> {
        let mut obj = Map::new();
        json::ser::emit_oneof(&mut obj, &self.kind, opts);
        obj
    }

    fn from_json_fields(obj: &Map<String, Json>) -> Result<Value, DecodeError> {
        use value::Kind;

        let kind = if let Some(v) = json::de::get(obj, "null_value", "nullValue") {
            Kind::NullValue(NullValue::from_json(v)?)
        } else if let Some(v) = json::de::get(obj, "number_value", "numberValue") {
            Kind::NumberValue(scalar::Double::from_json(v)?)
        } else if let Some(v) = json::de::get(obj, "string_value", "stringValue") {
            Kind::StringValue(scalar::Str::from_json(v)?)
        } else if let Some(v) = json::de::get(obj, "bool_value", "boolValue") {
            Kind::BoolValue(scalar::Bool::from_json(v)?)
        } else if let Some(v) = json::de::get(obj, "struct_value", "structValue") {
            Kind::StructValue(Struct::from_json(v)?)
        } else if let Some(v) = json::de::get(obj, "list_value", "listValue") {
            Kind::ListValue(ListValue::from_json(v)?)
        } else {
            Kind::NotSet
        };
        Ok(Value { kind })
    }

    fn merge_from(&mut self, other: Value) {
        merge::oneof(&mut self.kind, other.kind);
    }
}

/// `google.protobuf.ListValue`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListValue {
    pub values: Vec<Value>,
}

impl Message for ListValue {
    const NAME: &'static str = "google.protobuf.ListValue";

    fn default_value() -> ListValue {
        ListValue::default()
    }

    fn encode_fields(&self, w: &mut Writer) {
        encode::repeated::<scalar::Embedded<Value>>(w, 1, &self.values, false);
    }

    fn decode_fields(
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<ListValue, DecodeError> {
        let mut values = sentinel::repeated::<scalar::Embedded<Value>>(1);
        decode::run(reader, ctx, &mut [&mut values])?;
        Ok(ListValue {
            values: values.finish(),
        })
    }

    fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json> {
        let mut obj = Map::new();
        json::ser::emit_repeated::<scalar::Embedded<Value>>(
            &mut obj, "values", "values", &self.values, opts,
        );
        obj
    }

    fn from_json_fields(obj: &Map<String, Json>) -> Result<ListValue, DecodeError> {
        Ok(ListValue {
            values: json::de::parse_repeated::<scalar::Embedded<Value>>(obj, "values", "values")?,
        })
    }

    fn merge_from(&mut self, other: ListValue) {
        merge::repeated(&mut self.values, other.values);
    }
}
