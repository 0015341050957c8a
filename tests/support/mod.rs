//! Example messages written the way generated code drives the runtime.
#![allow(dead_code)]

use std::ops::RangeInclusive;

use protospec::scalar::Scalar as _;
use protospec::{
    decode, encode, json, merge, scalar, sentinel, DecodeContext, DecodeError, Extension,
    ExtensionSet, JsonOptions, Message, Oneof, OpenEnum, ProtoEnum, Reader, WireField, Writer,
};
use serde_json::{Map, Value as Json};

/// `example.Planet`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Planet {
    #[default]
    Earth = 0,
    Mars = 1,
    Venus = 2,
}

impl ProtoEnum for Planet {
    fn default_value() -> Planet {
        Planet::Earth
    }

    fn from_i32(value: i32) -> Result<Planet, DecodeError> {
        match value {
            0 => Ok(Planet::Earth),
            1 => Ok(Planet::Mars),
            2 => Ok(Planet::Venus),
            other => Err(Self::unknown(other)),
        }
    }

    fn to_i32(self) -> i32 {
        self as i32
    }

    fn from_name(name: &str) -> Option<Planet> {
        match name {
            "EARTH" => Some(Planet::Earth),
            "MARS" => Some(Planet::Mars),
            "VENUS" => Some(Planet::Venus),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Planet::Earth => "EARTH",
            Planet::Mars => "MARS",
            Planet::Venus => "VENUS",
        }
    }
}

/// `example.Address` (proto3)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub number: i32,
    pub planet: Planet,
}

impl Message for Address {
    const NAME: &'static str = "example.Address";

    fn default_value() -> Address {
        Address::default()
    }

    fn encode_fields(&self, w: &mut Writer) {
        encode::basic::<scalar::Str>(w, 1, &self.street);
        encode::basic::<scalar::Int32>(w, 2, &self.number);
        encode::basic::<scalar::Enumeration<Planet>>(w, 3, &self.planet);
    }

    fn decode_fields(reader: &mut Reader<'_>, ctx: DecodeContext) -> Result<Address, DecodeError> {
        let mut street = sentinel::basic::<scalar::Str>(1);
        let mut number = sentinel::basic::<scalar::Int32>(2);
        let mut planet = sentinel::basic::<scalar::Enumeration<Planet>>(3);
        decode::run(reader, ctx, &mut [&mut street, &mut number, &mut planet])?;
        Ok(Address {
            street: street.finish(),
            number: number.finish(),
            planet: planet.finish(),
        })
    }

    fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json> {
        let mut obj = Map::new();
        json::ser::emit::<scalar::Str>(&mut obj, "street", "street", &self.street, opts);
        json::ser::emit::<scalar::Int32>(&mut obj, "number", "number", &self.number, opts);
        json::ser::emit::<scalar::Enumeration<Planet>>(
            &mut obj, "planet", "planet", &self.planet, opts,
        );
        obj
    }

    fn from_json_fields(obj: &Map<String, Json>) -> Result<Address, DecodeError> {
        Ok(Address {
            street: json::de::parse::<scalar::Str>(obj, "street", "street")?,
            number: json::de::parse::<scalar::Int32>(obj, "number", "number")?,
            planet: json::de::parse::<scalar::Enumeration<Planet>>(obj, "planet", "planet")?,
        })
    }

    fn merge_from(&mut self, other: Address) {
        merge::scalar::<scalar::Str>(&mut self.street, other.street);
        merge::scalar::<scalar::Int32>(&mut self.number, other.number);
        merge::scalar::<scalar::Enumeration<Planet>>(&mut self.planet, other.planet);
    }
}

pub mod person {
    use super::*;

    /// The `contact` oneof of `example.Person`.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub enum Contact {
        #[default]
        NotSet,
        /// Tag 8.
        Phone(String),
        /// Tag 9.
        Pager(i32),
    }

    impl Oneof for Contact {
        const TAGS: &'static [u32] = &[8, 9];

        fn not_set() -> Contact {
            Contact::NotSet
        }

        fn is_set(&self) -> bool {
            !matches!(self, Contact::NotSet)
        }

        fn decode_variant(
            tag: u32,
            field: WireField<'_>,
            ctx: DecodeContext,
        ) -> Result<Contact, DecodeError> {
            Ok(match tag {
                8 => Contact::Phone(scalar::Str::decode(tag, field, ctx)?),
                9 => Contact::Pager(scalar::Int32::decode(tag, field, ctx)?),
                _ => Contact::NotSet,
            })
        }

        fn encode(&self, w: &mut Writer) {
            match self {
                Contact::NotSet => {}
                Contact::Phone(v) => encode::field::<scalar::Str>(w, 8, v),
                Contact::Pager(v) => encode::field::<scalar::Int32>(w, 9, v),
            }
        }

        fn insert_json(&self, obj: &mut Map<String, Json>, opts: &JsonOptions) {
            match self {
                Contact::NotSet => {}
                Contact::Phone(v) => {
                    obj.insert("phone".to_owned(), scalar::Str::to_json(v, opts));
                }
                Contact::Pager(v) => {
                    obj.insert("pager".to_owned(), scalar::Int32::to_json(v, opts));
                }
            }
        }
    }
}

/// `example.Person` (proto3): one of every compound shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub id: i64,
    pub email: Option<String>,
    pub home_address: Option<Address>,
    pub nicknames: Vec<String>,
    pub scores: Vec<i32>,
    pub attributes: Vec<(String, String)>,
    pub contact: person::Contact,
}

impl Message for Person {
    const NAME: &'static str = "example.Person";

    fn default_value() -> Person {
        Person::default()
    }

    fn encode_fields(&self, w: &mut Writer) {
        encode::basic::<scalar::Str>(w, 1, &self.name);
        encode::basic::<scalar::Int64>(w, 2, &self.id);
        encode::optional::<scalar::Str>(w, 3, &self.email);
        encode::optional::<scalar::Embedded<Address>>(w, 4, &self.home_address);
        encode::repeated::<scalar::Str>(w, 5, &self.nicknames, false);
        encode::repeated::<scalar::Int32>(w, 6, &self.scores, true);
        encode::map::<scalar::Str, scalar::Str>(w, 7, &self.attributes);
        encode::oneof(w, &self.contact);
    }

    fn decode_fields(reader: &mut Reader<'_>, ctx: DecodeContext) -> Result<Person, DecodeError> {
        let mut name = sentinel::basic::<scalar::Str>(1);
        let mut id = sentinel::basic::<scalar::Int64>(2);
        let mut email = sentinel::optional::<scalar::Str>(3);
        let mut home_address = sentinel::optional::<scalar::Embedded<Address>>(4);
        let mut nicknames = sentinel::repeated::<scalar::Str>(5);
        let mut scores = sentinel::repeated::<scalar::Int32>(6);
        let mut attributes = sentinel::map::<scalar::Str, scalar::Str>(7);
        let mut contact = sentinel::oneof::<person::Contact>();
        decode::run(
            reader,
            ctx,
            &mut [
                &mut name,
                &mut id,
                &mut email,
                &mut home_address,
                &mut nicknames,
                &mut scores,
                &mut attributes,
                &mut contact,
            ],
        )?;
        Ok(Person {
            name: name.finish(),
            id: id.finish(),
            email: email.finish(),
            home_address: home_address.finish(),
            nicknames: nicknames.finish(),
            scores: scores.finish(),
            attributes: attributes.finish(),
            contact: contact.finish(),
        })
    }

    fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json> {
        let mut obj = Map::new();
        json::ser::emit::<scalar::Str>(&mut obj, "name", "name", &self.name, opts);
        json::ser::emit::<scalar::Int64>(&mut obj, "id", "id", &self.id, opts);
        json::ser::emit_optional::<scalar::Str>(&mut obj, "email", "email", &self.email, opts);
        json::ser::emit_optional::<scalar::Embedded<Address>>(
            &mut obj,
            "home_address",
            "homeAddress",
            &self.home_address,
            opts,
        );
        json::ser::emit_repeated::<scalar::Str>(
            &mut obj,
            "nicknames",
            "nicknames",
            &self.nicknames,
            opts,
        );
        json::ser::emit_repeated::<scalar::Int32>(&mut obj, "scores", "scores", &self.scores, opts);
        json::ser::emit_map::<scalar::Str, scalar::Str>(
            &mut obj,
            "attributes",
            "attributes",
            &self.attributes,
            opts,
        );
        json::ser::emit_oneof(&mut obj, &self.contact, opts);
        obj
    }

    fn from_json_fields(obj: &Map<String, Json>) -> Result<Person, DecodeError> {
        let contact = if let Some(v) = json::de::get(obj, "phone", "phone") {
            person::Contact::Phone(scalar::Str::from_json(v)?)
        } else if let Some(v) = json::de::get(obj, "pager", "pager") {
            person::Contact::Pager(scalar::Int32::from_json(v)?)
        } else {
            person::Contact::NotSet
        };
        Ok(Person {
            name: json::de::parse::<scalar::Str>(obj, "name", "name")?,
            id: json::de::parse::<scalar::Int64>(obj, "id", "id")?,
            email: json::de::parse_optional::<scalar::Str>(obj, "email", "email")?,
            home_address: json::de::parse_optional::<scalar::Embedded<Address>>(
                obj,
                "home_address",
                "homeAddress",
            )?,
            nicknames: json::de::parse_repeated::<scalar::Str>(obj, "nicknames", "nicknames")?,
            scores: json::de::parse_repeated::<scalar::Int32>(obj, "scores", "scores")?,
            attributes: json::de::parse_map::<scalar::Str, scalar::Str>(
                obj,
                "attributes",
                "attributes",
            )?,
            contact,
        })
    }

    fn merge_from(&mut self, other: Person) {
        merge::scalar::<scalar::Str>(&mut self.name, other.name);
        merge::scalar::<scalar::Int64>(&mut self.id, other.id);
        merge::optional(&mut self.email, other.email);
        merge::message(&mut self.home_address, other.home_address);
        merge::repeated(&mut self.nicknames, other.nicknames);
        merge::repeated(&mut self.scores, other.scores);
        merge::map(&mut self.attributes, other.attributes);
        merge::oneof(&mut self.contact, other.contact);
    }
}

/// `example.Observation` (proto3): an enum field decoded through the open
/// path, so integers added by a newer schema survive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observation {
    pub planet: OpenEnum<Planet>,
}

impl Message for Observation {
    const NAME: &'static str = "example.Observation";

    fn default_value() -> Observation {
        Observation::default()
    }

    fn encode_fields(&self, w: &mut Writer) {
        encode::basic::<scalar::Enumeration<OpenEnum<Planet>>>(w, 1, &self.planet);
    }

    fn decode_fields(
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<Observation, DecodeError> {
        let mut planet = sentinel::basic::<scalar::Enumeration<OpenEnum<Planet>>>(1);
        decode::run(reader, ctx, &mut [&mut planet])?;
        Ok(Observation {
            planet: planet.finish(),
        })
    }

    fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json> {
        let mut obj = Map::new();
        json::ser::emit::<scalar::Enumeration<OpenEnum<Planet>>>(
            &mut obj, "planet", "planet", &self.planet, opts,
        );
        obj
    }

    fn from_json_fields(obj: &Map<String, Json>) -> Result<Observation, DecodeError> {
        Ok(Observation {
            planet: json::de::parse::<scalar::Enumeration<OpenEnum<Planet>>>(
                obj, "planet", "planet",
            )?,
        })
    }

    fn merge_from(&mut self, other: Observation) {
        merge::scalar::<scalar::Enumeration<OpenEnum<Planet>>>(&mut self.planet, other.planet);
    }
}

/// The default of `example.LegacyUnit.label`.
pub const LEGACY_UNIT_LABEL_DEFAULT: &str = "unit";

/// Extension ranges declared by `example.LegacyUnit`.
pub const LEGACY_UNIT_EXTENSION_RANGES: &[RangeInclusive<u32>] = &[100..=199];

/// `extend LegacyUnit { optional uint32 squadron = 150; }`
pub const SQUADRON: Extension<scalar::UInt32> = Extension::new(150);

/// `example.LegacyUnit` (proto2): a required field, a defaulted field, and
/// an extension range.
#[derive(Clone, Debug, PartialEq)]
pub struct LegacyUnit {
    pub serial: String,
    pub label: String,
    pub extensions: ExtensionSet,
}

impl Default for LegacyUnit {
    fn default() -> LegacyUnit {
        LegacyUnit {
            serial: String::new(),
            label: LEGACY_UNIT_LABEL_DEFAULT.to_owned(),
            extensions: ExtensionSet::new(),
        }
    }
}

impl Message for LegacyUnit {
    const NAME: &'static str = "example.LegacyUnit";

    fn default_value() -> LegacyUnit {
        LegacyUnit::default()
    }

    fn encode_fields(&self, w: &mut Writer) {
        encode::basic_always::<scalar::Str>(w, 1, &self.serial);
        encode::basic_always::<scalar::Str>(w, 2, &self.label);
        self.extensions.encode(w);
    }

    fn decode_fields(
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<LegacyUnit, DecodeError> {
        let mut serial = sentinel::required::<scalar::Str>(1, "serial");
        let mut label =
            sentinel::basic_with_default::<scalar::Str>(2, LEGACY_UNIT_LABEL_DEFAULT.to_owned());
        let mut extensions = ExtensionSet::new();
        decode::run_extensible(
            reader,
            ctx,
            &mut [&mut serial, &mut label],
            LEGACY_UNIT_EXTENSION_RANGES,
            &mut extensions,
        )?;
        Ok(LegacyUnit {
            serial: serial.finish()?,
            label: label.finish(),
            extensions,
        })
    }

    fn json_fields(&self, opts: &JsonOptions) -> Map<String, Json> {
        let mut obj = Map::new();
        json::ser::emit_always::<scalar::Str>(&mut obj, "serial", "serial", &self.serial, opts);
        json::ser::emit_always::<scalar::Str>(&mut obj, "label", "label", &self.label, opts);
        obj
    }

    fn from_json_fields(obj: &Map<String, Json>) -> Result<LegacyUnit, DecodeError> {
        let label = match json::de::get(obj, "label", "label") {
            None | Some(Json::Null) => LEGACY_UNIT_LABEL_DEFAULT.to_owned(),
            Some(v) => scalar::Str::from_json(v)?,
        };
        Ok(LegacyUnit {
            serial: json::de::parse_required::<scalar::Str>(obj, "serial", "serial", 1)?,
            label,
            extensions: ExtensionSet::new(),
        })
    }

    fn merge_from(&mut self, other: LegacyUnit) {
        merge::required(&mut self.serial, other.serial);
        if other.label != LEGACY_UNIT_LABEL_DEFAULT {
            self.label = other.label;
        }
        for (tag, field) in other.extensions {
            self.extensions.push(tag, field);
        }
    }
}
