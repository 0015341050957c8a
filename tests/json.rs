mod support;

use protospec::{JsonOptions, Message, OpenEnum};
use serde_json::{json, Value as Json};
use support::*;

fn sample_person() -> Person {
    Person {
        name: "Ada".to_owned(),
        id: 170_141,
        email: Some("ada@example.com".to_owned()),
        home_address: Some(Address {
            street: "Main".to_owned(),
            number: 42,
            planet: Planet::Mars,
        }),
        nicknames: vec!["countess".to_owned()],
        scores: vec![1, -2, 300],
        attributes: vec![("hair".to_owned(), "dark".to_owned())],
        contact: person::Contact::Pager(7),
    }
}

fn all_option_combinations() -> Vec<JsonOptions> {
    let mut combos = Vec::new();
    for json_names in [true, false] {
        for enum_names in [true, false] {
            for omit_default_values in [true, false] {
                combos.push(JsonOptions {
                    json_names,
                    enum_names,
                    omit_default_values,
                });
            }
        }
    }
    combos
}

#[test]
fn round_trip_across_all_options() {
    for opts in all_option_combinations() {
        let person = sample_person();
        let json = person.to_json(&opts);
        assert_eq!(Person::from_json(&json).unwrap(), person, "opts: {:?}", opts);

        let empty = Person::default();
        let json = empty.to_json(&opts);
        assert_eq!(Person::from_json(&json).unwrap(), empty, "opts: {:?}", opts);
    }
}

#[test]
fn canonical_shape() {
    let json = sample_person().to_json(&JsonOptions::default());
    assert_eq!(
        json,
        json!({
            "name": "Ada",
            "id": "170141",
            "email": "ada@example.com",
            "homeAddress": {"street": "Main", "number": 42, "planet": "MARS"},
            "nicknames": ["countess"],
            "scores": [1, -2, 300],
            "attributes": {"hair": "dark"},
            "pager": 7,
        })
    );
}

#[test]
fn default_omission_elides_everything() {
    let json = Person::default().to_json(&JsonOptions::default());
    assert_eq!(json, json!({}));

    let json = Address::default().to_json(&JsonOptions::default().emit_default_values());
    assert_eq!(json, json!({"street": "", "number": 0, "planet": "EARTH"}));
}

#[test]
fn proto_names_and_integer_enums() {
    let opts = JsonOptions::default().proto_names().enum_values();
    let json = sample_person().to_json(&opts);
    let obj = json.as_object().unwrap();
    assert!(obj.contains_key("home_address"));
    assert_eq!(
        obj["home_address"].as_object().unwrap()["planet"],
        Json::from(1)
    );
}

#[test]
fn parser_accepts_either_naming() {
    let person = Person::from_json(&json!({"homeAddress": {"number": 5}})).unwrap();
    assert_eq!(person.home_address.as_ref().unwrap().number, 5);

    let person = Person::from_json(&json!({"home_address": {"number": 5}})).unwrap();
    assert_eq!(person.home_address.as_ref().unwrap().number, 5);
}

#[test]
fn parser_accepts_either_enum_form() {
    let address = Address::from_json(&json!({"planet": "VENUS"})).unwrap();
    assert_eq!(address.planet, Planet::Venus);

    let address = Address::from_json(&json!({"planet": 2})).unwrap();
    assert_eq!(address.planet, Planet::Venus);

    assert!(Address::from_json(&json!({"planet": "PLUTO"})).is_err());
}

#[test]
fn open_enums_carry_undeclared_values_as_integers() {
    let observation = Observation {
        planet: OpenEnum::Unknown(9),
    };
    let json = observation.to_json(&JsonOptions::default());
    assert_eq!(json, json!({"planet": 9}));
    assert_eq!(Observation::from_json(&json).unwrap(), observation);

    let known = Observation {
        planet: OpenEnum::Known(Planet::Mars),
    };
    assert_eq!(
        known.to_json(&JsonOptions::default()),
        json!({"planet": "MARS"})
    );
    assert_eq!(
        Observation::from_json(&json!({"planet": "MARS"})).unwrap(),
        known
    );
}

#[test]
fn sixty_four_bit_ints_accept_both_forms() {
    let person = Person::from_json(&json!({"id": "9007199254740993"})).unwrap();
    assert_eq!(person.id, 9_007_199_254_740_993);

    let person = Person::from_json(&json!({"id": 42})).unwrap();
    assert_eq!(person.id, 42);
}

#[test]
fn unknown_keys_are_ignored() {
    let person = Person::from_json(&json!({"name": "x", "definitelyNotAField": [1, 2]})).unwrap();
    assert_eq!(person.name, "x");
}

#[test]
fn null_reads_as_default() {
    let person = Person::from_json(&json!({"name": null, "email": null})).unwrap();
    assert_eq!(person.name, "");
    assert_eq!(person.email, None);
}

#[test]
fn oneof_round_trips_in_json() {
    for contact in [
        person::Contact::NotSet,
        person::Contact::Phone("+44".to_owned()),
        person::Contact::Pager(9),
    ] {
        let person = Person {
            contact: contact.clone(),
            ..Person::default()
        };
        let json = person.to_json(&JsonOptions::default());
        assert_eq!(Person::from_json(&json).unwrap().contact, contact);
    }
}

#[test]
fn proto2_messages_round_trip() {
    let unit = LegacyUnit {
        serial: "X-1".to_owned(),
        label: "unit".to_owned(),
        extensions: Default::default(),
    };
    let json = unit.to_json(&JsonOptions::default());
    assert_eq!(json, json!({"serial": "X-1", "label": "unit"}));
    assert_eq!(LegacyUnit::from_json(&json).unwrap(), unit);

    let err = LegacyUnit::from_json(&json!({"label": "x"})).unwrap_err();
    assert!(matches!(
        err.kind(),
        protospec::DecodeErrorKind::RequiredFieldMissing { .. }
    ));
}
