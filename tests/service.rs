mod support;

use protospec::{Message, Reader, Rpc};
use support::*;

const LOOKUP: Rpc<Person, Address> = Rpc::new("example", "Directory", "Lookup");

#[test]
fn path_is_fully_qualified() {
    assert_eq!(LOOKUP.path(), "/example.Directory/Lookup");

    const BARE: Rpc<Person, Person> = Rpc::new("", "Echo", "Call");
    assert_eq!(BARE.path(), "/Echo/Call");
}

#[test]
fn call_runs_request_and_response_through_the_transport() {
    let request = Person {
        name: "Ada".to_owned(),
        ..Person::default()
    };

    // A transport that decodes the request and answers with its address.
    let transport = |bytes: &[u8]| {
        let person = Person::from_proto(&mut Reader::new(bytes)).unwrap();
        let response = Address {
            street: format!("{} Street", person.name),
            number: 1,
            planet: Planet::Earth,
        };
        response.to_proto().contents().to_vec()
    };

    let response = LOOKUP.call(transport, &request).unwrap();
    assert_eq!(response.street, "Ada Street");
    assert_eq!(response.number, 1);
}

#[test]
fn call_surfaces_decode_errors() {
    let garbage = |_: &[u8]| vec![0x08, 0x80];
    assert!(LOOKUP.call(garbage, &Person::default()).is_err());
}
