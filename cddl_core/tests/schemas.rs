/***************************************************************************************************
 * Copyright (c) 2019-2021 Jeremy O'Donoghue. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
//! End-to-end parse/normalize checks over whole schemas, as opposed to the unit tests colocated
//! with each stage.

use cddl_core::node::Kind;
use cddl_core::{parse_cddl, CddlError};

#[test]
fn address_book_schema_round_trips_through_normalization() {
    let schema = r#"
        address-book = [* person]
        person = {
            name: tstr,
            age: uint,
            ? nickname: tstr,
            emails: [* tstr],
            address: address,
        }
        address = {
            street: tstr,
            city: tstr,
            zip: uint .size 2,
        }
    "#;
    let graph = parse_cddl(schema).unwrap();

    let person = graph.resolve("person").unwrap();
    assert_eq!(graph.get(person).kind, Kind::Map);
    assert_eq!(graph.get(person).children.len(), 5);

    let address = graph.resolve("address").unwrap();
    let zip = graph.get(address).children[2];
    assert_eq!(graph.get(zip).size, Some(2));
}

#[test]
fn protocol_message_schema_handles_unions_and_tags() {
    let schema = r#"
        message = request / response
        request = { id: uint, method: tstr, params: [* any] }
        response = #6.55799({ id: uint, result: any })
    "#;
    let graph = parse_cddl(schema).unwrap();
    let message = graph.resolve("message").unwrap();
    assert_eq!(graph.get(message).kind, Kind::Union);
    assert_eq!(graph.get(message).children.len(), 2);

    let response = graph.resolve("response").unwrap();
    assert_eq!(graph.get(response).tags, vec![55799]);
}

#[test]
fn rejects_schema_with_union_of_any_and_other_alternatives() {
    let err = parse_cddl("x = any / tstr\n").unwrap_err();
    assert!(matches!(err, CddlError::Validation(_)));
}

#[test]
fn control_group_is_not_exposed_as_a_root_type() {
    let schema = "perms = &( read: 0, write: 1, execute: 2 )\nmode = uint .bits perms\n";
    let graph = parse_cddl(schema).unwrap();
    assert!(graph.resolve("perms").is_none());
    assert!(graph.control_groups.contains_key("perms"));
    let mode = graph.resolve("mode").unwrap();
    assert_eq!(graph.get(mode).bits.as_deref(), Some("perms"));
}

#[test]
fn rejects_duplicate_rule_definitions() {
    let err = parse_cddl("dup = uint\ndup = tstr\n").unwrap_err();
    assert!(matches!(err, CddlError::Validation(_)));
}
