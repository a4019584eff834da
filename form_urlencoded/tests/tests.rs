// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::borrow::Cow;

#[test]
fn parse_drops_empty_pairs_and_splits_at_first_equals() {
    let pairs: Vec<_> = form_urlencoded::parse(b"a=1&&b=2=2&c").collect();
    assert_eq!(
        pairs,
        vec![
            (Cow::Borrowed("a"), Cow::Borrowed("1")),
            (Cow::Borrowed("b"), Cow::Borrowed("2=2")),
            (Cow::Borrowed("c"), Cow::Borrowed("")),
        ]
    );
}

#[test]
fn parse_replaces_plus_with_space_and_percent_decodes() {
    let pairs: Vec<_> = form_urlencoded::parse(b"na+me=%2Bvalue").collect();
    assert_eq!(pairs, vec![(Cow::Borrowed("na me"), Cow::Borrowed("+value"))]);
}

#[test]
fn byte_serialize_uses_plus_for_space_and_percent_encodes_the_rest() {
    let encoded: String = form_urlencoded::byte_serialize("a b+c#d".as_bytes()).collect();
    assert_eq!(encoded, "a+b%2Bc%23d");
}

#[test]
fn serializer_emits_a_trailing_equals_with_no_value() {
    let s = form_urlencoded::Serializer::new(String::new())
        .append_pair("a", "")
        .finish();
    assert_eq!(s, "a=");
}

#[test]
fn serializer_joins_pairs_with_ampersand() {
    let s = form_urlencoded::Serializer::new(String::new())
        .append_pair("a", "1")
        .append_pair("b", "2 two")
        .finish();
    assert_eq!(s, "a=1&b=2+two");
}

#[test]
fn serializer_append_key_only_omits_the_equals_sign() {
    let s = form_urlencoded::Serializer::new(String::new())
        .append_key_only("flag")
        .finish();
    assert_eq!(s, "flag");
}

#[test]
fn serializer_clear_truncates_back_to_the_start_position() {
    let mut target = String::from("prefix&");
    let start = target.len();
    let mut serializer = form_urlencoded::Serializer::for_suffix(&mut target, start);
    serializer.append_pair("a", "1");
    serializer.clear();
    serializer.append_pair("b", "2");
    assert_eq!(*serializer.finish(), "prefix&b=2");
}

#[test]
fn parse_then_serialize_round_trips() {
    let input = "k=5&k=1&j=2";
    let serialized = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form_urlencoded::parse(input.as_bytes()))
        .finish();
    assert_eq!(serialized, input);
}

#[test]
fn extend_keys_only_serializes_bare_names() {
    let s = form_urlencoded::Serializer::new(String::new())
        .extend_keys_only(["a", "b c"])
        .finish();
    assert_eq!(s, "a&b+c");
}

#[test]
fn sort_is_stable_on_equal_keys() {
    let mut target = String::new();
    let mut serializer = form_urlencoded::Serializer::new(&mut target);
    serializer.extend_pairs(form_urlencoded::parse(b"k=5&k=1&j=2"));
    serializer.sort();
    assert_eq!(*serializer.finish(), "j=2&k=5&k=1");
}

#[test]
fn sort_preserves_a_prefix_before_the_start_position() {
    let mut target = String::from("prefix");
    let start = target.len();
    let mut serializer = form_urlencoded::Serializer::for_suffix(&mut target, start);
    serializer.extend_pairs(form_urlencoded::parse(b"b=2&a=1"));
    serializer.sort();
    assert_eq!(*serializer.finish(), "prefixa=1&b=2");
}
