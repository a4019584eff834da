// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// https://github.com/servo/rust-url/issues/373
#[test]
fn test_punycode_prefix_with_length_check() {
    fn to_ascii(domain: &str) -> Result<String, idna::Errors> {
        idna::domain_to_ascii(domain, true)
    }

    assert!(to_ascii("xn--").is_err());
    assert!(to_ascii("xn---").is_err());
    assert!(to_ascii("xn-----").is_err());
    assert!(to_ascii("xn--.").is_err());
    assert!(to_ascii("xn--...").is_err());
    assert!(to_ascii(".xn--").is_err());
    assert!(to_ascii("...xn--").is_err());
    assert!(to_ascii("xn--.xn--").is_err());
    assert!(to_ascii("xn--.example.org").is_err());
}

/// https://github.com/servo/rust-url/issues/373
#[test]
fn test_punycode_prefix_without_length_check() {
    fn to_ascii(domain: &str) -> Result<String, idna::Errors> {
        idna::domain_to_ascii(domain, false)
    }

    assert!(to_ascii("xn--").is_err());
    assert!(to_ascii("xn---").is_err());
    assert!(to_ascii("xn-----").is_err());
    assert!(to_ascii("xn--.").is_err());
    assert!(to_ascii("xn--...").is_err());
    assert!(to_ascii(".xn--").is_err());
    assert!(to_ascii("...xn--").is_err());
    assert!(to_ascii("xn--.xn--").is_err());
    assert!(to_ascii("xn--.example.org").is_err());
}

#[test]
fn passthrough_for_plain_ascii_domains() {
    assert_eq!(idna::domain_to_ascii("example.org", false).unwrap(), "example.org");
    assert_eq!(idna::domain_to_ascii("EXAMPLE.ORG", false).unwrap(), "example.org");
}

#[test]
fn encodes_non_ascii_labels_with_the_xn_dash_dash_prefix() {
    assert_eq!(
        idna::domain_to_ascii("abc.ابج", false).unwrap(),
        "abc.xn--mgbcm"
    );
    assert_eq!(idna::domain_to_ascii("☕.us", false).unwrap(), "xn--53h.us");
}

#[test]
fn round_trips_already_encoded_labels() {
    assert_eq!(
        idna::domain_to_ascii("xn--mgbcm.xn--mgbcm", false).unwrap(),
        "xn--mgbcm.xn--mgbcm"
    );
    assert_eq!(
        idna::domain_to_ascii("xn--53h.us", false).unwrap(),
        "xn--53h.us"
    );
}

#[test]
fn domain_to_unicode_decodes_xn_dash_dash_labels() {
    let (host, result) = idna::domain_to_unicode("xn--mgbcm.xn--53h.us");
    assert!(result.is_ok());
    assert_eq!(host, "ابج.☕.us");
}

#[test]
fn upper_case_ascii_in_punycode_is_folded_before_decoding() {
    let (host, result) = idna::domain_to_unicode("xn--A-1ga");
    assert!(result.is_ok());
    assert_eq!(host, "aö");
}

#[test]
fn bidi_domain_names_cannot_start_with_a_digit() {
    assert!(idna::domain_to_ascii("0a.\u{5D0}", true).is_err());
}

#[test]
fn non_bidi_arabic_only_labels_are_not_rejected_by_the_bidi_rule() {
    assert_eq!(idna::domain_to_ascii("ابج", true).unwrap(), "xn--mgbcm");
}

#[test]
fn forbidden_std3_ascii_symbols_only_rejected_when_strict() {
    assert!(idna::domain_to_ascii("a_b.com", false).is_ok());
    assert!(idna::domain_to_ascii("a_b.com", true).is_err());
}

#[test]
fn empty_domain_round_trips_to_empty() {
    assert_eq!(idna::domain_to_ascii("", false).unwrap(), "");
    let (host, result) = idna::domain_to_unicode("");
    assert!(result.is_ok());
    assert_eq!(host, "");
}

#[test]
fn trailing_dot_is_preserved_as_the_root_label() {
    assert_eq!(idna::domain_to_ascii("example.org.", false).unwrap(), "example.org.");
}

#[test]
fn overly_long_label_only_rejected_when_strict() {
    let long_label = "a".repeat(64);
    assert!(idna::domain_to_ascii(&long_label, false).is_ok());
    assert!(idna::domain_to_ascii(&long_label, true).is_err());
}
