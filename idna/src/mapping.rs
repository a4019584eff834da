// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A from-scratch, non-table-driven approximation of [UTS #46]'s
//! domain-to-ASCII / domain-to-Unicode mapping, sufficient for the
//! WHATWG URL Standard's host parser.
//!
//! [UTS #46]: http://www.unicode.org/reports/tr46/

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use unicode_bidi::{bidi_class, BidiClass};
use unicode_normalization::UnicodeNormalization;

use crate::punycode;
use crate::Errors;

const MAX_LABEL_LENGTH: usize = 63;
const MAX_DOMAIN_LENGTH: usize = 253;

fn is_forbidden_std3_ascii(c: char) -> bool {
    // UTS 46's ASCII deny list (UseSTD3ASCIIRules), excluding the hyphen
    // and alphanumerics that a domain label is always allowed to contain.
    matches!(c,
        '\u{0}'..='\u{2c}'
        | '\u{2e}'..='\u{2f}'
        | '\u{3a}'..='\u{40}'
        | '\u{5b}'..='\u{60}'
        | '\u{7b}'..='\u{7f}')
}

fn case_fold_label(label: &str) -> String {
    label.chars().flat_map(|c| c.to_lowercase()).collect()
}

fn starts_with_xn_dash_dash(label: &str) -> bool {
    label.len() >= 4 && label.as_bytes()[..4].eq_ignore_ascii_case(b"xn--")
}

fn is_bidi_label(label: &str) -> bool {
    label.chars().any(|c| {
        matches!(
            bidi_class(c),
            BidiClass::R | BidiClass::AL | BidiClass::AN
        )
    })
}

/// RFC 5893, simplified to first/last character class checks.
fn check_bidi_rule(label: &str) -> bool {
    let mut chars = label.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return true,
    };
    if !matches!(bidi_class(first), BidiClass::L | BidiClass::R | BidiClass::AL) {
        return false;
    }
    let last = label.chars().next_back().unwrap();
    matches!(
        bidi_class(last),
        BidiClass::L | BidiClass::EN | BidiClass::R | BidiClass::AL | BidiClass::AN
    )
}

/// Punycode-decode a single `xn--`-prefixed label and confirm it is
/// canonical (re-encoding it reproduces the same ASCII label), so that
/// malformed or non-canonical Punycode is rejected rather than silently
/// passed through.
fn decode_xn_label(label: &str) -> Result<String, Errors> {
    let suffix = &label[4..];
    if suffix.is_empty() {
        return Err(Errors::default());
    }
    let decoded = punycode::decode_to_string(suffix).ok_or_else(Errors::default)?;
    if decoded.is_empty() {
        return Err(Errors::default());
    }
    let reencoded = punycode::encode_str(&decoded).ok_or_else(Errors::default)?;
    if !reencoded.eq_ignore_ascii_case(suffix) {
        return Err(Errors::default());
    }
    Ok(decoded)
}

fn ascii_label(label: &str, be_strict: bool) -> Result<String, Errors> {
    if be_strict {
        for c in label.chars() {
            if is_forbidden_std3_ascii(c) {
                return Err(Errors::default());
            }
        }
    }
    Ok(label.to_string())
}

/// The [domain to ASCII](https://url.spec.whatwg.org/#concept-domain-to-ascii) algorithm.
pub fn to_ascii(domain: &str, be_strict: bool) -> Result<String, Errors> {
    if domain.is_empty() {
        return Ok(String::new());
    }
    let has_trailing_dot = domain.ends_with('.');
    let labels: Vec<&str> = domain.split('.').collect();
    let label_count = labels.len();

    let mut unicode_labels = Vec::with_capacity(label_count);
    for (i, raw_label) in labels.iter().enumerate() {
        let is_trailing_root = has_trailing_dot && i == label_count - 1;
        if raw_label.is_empty() {
            if is_trailing_root {
                unicode_labels.push(String::new());
                continue;
            }
            return Err(Errors::default());
        }
        let folded = case_fold_label(raw_label);
        let normalized = folded.nfc().collect::<String>();
        let label = if starts_with_xn_dash_dash(&normalized) {
            decode_xn_label(&normalized)?
        } else {
            normalized
        };
        unicode_labels.push(label);
    }

    if unicode_labels.iter().any(|l| is_bidi_label(l)) {
        for label in &unicode_labels {
            if label.is_empty() {
                continue;
            }
            if !check_bidi_rule(label) {
                return Err(Errors::default());
            }
        }
    }

    let mut ascii_labels = Vec::with_capacity(label_count);
    for label in &unicode_labels {
        if label.is_empty() {
            ascii_labels.push(String::new());
            continue;
        }
        let encoded = if label.is_ascii() {
            ascii_label(label, be_strict)?
        } else {
            let mut out = String::from("xn--");
            out.push_str(&punycode::encode_str(label).ok_or_else(Errors::default)?);
            out
        };
        if be_strict && (encoded.is_empty() || encoded.len() > MAX_LABEL_LENGTH) {
            return Err(Errors::default());
        }
        ascii_labels.push(encoded);
    }

    let result = ascii_labels.join(".");
    if be_strict {
        let length_to_check = if has_trailing_dot {
            result.len().saturating_sub(1)
        } else {
            result.len()
        };
        if length_to_check > MAX_DOMAIN_LENGTH {
            return Err(Errors::default());
        }
    }
    Ok(result)
}

/// The [domain to Unicode](https://url.spec.whatwg.org/#concept-domain-to-unicode) algorithm.
pub fn to_unicode(domain: &str) -> (String, Result<(), Errors>) {
    let mut error = Ok(());
    let labels: Vec<String> = domain
        .split('.')
        .map(|raw_label| {
            if starts_with_xn_dash_dash(raw_label) {
                match decode_xn_label(&case_fold_label(raw_label)) {
                    Ok(decoded) => decoded,
                    Err(_) => {
                        error = Err(Errors::default());
                        raw_label.to_string()
                    }
                }
            } else {
                case_fold_label(raw_label)
            }
        })
        .collect();
    (labels.join("."), error)
}
