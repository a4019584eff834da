// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! URLs use special characters to indicate the parts of the request.
//! For example, a `?` question mark marks the end of a path and the start of a query string.
//! In order for that character to exist inside a path, it needs to be encoded differently.
//!
//! Percent encoding replaces reserved characters with the `%` escape character
//! followed by a byte value as two hexadecimal digits.
//! For example, an ASCII space is replaced with `%20`.
//!
//! When encoding, the set of characters that can (and should) be left alone
//! depends on the context: the path of an URL is not encoded the same as the query string.
//! The `AsciiSet` parameter of [`percent_encode`] and [`utf8_percent_encode`]
//! lets callers configure this.
//!
//! This crate deliberately does not provide many different sets.
//! Users should consider in each case
//! what is the relevant standard that specifies the set of characters to encode,
//! and pass the correct set to, or define their own set with, `AsciiSet` constructors.

#![no_std]

#[cfg(any(test, feature = "alloc"))]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(any(test, feature = "alloc"))]
use alloc::borrow::Cow;
#[cfg(any(test, feature = "alloc"))]
use alloc::string::String;
#[cfg(any(test, feature = "alloc"))]
use alloc::vec::Vec;

use core::fmt;
use core::slice;
use core::str;

/// Represents a set of characters or bytes in the ASCII range.
///
/// This is used in [`percent_encode`] and [`utf8_percent_encode`].
/// This type is a bit-set, stored as a `[bool; 128]`, built with the `add` const method.
///
/// For example,
/// [`CONTROLS`](constant.CONTROLS.html)
/// is defined as:
///
/// ```rust
/// use percent_encoding::{AsciiSet, CONTROLS};
///
/// const EXAMPLE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');
/// ```
///
/// Different characters need to be encoded in different parts of an URL.
/// For example, a literal `?` question mark in a URL's path would indicate
/// the start of the query string.
/// A question mark meant to be part of the path therefore needs to be percent-encoded.
/// In the query string however, a question mark does not have any special meaning
/// and does not need to be percent-encoded.
///
/// A few sets are defined in this crate according to parts of the URL standard,
/// such as [`CONTROLS`], [`FRAGMENT`], [`PATH`], and [`USERINFO`].
/// Users of this crate may need to define other sets for other parts of a URL
/// or for other, non-URL syntaxes.
#[derive(Debug)]
pub struct AsciiSet {
    mask: [Chunk; ASCII_RANGE_LEN / BITS_PER_CHUNK],
}

type Chunk = u32;

const BITS_PER_CHUNK: usize = 8 * core::mem::size_of::<Chunk>();
const ASCII_RANGE_LEN: usize = 0x80;

impl AsciiSet {
    /// Called with UTF-8 bytes rather than code points.
    /// Not used for non-ASCII bytes.
    const fn contains(&self, byte: u8) -> bool {
        let chunk = self.mask[byte as usize / BITS_PER_CHUNK];
        let mask = 1 << (byte as usize % BITS_PER_CHUNK);
        (chunk & mask) != 0
    }

    #[inline]
    fn should_percent_encode(&self, byte: u8) -> bool {
        !byte.is_ascii() || self.contains(byte)
    }

    pub const fn add(&self, byte: u8) -> Self {
        let mut mask = self.mask;
        mask[byte as usize / BITS_PER_CHUNK] |= 1 << (byte as usize % BITS_PER_CHUNK);
        AsciiSet { mask }
    }

    pub const fn remove(&self, byte: u8) -> Self {
        let mut mask = self.mask;
        mask[byte as usize / BITS_PER_CHUNK] &= !(1 << (byte as usize % BITS_PER_CHUNK));
        AsciiSet { mask }
    }
}

/// The set of 0x00 to 0x1F (C0 controls), and 0x7E (DEL).
///
/// Note that this includes the non-ASCII "C1 control" code points
/// by virtue of excluding everything above 0x7F, all of which is percent-encoded.
pub const CONTROLS: &AsciiSet = &AsciiSet {
    mask: [!0, 0, 0, 1 << (0x7F % BITS_PER_CHUNK)],
};

/// https://url.spec.whatwg.org/#fragment-percent-encode-set
pub const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// https://url.spec.whatwg.org/#path-percent-encode-set
pub const PATH: &AsciiSet = &FRAGMENT.add(b'#').add(b'?').add(b'{').add(b'}');

/// https://url.spec.whatwg.org/#userinfo-percent-encode-set
pub const USERINFO: &AsciiSet = &PATH
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// The set of all ASCII characters that are not "URL code points" are also
/// often worth excluding, but that set is not expressible as a simple byte
/// predicate and is handled one layer up, by the `url` crate's parser.

/// Percent-encode the given bytes with the given set, and push the result onto `output`.
///
/// Non-ASCII bytes and bytes in `ascii_set` are encoded, everything else is copied as-is.
#[cfg(any(test, feature = "alloc"))]
pub fn percent_encode_to(input: &[u8], ascii_set: &'static AsciiSet, output: &mut String) {
    for chunk in percent_encode(input, ascii_set) {
        output.push_str(chunk)
    }
}

/// Percent-encode the given bytes with the given set.
///
/// Non-ASCII bytes and bytes in `ascii_set` are encoded, everything else is copied as-is.
///
/// The return type:
///
/// * Implements `Iterator<Item = &str>` and therefore has a `.collect::<String>()` method,
/// * Implements `Display` and therefore has a `.to_string()` method,
/// * Implements `Into<Cow<str>>` borrowing `input` when none of its bytes are percent-encoded.
#[inline]
pub fn percent_encode<'a>(input: &'a [u8], ascii_set: &'static AsciiSet) -> PercentEncode<'a> {
    PercentEncode {
        bytes: input,
        ascii_set,
    }
}

/// Percent-encode the UTF-8 encoding of the given string with the given set,
/// and push the result onto `output`.
#[cfg(any(test, feature = "alloc"))]
pub fn utf8_percent_encode_to(input: &str, ascii_set: &'static AsciiSet, output: &mut String) {
    percent_encode_to(input.as_bytes(), ascii_set, output)
}

/// Percent-encode the UTF-8 encoding of the given string with the given set.
///
/// This is a convenience wrapper for `percent_encode(input.as_bytes(), ascii_set)`.
///
/// The return type:
///
/// * Implements `Iterator<Item = &str>` and therefore has a `.collect::<String>()` method,
/// * Implements `Display` and therefore has a `.to_string()` method,
/// * Implements `Into<Cow<str>>` borrowing `input` when none of its bytes are percent-encoded.
#[inline]
pub fn utf8_percent_encode<'a>(input: &'a str, ascii_set: &'static AsciiSet) -> PercentEncode<'a> {
    percent_encode(input.as_bytes(), ascii_set)
}

/// The return type of [`percent_encode`] and [`utf8_percent_encode`].
#[derive(Clone)]
pub struct PercentEncode<'a> {
    bytes: &'a [u8],
    ascii_set: &'static AsciiSet,
}

impl<'a> Iterator for PercentEncode<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.bytes.is_empty() {
            return None;
        }
        match self
            .bytes
            .iter()
            .position(|&b| self.ascii_set.should_percent_encode(b))
        {
            Some(0) => {
                let (encoded, remaining) = self.bytes.split_at(1);
                self.bytes = remaining;
                Some(percent_encode_byte(encoded[0]))
            }
            Some(i) => {
                let (unchanged_slice, remaining) = self.bytes.split_at(i);
                self.bytes = remaining;
                Some(unsafe { str::from_utf8_unchecked(unchanged_slice) })
            }
            None => {
                let unchanged_slice = self.bytes;
                self.bytes = b"";
                Some(unsafe { str::from_utf8_unchecked(unchanged_slice) })
            }
        }
    }
}

impl<'a> fmt::Display for PercentEncode<'a> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        self.clone().try_for_each(|c| formatter.write_str(c))
    }
}

#[cfg(any(test, feature = "alloc"))]
impl<'a> From<PercentEncode<'a>> for Cow<'a, str> {
    fn from(mut iter: PercentEncode<'a>) -> Self {
        match iter.next() {
            None => "".into(),
            Some(first) => match iter.next() {
                None => first.into(),
                Some(second) => {
                    let mut string = first.to_owned();
                    string.push_str(second);
                    string.extend(iter);
                    string.into()
                }
            },
        }
    }
}

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

#[inline]
fn percent_encode_byte(byte: u8) -> &'static str {
    let i = 3 * byte as usize;
    &"\
%00%01%02%03%04%05%06%07%08%09%0A%0B%0C%0D%0E%0F\
%10%11%12%13%14%15%16%17%18%19%1A%1B%1C%1D%1E%1F\
%20%21%22%23%24%25%26%27%28%29%2A%2B%2C%2D%2E%2F\
%30%31%32%33%34%35%36%37%38%39%3A%3B%3C%3D%3E%3F\
%40%41%42%43%44%45%46%47%48%49%4A%4B%4C%4D%4E%4F\
%50%51%52%53%54%55%56%57%58%59%5A%5B%5C%5D%5E%5F\
%60%61%62%63%64%65%66%67%68%69%6A%6B%6C%6D%6E%6F\
%70%71%72%73%74%75%76%77%78%79%7A%7B%7C%7D%7E%7F\
%80%81%82%83%84%85%86%87%88%89%8A%8B%8C%8D%8E%8F\
%90%91%92%93%94%95%96%97%98%99%9A%9B%9C%9D%9E%9F\
%A0%A1%A2%A3%A4%A5%A6%A7%A8%A9%AA%AB%AC%AD%AE%AF\
%B0%B1%B2%B3%B4%B5%B6%B7%B8%B9%BA%BB%BC%BD%BE%BF\
%C0%C1%C2%C3%C4%C5%C6%C7%C8%C9%CA%CB%CC%CD%CE%CF\
%D0%D1%D2%D3%D4%D5%D6%D7%D8%D9%DA%DB%DC%DD%DE%DF\
%E0%E1%E2%E3%E4%E5%E6%E7%E8%E9%EA%EB%EC%ED%EE%EF\
%F0%F1%F2%F3%F4%F5%F6%F7%F8%F9%FA%FB%FC%FD%FE%FF\
"[i..i + 3]
}

/// Percent-encode a single byte to two uppercase hex digits, prefixed with `%`.
///
/// This is a convenience function for callers (such as the `url` crate's query-string state)
/// that percent-encode individual bytes inline rather than whole slices through an `AsciiSet`.
#[inline]
pub fn percent_encode_byte_to(byte: u8, output: &mut dyn fmt::Write) -> fmt::Result {
    output.write_str(percent_encode_byte(byte))
}

/// Check if `byte` is the ASCII byte `%` followed by two hexadecimal digits.
#[inline]
fn starts_with_2_hex(input: &[u8]) -> Option<u8> {
    let h1 = *input.first()?;
    let d1 = (h1 as char).to_digit(16)?;
    let h2 = *input.get(1)?;
    let d2 = (h2 as char).to_digit(16)?;
    Some((d1 * 0x10 + d2) as u8)
}

/// The return type of [`percent_decode`].
#[derive(Clone, Debug)]
pub struct PercentDecode<'a> {
    bytes: slice::Iter<'a, u8>,
}

/// Percent-decode the given bytes.
///
/// The return type:
///
/// * Implements `Iterator<Item = u8>` and therefore has a `.collect::<Vec<u8>>()` method,
/// * Has `.decode_utf8()` and `.decode_utf8_lossy()` methods,
/// * Implements `Into<Cow<[u8]>>` borrowing `input` when it contains no `%` byte.
#[inline]
pub fn percent_decode(input: &[u8]) -> PercentDecode<'_> {
    PercentDecode {
        bytes: input.iter(),
    }
}

/// `percent_decode(input.as_bytes())` for a string input.
#[inline]
pub fn percent_decode_str(input: &str) -> PercentDecode<'_> {
    percent_decode(input.as_bytes())
}

impl<'a> Iterator for PercentDecode<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.bytes.next().map(|&byte| {
            if byte == b'%' {
                let rest = self.bytes.as_slice();
                if let Some(decoded) = starts_with_2_hex(rest) {
                    self.bytes.next();
                    self.bytes.next();
                    return decoded;
                }
            }
            byte
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.bytes.size_hint();
        (0, upper)
    }
}

#[cfg(any(test, feature = "alloc"))]
impl<'a> PercentDecode<'a> {
    /// If the percent-decoding is different from the input, return it as a new vector of bytes.
    fn if_any(&self) -> Option<Vec<u8>> {
        let mut bytes_iter = self.bytes.as_slice().iter();
        while bytes_iter.any(|&b| b == b'%') {
            if let Some(decoded) = starts_with_2_hex(bytes_iter.as_slice()) {
                let initial_bytes = self.bytes.as_slice();
                let unchanged_len = initial_bytes.len() - bytes_iter.as_slice().len() - 1;
                let mut decoded_bytes = initial_bytes[..unchanged_len].to_owned();
                decoded_bytes.push(decoded);
                decoded_bytes.extend(PercentDecode { bytes: bytes_iter.clone() });
                return Some(decoded_bytes);
            }
        }
        None
    }

    /// Decode the result of percent-decoding as UTF-8, lossily.
    ///
    /// Invalid UTF-8 percent-encoded byte sequences will be replaced U+FFFD,
    /// the replacement character.
    pub fn decode_utf8_lossy(self) -> Cow<'a, str> {
        match self.clone().into() {
            Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
            Cow::Owned(bytes) => String::from_utf8_lossy(&bytes).into_owned().into(),
        }
    }

    /// Decode the result of percent-decoding as UTF-8.
    ///
    /// Returns `Err` when the percent-decoded bytes are not well-formed in UTF-8.
    pub fn decode_utf8(self) -> Result<Cow<'a, str>, str::Utf8Error> {
        match self.clone().into() {
            Cow::Borrowed(bytes) => match str::from_utf8(bytes) {
                Ok(s) => Ok(s.into()),
                Err(e) => Err(e),
            },
            Cow::Owned(bytes) => match String::from_utf8(bytes) {
                Ok(s) => Ok(s.into()),
                Err(e) => Err(e.utf8_error()),
            },
        }
    }
}

#[cfg(any(test, feature = "alloc"))]
impl<'a> From<PercentDecode<'a>> for Cow<'a, [u8]> {
    fn from(iter: PercentDecode<'a>) -> Self {
        match iter.if_any() {
            Some(vec) => Cow::Owned(vec),
            None => Cow::Borrowed(iter.bytes.as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_roundtrips_through_the_chosen_set() {
        let input = "query with spaces and a # hash and 日本語";
        let encoded = utf8_percent_encode(input, FRAGMENT).to_string();
        assert!(!encoded.contains(' '));
        let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn userinfo_set_is_a_superset_of_path_set() {
        for byte in 0u8..=0x7f {
            if PATH.contains(byte) {
                assert!(USERINFO.contains(byte), "byte {:#x} missing from USERINFO", byte);
            }
        }
    }

    #[test]
    fn percent_followed_by_non_hex_is_left_alone() {
        let decoded: Vec<u8> = percent_decode(b"100%; done").collect();
        assert_eq!(decoded, b"100%; done");
    }

    #[test]
    fn lone_trailing_percent_is_left_alone() {
        let decoded: Vec<u8> = percent_decode(b"abc%").collect();
        assert_eq!(decoded, b"abc%");
    }

    #[test]
    fn percent_encode_byte_is_uppercase_hex() {
        let mut out = String::new();
        percent_encode_byte_to(0xE9, &mut out).unwrap();
        assert_eq!(out, "%E9");
    }
}
