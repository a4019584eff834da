// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parser and serializer for the `application/x-www-form-urlencoded` syntax,
//! as used by HTML forms.
//!
//! Converts between a string (such as an URL's query string)
//! and a sequence of (name, value) pairs.

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use percent_encoding::{percent_decode, AsciiSet, CONTROLS};

#[cfg(any(test, feature = "alloc"))]
use alloc::borrow::{Cow, ToOwned};
#[cfg(any(test, feature = "alloc"))]
use alloc::string::String;
#[cfg(any(test, feature = "alloc"))]
use alloc::vec::Vec;

use core::str;

/// The bytes that are left alone in `application/x-www-form-urlencoded` serialization.
/// Everything else becomes `%HH`, except the space character which becomes `+`.
const FORM_URLENCODED_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'!')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'~');

fn is_unreserved_for_form(byte: u8) -> bool {
    matches!(byte, b'*' | b'-' | b'.' | b'0'..=b'9' | b'A'..=b'Z' | b'_' | b'a'..=b'z')
}

/// Convert a byte string in the `application/x-www-form-urlencoded` syntax
/// into a iterator of (name, value) pairs.
///
/// Use `parse(input.as_bytes())` to parse a `&str` input.
///
/// The names and values are percent-decoded. For instance, `%23first=%2510%25` will be
/// converted to `[("#first", "10%")]`.
#[inline]
pub fn parse(input: &[u8]) -> Parse<'_> {
    Parse { input }
}

/// The return type of [`parse`].
#[derive(Copy, Clone)]
pub struct Parse<'a> {
    input: &'a [u8],
}

impl<'a> Iterator for Parse<'a> {
    type Item = (Cow<'a, str>, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.input.is_empty() {
                return None;
            }
            let (piece, remaining) = match self.input.iter().position(|&b| b == b'&') {
                Some(position) => (&self.input[..position], &self.input[position + 1..]),
                None => (self.input, &[][..]),
            };
            self.input = remaining;
            if piece.is_empty() {
                continue;
            }
            let (name, value) = match piece.iter().position(|&b| b == b'=') {
                Some(position) => (&piece[..position], &piece[position + 1..]),
                None => (piece, &[][..]),
            };
            return Some((decode(name), decode(value)));
        }
    }
}

fn decode(input: &[u8]) -> Cow<'_, str> {
    match replace_plus(input) {
        Cow::Borrowed(b) => percent_decode(b).decode_utf8_lossy(),
        Cow::Owned(b) => {
            match percent_decode(&b).decode_utf8_lossy() {
                Cow::Borrowed(_) => String::from_utf8_lossy(&b).into_owned().into(),
                Cow::Owned(s) => s.into(),
            }
        }
    }
}

/// Replace b'+' with b' '
fn replace_plus(input: &[u8]) -> Cow<'_, [u8]> {
    match input.iter().position(|&b| b == b'+') {
        None => Cow::Borrowed(input),
        Some(first_position) => {
            let mut replaced = input.to_owned();
            replaced[first_position] = b' ';
            for byte in &mut replaced[first_position + 1..] {
                if *byte == b'+' {
                    *byte = b' ';
                }
            }
            Cow::Owned(replaced)
        }
    }
}

/// Convert a byte string in the `application/x-www-form-urlencoded` syntax
/// into a iterator of (name, value) pairs, with a default encoding of UTF-8 always
/// in effect (this crate deliberately does not support other encodings; see
/// the URL Standard's `application/x-www-form-urlencoded` parser for the general case).
#[inline]
pub fn parse_str(input: &str) -> Parse<'_> {
    parse(input.as_bytes())
}

/// Serialize an iterator of (name, value) pairs as
/// `application/x-www-form-urlencoded` into a `String`.
pub fn byte_serialize(input: &[u8]) -> ByteSerialize<'_> {
    ByteSerialize { bytes: input }
}

/// The return type of [`byte_serialize`].
#[derive(Debug)]
pub struct ByteSerialize<'a> {
    bytes: &'a [u8],
}

impl<'a> Iterator for ByteSerialize<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.bytes.is_empty() {
            return None;
        }
        // SAFETY: `+` and the percent-encoded form are both single ASCII bytes,
        // and unreserved bytes pass through verbatim, so every chunk is valid UTF-8.
        match self.bytes[0] {
            b' ' => {
                self.bytes = &self.bytes[1..];
                Some("+")
            }
            _ => {
                let len = self
                    .bytes
                    .iter()
                    .position(|&b| !is_unreserved_for_form(b))
                    .unwrap_or(self.bytes.len());
                if len > 0 {
                    let (slice, rest) = self.bytes.split_at(len);
                    self.bytes = rest;
                    return Some(unsafe { str::from_utf8_unchecked(slice) });
                }
                let (one_byte, rest) = self.bytes.split_at(1);
                self.bytes = rest;
                // `FORM_URLENCODED_ENCODE_SET` marks every byte outside
                // `is_unreserved_for_form` for encoding, so this always yields `%XX`.
                Some(
                    percent_encoding::percent_encode(one_byte, FORM_URLENCODED_ENCODE_SET)
                        .next()
                        .unwrap(),
                )
            }
        }
    }
}

/// Types implementing this trait can be serialized into as `application/x-www-form-urlencoded`,
/// ie. a key-value pair sequence where the key and value can only be utf8/percent encoded strings.
pub trait Target {
    /// Successful return type from finish().
    type Finished;

    /// Called after the serialization is done.
    fn finish(self) -> Self::Finished;

    /// Write the serialization result to the target.
    fn as_mut_string(&mut self) -> &mut String;
}

#[cfg(any(test, feature = "alloc"))]
impl Target for String {
    type Finished = String;
    fn finish(self) -> Self {
        self
    }
    fn as_mut_string(&mut self) -> &mut String {
        self
    }
}

#[cfg(any(test, feature = "alloc"))]
impl<'a> Target for &'a mut String {
    type Finished = &'a mut String;
    fn finish(self) -> Self {
        self
    }
    fn as_mut_string(&mut self) -> &mut String {
        &mut *self
    }
}

/// A builder of `application/x-www-form-urlencoded` strings.
///
/// Create a new instance with `Serializer::new`.
#[derive(Debug)]
pub struct Serializer<'a, T: Target> {
    start_position: usize,
    target: Option<T>,
    encoding: core::marker::PhantomData<&'a ()>,
}

impl<'a, T: Target> Serializer<'a, T> {
    /// Create a new `application/x-www-form-urlencoded` serializer for the given target.
    ///
    /// If `T` implements `Extend<&'static str>`-like `String` append semantics,
    /// existing content is preserved and the serializer only ever *appends*,
    /// separating new pairs with `&` from anything already in `target`.
    pub fn new(target: T) -> Self {
        Self::for_suffix(target, 0)
    }

    /// Create a new `application/x-www-form-urlencoded` serializer,
    /// append to a existing target, as if that target was just serialized with this serializer.
    pub fn for_suffix(mut target: T, start_position: usize) -> Self {
        {
            let string = target.as_mut_string();
            match string.get(..start_position) {
                Some(_) => (),
                None => panic!("invalid length {} for target {:?}", start_position, string),
            }
        }
        Serializer {
            start_position,
            target: Some(target),
            encoding: core::marker::PhantomData,
        }
    }

    /// Remove any existing name/value pair.
    ///
    /// Panics if called after `.finish()`.
    pub fn clear(&mut self) -> &mut Self {
        let target = self.target.as_mut().expect("Serializer used after finish()");
        target.as_mut_string().truncate(self.start_position);
        self
    }

    /// Serialize and append a name/value pair.
    ///
    /// Panics if called after `.finish()`.
    pub fn append_pair(&mut self, name: &str, value: &str) -> &mut Self {
        append_pair(
            self.target.as_mut().expect("Serializer used after finish()").as_mut_string(),
            self.start_position,
            name,
            value,
        );
        self
    }

    /// Serialize and append a name of a name/value pair, with no value.
    ///
    /// Panics if called after `.finish()`.
    pub fn append_key_only(&mut self, name: &str) -> &mut Self {
        append_key_only(
            self.target.as_mut().expect("Serializer used after finish()").as_mut_string(),
            self.start_position,
            name,
        );
        self
    }

    /// Serialize and append a number of name/value pairs.
    ///
    /// This simply calls `append_pair` repeatedly.
    /// This can be more convenient, so the user doesn't need to introduce a block
    /// to limit the scope of `Serializer`'s borrow of its string.
    ///
    /// Panics if called after `.finish()`.
    pub fn extend_pairs<I, K, V>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: core::borrow::Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        {
            let target = self.target.as_mut().expect("Serializer used after finish()").as_mut_string();
            for pair in iter {
                let (k, v) = pair.borrow();
                append_pair(target, self.start_position, k.as_ref(), v.as_ref());
            }
        }
        self
    }

    /// Serialize and append a number of names without values.
    ///
    /// Panics if called after `.finish()`.
    pub fn extend_keys_only<I, K>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: core::borrow::Borrow<K>,
        K: AsRef<str>,
    {
        {
            let target = self.target.as_mut().expect("Serializer used after finish()").as_mut_string();
            for key in iter {
                append_key_only(target, self.start_position, key.borrow().as_ref());
            }
        }
        self
    }

    /// Re-order the name/value pairs appended so far, stably sorting them by
    /// name.
    ///
    /// Names are compared as sequences of UTF-16 code units, per
    /// <https://url.spec.whatwg.org/#dom-urlsearchparams-sort> ("sort" uses
    /// the JavaScript-facing string's code unit order, not a byte or
    /// Unicode-scalar comparison; this only differs from a plain `&str`
    /// comparison for names containing surrogate-pair characters).
    ///
    /// Panics if called after `.finish()`.
    pub fn sort(&mut self) -> &mut Self {
        let target = self.target.as_mut().expect("Serializer used after finish()").as_mut_string();
        let tail = target[self.start_position..].to_owned();
        let mut pairs: Vec<(String, String)> = parse(tail.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        pairs.sort_by(|a, b| {
            a.0.encode_utf16()
                .collect::<Vec<u16>>()
                .cmp(&b.0.encode_utf16().collect::<Vec<u16>>())
        });
        target.truncate(self.start_position);
        for (name, value) in &pairs {
            append_pair(target, self.start_position, name, value);
        }
        self
    }

    /// If this serializer was constructed with a string, take and return that string.
    ///
    /// ```rust
    /// assert_eq!(
    ///     form_urlencoded::Serializer::new(String::new())
    ///         .append_pair("foo", "bar")
    ///         .finish(),
    ///     "foo=bar"
    /// );
    /// ```
    pub fn finish(&mut self) -> T::Finished {
        self.target.take().expect("Serializer used after finish()").finish()
    }
}

fn append_separator_if_needed(string: &mut String, start_position: usize) {
    if string.len() > start_position {
        string.push('&')
    }
}

fn append_pair(string: &mut String, start_position: usize, name: &str, value: &str) {
    append_separator_if_needed(string, start_position);
    string.extend(byte_serialize(name.as_bytes()));
    string.push('=');
    string.extend(byte_serialize(value.as_bytes()));
}

fn append_key_only(string: &mut String, start_position: usize, name: &str) {
    append_separator_if_needed(string, start_position);
    string.extend(byte_serialize(name.as_bytes()));
}
