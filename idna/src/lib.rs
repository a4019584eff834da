// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This Rust crate implements IDNA
//! [per the WHATWG URL Standard](https://url.spec.whatwg.org/#idna).
//!
//! It also exposes the underlying [Punycode (RFC 3492)](https://tools.ietf.org/html/rfc3492)
//! codec that the domain mapping builds on.
//!
//! Quoting from [UTS #46’s introduction](http://www.unicode.org/reports/tr46/#Introduction):
//!
//! > Initially, domain names were restricted to ASCII characters.
//! > A system was introduced in 2003 for internationalized domain names (IDN).
//! > This system is called Internationalizing Domain Names for Applications,
//! > or IDNA2003 for short.
//! > This mechanism supports IDNs by means of a client software transformation
//! > into a format known as Punycode.
//! > A revision of IDNA was approved in 2010 (IDNA2008).
//!
//! `CheckHyphens` and transitional processing are not supported: this crate
//! always behaves as the URL Standard's host parser wants it to
//! (`CheckHyphens=false`, `Transitional=false`), and `be_strict` stands in
//! for `UseSTD3ASCIIRules`/`VerifyDnsLength`.
#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

#[cfg(not(feature = "alloc"))]
compile_error!("the `alloc` feature must be enabled");

use alloc::string::String;

mod mapping;
pub mod punycode;

/// Type indicating that there were errors during UTS #46 processing.
#[derive(Default, Debug)]
#[non_exhaustive]
pub struct Errors {}

impl From<Errors> for Result<(), Errors> {
    fn from(e: Errors) -> Result<(), Errors> {
        Err(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Errors {}

impl core::fmt::Display for Errors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// The [domain to ASCII](https://url.spec.whatwg.org/#concept-domain-to-ascii) algorithm.
///
/// Returns the ASCII representation of a domain name,
/// normalizing characters (upper-case to lower-case and other kinds of equivalence)
/// and using Punycode as necessary.
///
/// When `be_strict` is `true`, the ASCII deny list (`UseSTD3ASCIIRules`) and
/// the DNS length limits (`VerifyDnsLength`) are both enforced. When `false`,
/// no ASCII deny list is applied and length is not checked, matching the
/// URL Standard's non-special-scheme-friendly default.
///
/// This process may fail.
pub fn domain_to_ascii(domain: &str, be_strict: bool) -> Result<String, Errors> {
    mapping::to_ascii(domain, be_strict)
}

/// The [domain to Unicode](https://url.spec.whatwg.org/#concept-domain-to-unicode) algorithm.
///
/// Returns the Unicode representation of a domain name,
/// normalizing characters (upper-case to lower-case and other kinds of equivalence)
/// and decoding Punycode as necessary.
///
/// If the second item of the tuple indicates an error, the first item of the tuple
/// denotes errors using the original labels where decoding failed, to be able to
/// illustrate errors to the user. When the second item of the return tuple signals
/// an error, the first item of the tuple must not be used in a network protocol.
pub fn domain_to_unicode(domain: &str) -> (String, Result<(), Errors>) {
    mapping::to_unicode(domain)
}
