// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The basic URL parser: <https://url.spec.whatwg.org/#url-parsing>

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use percent_encoding::{percent_decode, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::host::{is_normalized_windows_drive_letter, is_windows_drive_letter, Host};

#[cfg(feature = "std")]
use std::error::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur during parsing.
///
/// This may be extended in the future so exhaustive matching should
/// be avoided.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// The scheme has invalid characters, or the scheme is missing and
    /// there is no base URL to fall back to.
    EmptyHost,
    /// Relative URL without a base.
    RelativeUrlWithoutBase,
    /// Relative URL with a base whose scheme cannot have username/password/port/relative-path.
    RelativeUrlWithCannotBeABaseBase,
    /// A cannot-be-a-base URL doesn't have a host to set.
    SetHostOnCannotBeABaseUrl,
    /// URLs more than 4 GB are not supported.
    Overflow,
    /// The host is empty where it must not be.
    InvalidDomainCharacter,
    /// The port number is invalid (greater than 65535).
    InvalidPort,
    /// An invalid IPv4 address.
    InvalidIpv4Address,
    /// An invalid IPv6 address.
    InvalidIpv6Address,
    /// Domain name processing (IDNA) failed.
    IdnaError,
}

impl fmt::Display for ParseError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(match *self {
            ParseError::EmptyHost => "empty host",
            ParseError::RelativeUrlWithoutBase => "relative URL without a base",
            ParseError::RelativeUrlWithCannotBeABaseBase => {
                "relative URL with a cannot-be-a-base base"
            }
            ParseError::SetHostOnCannotBeABaseUrl => {
                "a cannot-be-a-base URL doesn't have a host to set"
            }
            ParseError::Overflow => "URLs more than 4GB are not supported",
            ParseError::InvalidDomainCharacter => "invalid domain character",
            ParseError::InvalidPort => "invalid port number",
            ParseError::InvalidIpv4Address => "invalid IPv4 address",
            ParseError::InvalidIpv6Address => "invalid IPv6 address",
            ParseError::IdnaError => "IDNA processing of domain name failed",
        })
    }
}

#[cfg(feature = "std")]
impl Error for ParseError {}

/// Non-fatal syntax violations, reported through an injected callback.
///
/// <https://url.spec.whatwg.org/#validation-error>
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[non_exhaustive]
pub enum SyntaxViolation {
    Backslash,
    C0SpaceIgnored,
    EmbeddedCredentials,
    ExpectedDoubleSlash,
    ExpectedFileDoubleSlash,
    FileWithHostAndWindowsDrive,
    NonUrlCodePoint,
    NullInFragment,
    PercentDecode,
    TabOrNewlineIgnored,
    UnencodedAtSign,
}

impl SyntaxViolation {
    pub fn description(&self) -> &'static str {
        match *self {
            SyntaxViolation::Backslash => "backslash",
            SyntaxViolation::C0SpaceIgnored => {
                "leading or trailing control or space character are ignored in URLs"
            }
            SyntaxViolation::EmbeddedCredentials => "embedding authentication information (username or password) in an URL is not recommended",
            SyntaxViolation::ExpectedDoubleSlash => "expected //",
            SyntaxViolation::ExpectedFileDoubleSlash => "expected // after file:",
            SyntaxViolation::FileWithHostAndWindowsDrive => "file: with host and Windows drive letter",
            SyntaxViolation::NonUrlCodePoint => "non-URL code point",
            SyntaxViolation::NullInFragment => "NULL characters are ignored in URL fragment identifiers",
            SyntaxViolation::PercentDecode => "expected 2 hex digits after %",
            SyntaxViolation::TabOrNewlineIgnored => "tabs or newlines are ignored in URLs",
            SyntaxViolation::UnencodedAtSign => "unencoded @ sign in username or password",
        }
    }
}

impl fmt::Display for SyntaxViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation Error: {}", self.description())
    }
}

/// The 21 named states of the basic URL parser plus the terminal fragment
/// state; the spec groups these as "22 states" counting the implicit
/// start dispatch. <https://url.spec.whatwg.org/#url-parsing>
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum State {
    SchemeStart,
    Scheme,
    NoScheme,
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    Hostname,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    CannotBeABaseUrlPath,
    Query,
    Fragment,
}

/// The intermediate, structured representation the parser builds and
/// mutates; `Url` serializes a finished `Parsed` into its single-string
/// `+ offsets` public representation (see `Url::from_parsed`).
#[derive(Clone, Debug)]
pub(crate) struct Parsed {
    pub scheme: String,
    pub username: String,
    pub password: String,
    pub host: Option<Host<String>>,
    pub port: Option<u16>,
    pub path: Vec<String>,
    pub cannot_be_a_base: bool,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl Default for Parsed {
    fn default() -> Self {
        Parsed {
            scheme: String::new(),
            username: String::new(),
            password: String::new(),
            host: None,
            port: None,
            path: Vec::new(),
            cannot_be_a_base: false,
            query: None,
            fragment: None,
        }
    }
}

impl Parsed {
    pub fn is_special(&self) -> bool {
        is_special_scheme(&self.scheme)
    }

    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    /// <https://url.spec.whatwg.org/#cannot-have-a-username-password-port>
    pub fn cannot_have_username_password_port(&self) -> bool {
        self.cannot_be_a_base
            || self.scheme == "file"
            || match self.host {
                None => true,
                Some(Host::Domain(ref d)) => d.is_empty(),
                _ => false,
            }
    }
}

pub(crate) fn is_special_scheme(scheme: &str) -> bool {
    matches!(scheme, "ftp" | "file" | "http" | "https" | "ws" | "wss")
}

pub(crate) fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "ftp" => Some(21),
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

/// <https://url.spec.whatwg.org/#shorten-a-urls-path>
pub(crate) fn shorten_path(scheme: &str, path: &mut Vec<String>) {
    if path.is_empty() {
        return;
    }
    if scheme == "file" && path.len() == 1 && is_normalized_windows_drive_letter(&path[0]) {
        return;
    }
    path.pop();
}

/// Entry point used for a fresh, non-setter parse.
pub(crate) fn parse_url(
    input: &str,
    base: Option<&Parsed>,
    vfn: Option<&dyn Fn(SyntaxViolation)>,
) -> ParseResult<Parsed> {
    let mut parsed = Parsed::default();
    run(input, base, None, &mut parsed, vfn)?;
    Ok(parsed)
}

/// Entry point used by setters: re-enters the state machine at
/// `state_override`, mutating a copy of the URL's current fields.
pub(crate) fn parse_with_state_override(
    input: &str,
    state_override: State,
    mut parsed: Parsed,
    vfn: Option<&dyn Fn(SyntaxViolation)>,
) -> ParseResult<Parsed> {
    run(input, None, Some(state_override), &mut parsed, vfn)?;
    Ok(parsed)
}

fn basic_control_or_space(c: char) -> bool {
    c <= ' '
}

/// Strip leading/trailing C0-control-or-space (only when not given a
/// pre-existing `url` i.e. on a fresh parse) and strip all TAB/LF/CR
/// everywhere, per <https://url.spec.whatwg.org/#url-parsing>'s pre-pass.
fn clean_input(input: &str, is_fresh_parse: bool, vfn: Option<&dyn Fn(SyntaxViolation)>) -> String {
    let mut s = input;
    if is_fresh_parse {
        let trimmed = s.trim_matches(basic_control_or_space);
        if trimmed.len() != s.len() {
            violation(vfn, SyntaxViolation::C0SpaceIgnored);
        }
        s = trimmed;
    }
    let mut saw_tab_or_newline = false;
    let cleaned: String = s
        .chars()
        .filter(|&c| {
            let strip = matches!(c, '\t' | '\n' | '\r');
            if strip {
                saw_tab_or_newline = true;
            }
            !strip
        })
        .collect();
    if saw_tab_or_newline {
        violation(vfn, SyntaxViolation::TabOrNewlineIgnored);
    }
    cleaned
}

#[inline]
fn violation(vfn: Option<&dyn Fn(SyntaxViolation)>, violation: SyntaxViolation) {
    if let Some(f) = vfn {
        f(violation);
    }
}

const USERINFO: &AsciiSet = percent_encoding::USERINFO;
const PATH: &AsciiSet = percent_encoding::PATH;
const FRAGMENT: &AsciiSet = percent_encoding::FRAGMENT;

/// <https://url.spec.whatwg.org/#special-query-percent-encode-set> plus the
/// non-special counterpart, folded into one predicate per spec.md §4.3.
fn query_byte_needs_encoding(byte: u8, is_special: bool) -> bool {
    if byte < 0x21 || byte > 0x7e || matches!(byte, 0x22 | 0x23 | 0x3c | 0x3e) {
        return true;
    }
    if byte == 0x27 {
        return is_special;
    }
    false
}

fn is_ascii_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn run(
    input: &str,
    base: Option<&Parsed>,
    state_override: Option<State>,
    parsed: &mut Parsed,
    vfn: Option<&dyn Fn(SyntaxViolation)>,
) -> ParseResult<()> {
    let cleaned = clean_input(input, state_override.is_none(), vfn);
    let chars: Vec<char> = cleaned.chars().collect();
    let len = chars.len();

    let mut state = state_override.unwrap_or(State::SchemeStart);
    let mut pointer: usize = 0;
    let mut buffer = String::new();
    let mut at_sign_seen = false;
    let mut password_token_seen = false;
    let mut inside_brackets = false;

    macro_rules! c {
        () => {
            if pointer < len {
                Some(chars[pointer])
            } else {
                None
            }
        };
    }
    macro_rules! remaining_from {
        ($n:expr) => {
            if pointer + $n <= len {
                &chars[pointer + $n..]
            } else {
                &[][..]
            }
        };
    }
    macro_rules! starts_with_two_slashes {
        ($chs:expr) => {
            $chs.first() == Some(&'/') && $chs.get(1) == Some(&'/')
        };
    }
    fn is_special(s: &str) -> bool {
        is_special_scheme(s)
    }

    'state_machine: loop {
        match state {
            State::SchemeStart => {
                match c!() {
                    Some(ch) if is_ascii_alpha(ch) => {
                        buffer.push(ch.to_ascii_lowercase());
                        state = State::Scheme;
                    }
                    _ => {
                        if state_override.is_none() {
                            state = State::NoScheme;
                            continue 'state_machine; // reconsume
                        } else {
                            return Err(ParseError::EmptyHost);
                        }
                    }
                }
            }

            State::Scheme => match c!() {
                Some(ch) if is_ascii_alpha(ch) || ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.') => {
                    buffer.push(ch.to_ascii_lowercase());
                }
                Some(':') => {
                    if let Some(override_state) = state_override {
                        let was_special = parsed.is_special();
                        let buffer_special = is_special(&buffer);
                        if was_special != buffer_special {
                            return Err(ParseError::EmptyHost);
                        }
                        let base_host_is_empty_domain = match parsed.host {
                            None => true,
                            Some(Host::Domain(ref d)) => d.is_empty(),
                            _ => false,
                        };
                        if (buffer == "file" && (parsed.has_nonempty_username_password_or_port()))
                            || (parsed.scheme == "file"
                                && buffer != "file"
                                && base_host_is_empty_domain)
                        {
                            return Err(ParseError::EmptyHost);
                        }
                        parsed.scheme = buffer.clone();
                        if parsed.port == default_port(&parsed.scheme) {
                            parsed.port = None;
                        }
                        let _ = override_state;
                        return Ok(());
                    }
                    parsed.scheme = buffer.clone();
                    if parsed.scheme == "file" {
                        buffer.clear();
                        state = State::File;
                    } else if parsed.is_special() {
                        if let Some(b) = base {
                            if b.scheme == parsed.scheme {
                                state = State::SpecialRelativeOrAuthority;
                                pointer += 1;
                                continue 'state_machine;
                            }
                        }
                        state = State::SpecialAuthoritySlashes;
                    } else if remaining_from!(1).first() == Some(&'/') {
                        state = State::PathOrAuthority;
                    } else {
                        parsed.cannot_be_a_base = true;
                        parsed.path.push(String::new());
                        state = State::CannotBeABaseUrlPath;
                    }
                }
                _ => {
                    if state_override.is_none() {
                        buffer.clear();
                        state = State::NoScheme;
                        pointer = 0;
                        continue 'state_machine;
                    } else {
                        return Err(ParseError::EmptyHost);
                    }
                }
            },

            State::NoScheme => {
                let b = base.ok_or(ParseError::RelativeUrlWithoutBase)?;
                if b.cannot_be_a_base {
                    if c!() == Some('#') {
                        parsed.scheme = b.scheme.clone();
                        parsed.path = b.path.clone();
                        parsed.cannot_be_a_base = true;
                        parsed.query = b.query.clone();
                        parsed.fragment = Some(String::new());
                        state = State::Fragment;
                        pointer += 1;
                        continue 'state_machine;
                    }
                    return Err(ParseError::RelativeUrlWithCannotBeABaseBase);
                }
                if b.scheme == "file" {
                    state = State::File;
                } else {
                    state = State::Relative;
                }
                continue 'state_machine;
            }

            State::SpecialRelativeOrAuthority => {
                if starts_with_two_slashes!(remaining_from!(0)) {
                    state = State::SpecialAuthorityIgnoreSlashes;
                    pointer += 1;
                } else {
                    violation(vfn, SyntaxViolation::ExpectedDoubleSlash);
                    state = State::Relative;
                    continue 'state_machine;
                }
            }

            State::PathOrAuthority => {
                if c!() == Some('/') {
                    state = State::Authority;
                } else {
                    state = State::Path;
                    continue 'state_machine;
                }
            }

            State::Relative => {
                let b = base.expect("Relative state always has a base");
                parsed.scheme = b.scheme.clone();
                match c!() {
                    None => {
                        parsed.username = b.username.clone();
                        parsed.password = b.password.clone();
                        parsed.host = b.host.clone();
                        parsed.port = b.port;
                        parsed.path = b.path.clone();
                        parsed.query = b.query.clone();
                        return Ok(());
                    }
                    Some('/') | Some('\\') => {
                        if c!() == Some('\\') {
                            violation(vfn, SyntaxViolation::Backslash);
                        }
                        state = State::RelativeSlash;
                    }
                    Some('?') => {
                        parsed.username = b.username.clone();
                        parsed.password = b.password.clone();
                        parsed.host = b.host.clone();
                        parsed.port = b.port;
                        parsed.path = b.path.clone();
                        parsed.query = Some(String::new());
                        state = State::Query;
                    }
                    Some('#') => {
                        parsed.username = b.username.clone();
                        parsed.password = b.password.clone();
                        parsed.host = b.host.clone();
                        parsed.port = b.port;
                        parsed.path = b.path.clone();
                        parsed.query = b.query.clone();
                        parsed.fragment = Some(String::new());
                        state = State::Fragment;
                    }
                    Some(_) => {
                        parsed.username = b.username.clone();
                        parsed.password = b.password.clone();
                        parsed.host = b.host.clone();
                        parsed.port = b.port;
                        parsed.path = b.path.clone();
                        if !parsed.path.is_empty() {
                            parsed.path.pop();
                        }
                        state = State::Path;
                        continue 'state_machine;
                    }
                }
            }

            State::RelativeSlash => {
                match c!() {
                    Some('/') | Some('\\') if parsed.is_special() => {
                        if c!() == Some('\\') {
                            violation(vfn, SyntaxViolation::Backslash);
                        }
                        state = State::SpecialAuthorityIgnoreSlashes;
                    }
                    Some('/') => {
                        state = State::Authority;
                    }
                    _ => {
                        let b = base.expect("RelativeSlash state always has a base");
                        parsed.username = b.username.clone();
                        parsed.password = b.password.clone();
                        parsed.host = b.host.clone();
                        parsed.port = b.port;
                        state = State::Path;
                        continue 'state_machine;
                    }
                }
            }

            State::SpecialAuthoritySlashes => {
                if starts_with_two_slashes!(remaining_from!(0)) {
                    state = State::SpecialAuthorityIgnoreSlashes;
                    pointer += 1;
                } else {
                    violation(vfn, SyntaxViolation::ExpectedDoubleSlash);
                    state = State::SpecialAuthorityIgnoreSlashes;
                    continue 'state_machine;
                }
            }

            State::SpecialAuthorityIgnoreSlashes => {
                if !matches!(c!(), Some('/') | Some('\\')) {
                    state = State::Authority;
                    continue 'state_machine;
                }
                // else: skip this slash-like code point and stay in this state.
            }

            State::Authority => {
                match c!() {
                    Some('@') => {
                        if at_sign_seen {
                            buffer.insert_str(0, "%40");
                        }
                        at_sign_seen = true;
                        violation(vfn, SyntaxViolation::UnencodedAtSign);
                        for ch in buffer.chars() {
                            if ch == ':' && !password_token_seen {
                                password_token_seen = true;
                                continue;
                            }
                            let mut encoded = [0u8; 4];
                            let encoded_str = ch.encode_utf8(&mut encoded);
                            let piece: String =
                                utf8_percent_encode(encoded_str, USERINFO).collect();
                            if password_token_seen {
                                parsed.password.push_str(&piece);
                            } else {
                                parsed.username.push_str(&piece);
                            }
                        }
                        buffer.clear();
                    }
                    None | Some('/') | Some('?') | Some('#') => {
                        if at_sign_seen && buffer.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        pointer -= buffer.chars().count();
                        buffer.clear();
                        state = State::Host;
                        continue 'state_machine;
                    }
                    Some('\\') if parsed.is_special() => {
                        if at_sign_seen && buffer.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        pointer -= buffer.chars().count();
                        buffer.clear();
                        state = State::Host;
                        continue 'state_machine;
                    }
                    Some(ch) => {
                        buffer.push(ch);
                    }
                }
            }

            State::Host | State::Hostname => {
                if state_override.is_some() && parsed.scheme == "file" {
                    state = State::FileHost;
                    continue 'state_machine;
                }
                match c!() {
                    Some(':') if !inside_brackets => {
                        if buffer.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        if state_override == Some(State::Hostname) {
                            return Ok(());
                        }
                        let host = parse_host_buffer(&buffer, !parsed.is_special())?;
                        parsed.host = Some(host);
                        buffer.clear();
                        state = State::Port;
                    }
                    None | Some('/') | Some('?') | Some('#') => {
                        if parsed.is_special() && buffer.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        if state_override.is_some()
                            && buffer.is_empty()
                            && (!parsed.username.is_empty()
                                || !parsed.password.is_empty()
                                || parsed.port.is_some())
                        {
                            return Ok(());
                        }
                        let host = parse_host_buffer(&buffer, !parsed.is_special())?;
                        parsed.host = Some(host);
                        buffer.clear();
                        if state_override.is_some() {
                            return Ok(());
                        }
                        state = State::PathStart;
                        continue 'state_machine;
                    }
                    Some('\\') if parsed.is_special() => {
                        if buffer.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        let host = parse_host_buffer(&buffer, !parsed.is_special())?;
                        parsed.host = Some(host);
                        buffer.clear();
                        if state_override.is_some() {
                            return Ok(());
                        }
                        state = State::PathStart;
                        continue 'state_machine;
                    }
                    Some('[') => {
                        inside_brackets = true;
                        buffer.push('[');
                    }
                    Some(']') => {
                        inside_brackets = false;
                        buffer.push(']');
                    }
                    Some(ch) => buffer.push(ch),
                }
            }

            State::Port => match c!() {
                Some(ch) if ch.is_ascii_digit() => buffer.push(ch),
                None | Some('/') | Some('?') | Some('#') => {
                    if !buffer.is_empty() {
                        let port_num: u32 = buffer.parse().map_err(|_| ParseError::InvalidPort)?;
                        if port_num > 65535 {
                            return Err(ParseError::InvalidPort);
                        }
                        let port_num = port_num as u16;
                        parsed.port = if Some(port_num) == default_port(&parsed.scheme) {
                            None
                        } else {
                            Some(port_num)
                        };
                        buffer.clear();
                    }
                    if state_override.is_some() {
                        return Ok(());
                    }
                    state = State::PathStart;
                    continue 'state_machine;
                }
                Some('\\') if parsed.is_special() => {
                    if !buffer.is_empty() {
                        let port_num: u32 = buffer.parse().map_err(|_| ParseError::InvalidPort)?;
                        if port_num > 65535 {
                            return Err(ParseError::InvalidPort);
                        }
                        let port_num = port_num as u16;
                        parsed.port = if Some(port_num) == default_port(&parsed.scheme) {
                            None
                        } else {
                            Some(port_num)
                        };
                        buffer.clear();
                    }
                    if state_override.is_some() {
                        return Ok(());
                    }
                    state = State::PathStart;
                    continue 'state_machine;
                }
                _ => return Err(ParseError::InvalidPort),
            },

            State::File => {
                parsed.scheme = "file".to_owned();
                parsed.host = Some(Host::Domain(String::new()));
                match c!() {
                    Some('/') | Some('\\') => {
                        if c!() == Some('\\') {
                            violation(vfn, SyntaxViolation::Backslash);
                        }
                        state = State::FileSlash;
                    }
                    _ => {
                        if let Some(b) = base {
                            if b.scheme == "file" {
                                parsed.host = b.host.clone();
                                parsed.path = b.path.clone();
                                parsed.query = b.query.clone();
                                match c!() {
                                    Some('?') => {
                                        parsed.query = Some(String::new());
                                        state = State::Query;
                                        pointer += 1;
                                        continue 'state_machine;
                                    }
                                    Some('#') => {
                                        parsed.fragment = Some(String::new());
                                        state = State::Fragment;
                                        pointer += 1;
                                        continue 'state_machine;
                                    }
                                    None => return Ok(()),
                                    Some(_) => {
                                        parsed.query = None;
                                        if !windows_drive_letter_remaining(remaining_from!(0)) {
                                            shorten_path("file", &mut parsed.path);
                                        } else {
                                            violation(vfn, SyntaxViolation::NonUrlCodePoint);
                                            parsed.path.clear();
                                        }
                                        state = State::Path;
                                        continue 'state_machine;
                                    }
                                }
                            }
                        }
                        state = State::Path;
                        continue 'state_machine;
                    }
                }
            }

            State::FileSlash => match c!() {
                Some('/') | Some('\\') => {
                    if c!() == Some('\\') {
                        violation(vfn, SyntaxViolation::Backslash);
                    }
                    state = State::FileHost;
                }
                _ => {
                    if let Some(b) = base {
                        if b.scheme == "file" {
                            if !windows_drive_letter_remaining(remaining_from!(0)) {
                                if is_normalized_windows_drive_letter(
                                    b.path.first().map(String::as_str).unwrap_or(""),
                                ) {
                                    parsed.path.push(b.path[0].clone());
                                } else {
                                    parsed.host = b.host.clone();
                                }
                            }
                        }
                    }
                    state = State::Path;
                    continue 'state_machine;
                }
            },

            State::FileHost => match c!() {
                None | Some('/') | Some('\\') | Some('?') | Some('#') => {
                    if is_windows_drive_letter(&buffer) {
                        violation(vfn, SyntaxViolation::FileWithHostAndWindowsDrive);
                        parsed.path.push(buffer.clone());
                        buffer.clear();
                        state = State::Path;
                    } else if buffer.is_empty() {
                        parsed.host = Some(Host::Domain(String::new()));
                        if state_override.is_some() {
                            return Ok(());
                        }
                        state = State::PathStart;
                    } else {
                        let mut host = parse_host_buffer(&buffer, false)?;
                        if let Host::Domain(ref d) = host {
                            if d == "localhost" {
                                host = Host::Domain(String::new());
                            }
                        }
                        parsed.host = Some(host);
                        if state_override.is_some() {
                            return Ok(());
                        }
                        buffer.clear();
                        state = State::PathStart;
                    }
                    continue 'state_machine;
                }
                Some(ch) => buffer.push(ch),
            },

            State::PathStart => {
                if parsed.is_special() {
                    if c!() == Some('\\') {
                        violation(vfn, SyntaxViolation::Backslash);
                    }
                    state = State::Path;
                    if !matches!(c!(), Some('/') | Some('\\')) {
                        continue 'state_machine;
                    }
                } else if c!() == Some('?') {
                    parsed.query = Some(String::new());
                    state = State::Query;
                } else if c!() == Some('#') {
                    parsed.fragment = Some(String::new());
                    state = State::Fragment;
                } else {
                    state = State::Path;
                    if c!() != Some('/') {
                        continue 'state_machine;
                    }
                }
            }

            State::Path => {
                let is_special = parsed.is_special();
                match c!() {
                    None
                    | Some('/')
                    | Some('?')
                    | Some('#')
                    | Some('\\') if c!() != Some('\\') || is_special => {
                        if c!() == Some('\\') {
                            violation(vfn, SyntaxViolation::Backslash);
                        }
                        let lower = buffer.to_ascii_lowercase();
                        let is_double_dot = matches!(
                            lower.as_str(),
                            ".." | ".%2e" | "%2e." | "%2e%2e"
                        );
                        let is_single_dot = matches!(lower.as_str(), "." | "%2e");
                        if is_double_dot {
                            shorten_path(&parsed.scheme, &mut parsed.path);
                            if !matches!(c!(), Some('/')) && !(parsed.is_special() && c!() == Some('\\')) {
                                parsed.path.push(String::new());
                            }
                        } else if is_single_dot {
                            if !matches!(c!(), Some('/')) && !(parsed.is_special() && c!() == Some('\\')) {
                                parsed.path.push(String::new());
                            }
                        } else {
                            if parsed.scheme == "file"
                                && parsed.path.is_empty()
                                && is_windows_drive_letter(&buffer)
                            {
                                let bytes: Vec<char> = buffer.chars().collect();
                                let mut fixed = String::new();
                                fixed.push(bytes[0]);
                                fixed.push(':');
                                parsed.path.push(fixed);
                            } else {
                                parsed.path.push(buffer.clone());
                            }
                        }
                        buffer.clear();
                        match c!() {
                            Some('?') => {
                                parsed.query = Some(String::new());
                                state = State::Query;
                            }
                            Some('#') => {
                                parsed.fragment = Some(String::new());
                                state = State::Fragment;
                            }
                            None => {
                                if parsed.scheme == "file" {
                                    strip_leading_empty_path_segments(&mut parsed.path);
                                }
                                return Ok(());
                            }
                            _ => {}
                        }
                    }
                    Some(ch) => {
                        if !is_url_code_point(ch) && ch != '%' {
                            violation(vfn, SyntaxViolation::NonUrlCodePoint);
                        }
                        if ch == '%' && !remaining_is_hex_pair(remaining_from!(1)) {
                            violation(vfn, SyntaxViolation::PercentDecode);
                        }
                        let mut encoded = [0u8; 4];
                        let s = ch.encode_utf8(&mut encoded);
                        buffer.extend(utf8_percent_encode(s, PATH));
                    }
                }
            }

            State::CannotBeABaseUrlPath => match c!() {
                Some('?') => {
                    parsed.query = Some(String::new());
                    state = State::Query;
                }
                Some('#') => {
                    parsed.fragment = Some(String::new());
                    state = State::Fragment;
                }
                None => return Ok(()),
                Some(ch) => {
                    if ch != '%' && !is_url_code_point(ch) {
                        violation(vfn, SyntaxViolation::NonUrlCodePoint);
                    }
                    if ch == '%' && !remaining_is_hex_pair(remaining_from!(1)) {
                        violation(vfn, SyntaxViolation::PercentDecode);
                    }
                    let mut encoded_buf = [0u8; 4];
                    let s = ch.encode_utf8(&mut encoded_buf);
                    let encoded: String = utf8_percent_encode(s, percent_encoding::CONTROLS).collect();
                    if let Some(seg) = parsed.path.last_mut() {
                        seg.push_str(&encoded);
                    } else {
                        parsed.path.push(encoded);
                    }
                }
            },

            State::Query => {
                if state_override.is_none() && c!() == Some('#') {
                    parsed.fragment = Some(String::new());
                    state = State::Fragment;
                } else if let Some(ch) = c!() {
                    if !is_url_code_point(ch) && ch != '%' {
                        violation(vfn, SyntaxViolation::NonUrlCodePoint);
                    }
                    if ch == '%' && !remaining_is_hex_pair(remaining_from!(1)) {
                        violation(vfn, SyntaxViolation::PercentDecode);
                    }
                    let mut encoded_buf = [0u8; 4];
                    let s = ch.encode_utf8(&mut encoded_buf);
                    let is_special = parsed.is_special();
                    for byte in s.as_bytes() {
                        if query_byte_needs_encoding(*byte, is_special) {
                            let mut out = String::new();
                            percent_encoding::percent_encode_byte_to(*byte, &mut out)
                                .expect("writing to a String never fails");
                            buffer.push_str(&out);
                        } else {
                            buffer.push(*byte as char);
                        }
                    }
                } else {
                    parsed.query = Some(buffer.clone());
                    buffer.clear();
                    return Ok(());
                }
            }

            State::Fragment => match c!() {
                None => {
                    parsed.fragment = Some(buffer.clone());
                    return Ok(());
                }
                Some(ch) => {
                    if ch == '\0' {
                        violation(vfn, SyntaxViolation::NullInFragment);
                    } else {
                        if !is_url_code_point(ch) && ch != '%' {
                            violation(vfn, SyntaxViolation::NonUrlCodePoint);
                        }
                        if ch == '%' && !remaining_is_hex_pair(remaining_from!(1)) {
                            violation(vfn, SyntaxViolation::PercentDecode);
                        }
                        let mut encoded_buf = [0u8; 4];
                        let s = ch.encode_utf8(&mut encoded_buf);
                        buffer.extend(utf8_percent_encode(s, FRAGMENT));
                    }
                }
            },
        }

        // Flush a query buffer into parsed.query as soon as we reach EOF
        // while in the Query state but didn't already return (handled above).
        if pointer >= len && !matches!(state, State::Query | State::Fragment) {
            // Most states return explicitly at EOF; this is a safety net
            // for any state reached exactly at EOF that falls through
            // without an explicit branch above (shouldn't normally trigger).
        }

        pointer += 1;
    }
}

impl Parsed {
    fn has_nonempty_username_password_or_port(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty() || self.port.is_some()
    }
}

fn parse_host_buffer(buffer: &str, is_not_special: bool) -> ParseResult<Host<String>> {
    if is_not_special {
        Host::parse_opaque(buffer)
    } else {
        Host::parse(buffer)
    }
}

fn windows_drive_letter_remaining(remaining: &[char]) -> bool {
    match remaining {
        [a, b, ..] if a.is_ascii_alphabetic() && matches!(b, ':' | '|') => {
            remaining.len() == 2 || matches!(remaining[2], '/' | '\\' | '?' | '#')
        }
        _ => false,
    }
}

fn remaining_is_hex_pair(remaining: &[char]) -> bool {
    remaining.len() >= 2
        && remaining[0].is_ascii_hexdigit()
        && remaining[1].is_ascii_hexdigit()
}

/// Conservative approximation of "URL code point" used only to decide
/// whether to emit the (non-fatal) `NonUrlCodePoint` validation error.
fn is_url_code_point(c: char) -> bool {
    matches!(c,
        'a'..='z' | 'A'..='Z' | '0'..='9'
        | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | '-' | '.' | '/' | ':'
        | ';' | '=' | '?' | '@' | '_' | '~' | '%'
    ) || c as u32 >= 0xA0 && !matches!(c as u32, 0xFDD0..=0xFDEF) && (c as u32) & 0xFFFE != 0xFFFE
}

/// <https://url.spec.whatwg.org/#path-state> EOF branch for `file` URLs:
/// strip leading empty segments while more than one remains, to undo
/// the extra empty segment `path state` can leave for inputs like
/// `file:///\/\`.
fn strip_leading_empty_path_segments(path: &mut Vec<String>) {
    while path.len() > 1 && path[0].is_empty() {
        path.remove(0);
    }
}

/// A single byte, percent-encoded to `%HH`, used by `percent_encoding`'s
/// `percent_decode` as the base of percent-decode-and-UTF8-decode used by
/// the host parser.
#[allow(dead_code)]
fn percent_decode_to_string(input: &str) -> String {
    percent_decode(input.as_bytes()).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Parsed {
        parse_url(input, None, None).unwrap()
    }

    #[test]
    fn basic_parse() {
        let p = parse("https://example.org/a/b?x=1#f");
        assert_eq!(p.scheme, "https");
        assert_eq!(p.path, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(p.query.as_deref(), Some("x=1"));
        assert_eq!(p.fragment.as_deref(), Some("f"));
    }

    #[test]
    fn default_port_is_normalized_away() {
        let p = parse("http://example.org:80/");
        assert_eq!(p.port, None);
    }

    #[test]
    fn file_windows_drive_letter_pipe_becomes_colon() {
        let p = parse("file:///c|/foo");
        assert_eq!(p.path, vec!["c:".to_string(), "foo".to_string()]);
    }

    #[test]
    fn relative_url_without_base_fails() {
        assert!(parse_url("/x", None, None).is_err());
    }

    #[test]
    fn cannot_be_a_base_mailto() {
        let p = parse("mailto:a@b");
        assert!(p.cannot_be_a_base);
        assert_eq!(p.path, vec!["a@b".to_string()]);
    }
}
