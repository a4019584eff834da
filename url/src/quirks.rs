// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Getters and setters matching the URL interface's IDL attributes,
//! <https://url.spec.whatwg.org/#api>, as used by `URL`/`Location` bindings
//! in a JavaScript engine.
//!
//! These differ from `Url`'s own methods in naming and in a few behavioral
//! corners: setters here silently ignore a bad new value rather than
//! returning a `Result`, mirroring the IDL setter steps, which swallow
//! syntax errors instead of throwing.

use alloc::format;
use alloc::string::String;

use crate::{ParseError, Url};

/// Getter for <https://url.spec.whatwg.org/#dom-url-href>
#[inline]
pub fn href(url: &Url) -> &str {
    url.as_str()
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-href>
#[inline]
pub fn set_href(url: &mut Url, value: &str) -> Result<(), ParseError> {
    *url = Url::parse(value)?;
    Ok(())
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-origin>
pub fn origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-protocol>
///
/// Includes the trailing `:`.
pub fn protocol(url: &Url) -> String {
    format!("{}:", url.scheme())
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-protocol>
pub fn set_protocol(url: &mut Url, new_protocol: &str) {
    let scheme = new_protocol.trim_end_matches(':');
    let _ = url.set_scheme(scheme);
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-username>
#[inline]
pub fn username(url: &Url) -> &str {
    url.username()
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-username>
pub fn set_username(url: &mut Url, new_username: &str) -> Result<(), ()> {
    url.set_username(new_username)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-password>
#[inline]
pub fn password(url: &Url) -> &str {
    url.password().unwrap_or("")
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-password>
pub fn set_password(url: &mut Url, new_password: &str) -> Result<(), ()> {
    url.set_password(new_password)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-host>
///
/// The host and, if present, a `:`-joined port. Owned rather than borrowed,
/// since this crate keeps host and port as separate fields rather than a
/// contiguous slice of one canonical string.
pub fn host(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => alloc::format!("{}:{}", host, port),
        (Some(host), None) => alloc::string::ToString::to_string(host),
        (None, _) => String::new(),
    }
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-host>
///
/// Accepts an optional `:port` suffix, same as the `host` attribute's setter
/// steps (which reuse the basic URL parser's `host` state followed by `port`).
pub fn set_host(url: &mut Url, new_host: &str) -> Result<(), ()> {
    if url.cannot_be_a_base() {
        return Err(());
    }
    if new_host.is_empty() {
        return url.set_host(None).map_err(|_| ());
    }
    let (host_part, port_part) = if new_host.starts_with('[') {
        match new_host.find(']') {
            Some(bracket_end) => match new_host[bracket_end + 1..].strip_prefix(':') {
                Some(p) => (&new_host[..=bracket_end], Some(p)),
                None => (new_host, None),
            },
            None => (new_host, None),
        }
    } else {
        match new_host.rfind(':') {
            Some(i) => (&new_host[..i], Some(&new_host[i + 1..])),
            None => (new_host, None),
        }
    };
    url.set_host(Some(host_part)).map_err(|_| ())?;
    match port_part {
        Some(p) if !p.is_empty() => {
            let port: u16 = p.parse().map_err(|_| ())?;
            url.set_port(Some(port))
        }
        _ => Ok(()),
    }
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-hostname>
#[inline]
pub fn hostname(url: &Url) -> &str {
    url.host_str().unwrap_or("")
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-hostname>
pub fn set_hostname(url: &mut Url, new_hostname: &str) -> Result<(), ()> {
    if url.cannot_be_a_base() {
        return Err(());
    }
    if new_hostname.is_empty() {
        url.set_host(None).map_err(|_| ())
    } else {
        url.set_host(Some(new_hostname)).map_err(|_| ())
    }
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-port>
pub fn port(url: &Url) -> String {
    match url.port() {
        Some(p) => alloc::string::ToString::to_string(&p),
        None => String::new(),
    }
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-port>
pub fn set_port(url: &mut Url, new_port: &str) -> Result<(), ()> {
    if new_port.is_empty() {
        return url.set_port(None);
    }
    let port: u16 = new_port.parse().map_err(|_| ())?;
    url.set_port(Some(port))
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-pathname>
#[inline]
pub fn pathname(url: &Url) -> &str {
    url.path()
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-pathname>
pub fn set_pathname(url: &mut Url, new_pathname: &str) {
    url.set_path(new_pathname)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-search>
///
/// Includes a leading `?` unless the query is absent or empty.
pub fn search(url: &Url) -> String {
    match url.query() {
        Some(q) if !q.is_empty() => alloc::format!("?{}", q),
        _ => String::new(),
    }
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-search>
pub fn set_search(url: &mut Url, new_search: &str) {
    let trimmed = new_search.trim_start_matches('?');
    if trimmed.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(trimmed));
    }
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-hash>
///
/// Includes a leading `#` unless the fragment is absent or empty.
pub fn hash(url: &Url) -> String {
    match url.fragment() {
        Some(f) if !f.is_empty() => alloc::format!("#{}", f),
        _ => String::new(),
    }
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-hash>
pub fn set_hash(url: &mut Url, new_hash: &str) {
    let trimmed = new_hash.trim_start_matches('#');
    if trimmed.is_empty() {
        url.set_fragment(None);
    } else {
        url.set_fragment(Some(trimmed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_and_host_roundtrip() {
        let url = Url::parse("https://user:pw@example.org:8080/a?q=1#f").unwrap();
        assert_eq!(protocol(&url), "https:");
        assert_eq!(username(&url), "user");
        assert_eq!(password(&url), "pw");
        assert_eq!(host(&url), "example.org:8080");
        assert_eq!(hostname(&url), "example.org");
        assert_eq!(port(&url), "8080");
        assert_eq!(pathname(&url), "/a");
        assert_eq!(search(&url), "?q=1");
        assert_eq!(hash(&url), "#f");
    }

    #[test]
    fn setters_mutate_in_place() {
        let mut url = Url::parse("http://example.org/").unwrap();
        set_protocol(&mut url, "https:");
        assert_eq!(url.scheme(), "https");
        set_pathname(&mut url, "/a/b");
        assert_eq!(pathname(&url), "/a/b");
        set_search(&mut url, "x=1");
        assert_eq!(search(&url), "?x=1");
        set_hash(&mut url, "top");
        assert_eq!(hash(&url), "#top");
        set_port(&mut url, "9000").unwrap();
        assert_eq!(port(&url), "9000");
    }

    #[test]
    fn empty_search_and_hash_have_no_punctuation() {
        let url = Url::parse("https://example.org/").unwrap();
        assert_eq!(search(&url), "");
        assert_eq!(hash(&url), "");
    }
}
