// Copyright 2013-2014 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Data-driven tests exercising `Url` parsing and the `quirks` accessors
//! against a table of (base, input) -> expected attribute scenarios drawn
//! from the WHATWG URL Standard's own examples.

use url::{quirks, Url};

struct Case {
    base: &'static str,
    input: &'static str,
    href: &'static str,
    protocol: &'static str,
    username: &'static str,
    password: &'static str,
    hostname: &'static str,
    port: &'static str,
    pathname: &'static str,
    search: &'static str,
    hash: &'static str,
}

const CASES: &[Case] = &[
    Case {
        base: "about:blank",
        input: "https://example.org/foo/bar?baz#quux",
        href: "https://example.org/foo/bar?baz#quux",
        protocol: "https:",
        username: "",
        password: "",
        hostname: "example.org",
        port: "",
        pathname: "/foo/bar",
        search: "?baz",
        hash: "#quux",
    },
    Case {
        base: "about:blank",
        input: "https://user:pw@example.org:8080/a/b",
        href: "https://user:pw@example.org:8080/a/b",
        protocol: "https:",
        username: "user",
        password: "pw",
        hostname: "example.org",
        port: "8080",
        pathname: "/a/b",
        search: "",
        hash: "",
    },
    Case {
        base: "https://example.org/a/b/c",
        input: "../d",
        href: "https://example.org/a/d",
        protocol: "https:",
        username: "",
        password: "",
        hostname: "example.org",
        port: "",
        pathname: "/a/d",
        search: "",
        hash: "",
    },
    Case {
        base: "https://example.org/a/b",
        input: "?q=1",
        href: "https://example.org/a/b?q=1",
        protocol: "https:",
        username: "",
        password: "",
        hostname: "example.org",
        port: "",
        pathname: "/a/b",
        search: "?q=1",
        hash: "",
    },
    Case {
        base: "about:blank",
        input: "file:///c:/temp/x",
        href: "file:///c:/temp/x",
        protocol: "file:",
        username: "",
        password: "",
        hostname: "",
        port: "",
        pathname: "/c:/temp/x",
        search: "",
        hash: "",
    },
    Case {
        base: "about:blank",
        input: "https://[::1]:9000/",
        href: "https://[::1]:9000/",
        protocol: "https:",
        username: "",
        password: "",
        hostname: "[::1]",
        port: "9000",
        pathname: "/",
        search: "",
        hash: "",
    },
];

#[test]
fn urltestdata() {
    for case in CASES {
        let base = Url::parse(case.base).unwrap();
        let url = base
            .join(case.input)
            .unwrap_or_else(|e| panic!("failed to join {:?} onto {:?}: {}", case.input, case.base, e));
        url.check_invariants()
            .unwrap_or_else(|e| panic!("invariants broken for {:?}: {}", case.input, e));

        assert_eq!(quirks::href(&url), case.href, "href for {:?}", case.input);
        assert_eq!(quirks::protocol(&url), case.protocol, "protocol for {:?}", case.input);
        assert_eq!(quirks::username(&url), case.username, "username for {:?}", case.input);
        assert_eq!(quirks::password(&url), case.password, "password for {:?}", case.input);
        assert_eq!(quirks::hostname(&url), case.hostname, "hostname for {:?}", case.input);
        assert_eq!(quirks::port(&url), case.port, "port for {:?}", case.input);
        assert_eq!(quirks::pathname(&url), case.pathname, "pathname for {:?}", case.input);
        assert_eq!(quirks::search(&url), case.search, "search for {:?}", case.input);
        assert_eq!(quirks::hash(&url), case.hash, "hash for {:?}", case.input);

        #[cfg(feature = "serde")]
        {
            let bytes = serde_json::to_vec(&url).unwrap();
            let round_tripped: Url = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(url, round_tripped, "serde round-trip for {:?}", case.input);
        }
    }
}

struct SetterCase {
    href: &'static str,
    attr: &'static str,
    new_value: &'static str,
    expected_href: &'static str,
}

const SETTER_CASES: &[SetterCase] = &[
    SetterCase {
        href: "https://example.org/a",
        attr: "protocol",
        new_value: "http",
        expected_href: "http://example.org/a",
    },
    SetterCase {
        href: "https://example.org/",
        attr: "pathname",
        new_value: "/new/path",
        expected_href: "https://example.org/new/path",
    },
    SetterCase {
        href: "https://example.org/a",
        attr: "search",
        new_value: "x=1",
        expected_href: "https://example.org/a?x=1",
    },
    SetterCase {
        href: "https://example.org/a",
        attr: "hash",
        new_value: "top",
        expected_href: "https://example.org/a#top",
    },
    SetterCase {
        href: "https://example.org/a",
        attr: "port",
        new_value: "9000",
        expected_href: "https://example.org:9000/a",
    },
    SetterCase {
        href: "https://example.org/a",
        attr: "hostname",
        new_value: "example.com",
        expected_href: "https://example.com/a",
    },
    SetterCase {
        href: "https://example.org/a",
        attr: "username",
        new_value: "u",
        expected_href: "https://u@example.org/a",
    },
];

#[test]
fn setters_tests() {
    for case in SETTER_CASES {
        let mut url = Url::parse(case.href).unwrap();
        match case.attr {
            "protocol" => quirks::set_protocol(&mut url, case.new_value),
            "pathname" => quirks::set_pathname(&mut url, case.new_value),
            "search" => quirks::set_search(&mut url, case.new_value),
            "hash" => quirks::set_hash(&mut url, case.new_value),
            "port" => quirks::set_port(&mut url, case.new_value).unwrap(),
            "hostname" => quirks::set_hostname(&mut url, case.new_value).unwrap(),
            "username" => quirks::set_username(&mut url, case.new_value).unwrap(),
            other => panic!("unknown attribute in test table: {}", other),
        }
        url.check_invariants()
            .unwrap_or_else(|e| panic!("invariants broken after setting {}: {}", case.attr, e));
        assert_eq!(quirks::href(&url), case.expected_href, "href after setting {}", case.attr);
    }
}
