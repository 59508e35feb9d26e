//! Request cookie parsing.
//!
//! # Responsibilities
//! - Parse a single `Cookie` header line into a name → value map
//! - Percent-decode names and values
//! - Recover silently from malformed segments
//!
//! # Design Decisions
//! - Keys are case-sensitive, last-write-wins on duplicates
//! - A segment with no `=` or an empty name is skipped, not an error
//! - No cookie-attribute handling: request cookies carry pairs only

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// Per-request cookie jar. Ephemeral, rebuilt for every request.
pub type CookieJar = HashMap<String, String>;

/// Parse a `Cookie` header line into a jar.
///
/// A missing header yields an empty jar, which the resolver treats as
/// "no existing assignment".
pub fn parse_cookie_header(header: Option<&str>) -> CookieJar {
    let mut jar = CookieJar::new();
    let Some(header) = header else {
        return jar;
    };

    for segment in header.split(';') {
        let segment = segment.trim();
        let Some(eq) = segment.find('=') else {
            continue;
        };
        if eq == 0 {
            continue;
        }
        let (name, value) = (&segment[..eq], &segment[eq + 1..]);
        let (Ok(name), Ok(value)) = (
            percent_decode_str(name).decode_utf8(),
            percent_decode_str(value).decode_utf8(),
        ) else {
            continue;
        };
        jar.insert(name.into_owned(), value.into_owned());
    }

    jar
}
