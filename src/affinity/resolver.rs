//! Shard resolution with cookie-based stickiness.
//!
//! # Responsibilities
//! - Reuse a pinned shard from the affinity cookie when present
//! - Otherwise draw a shard uniformly and issue a Set-Cookie instruction
//! - Map the shard onto the runtime's instance namespace
//!
//! # Design Decisions
//! - A non-empty cookie value is reused verbatim, with no bounds check
//!   against the current instance count: shrinking the pool must not
//!   remap live sessions
//! - The cookie is host-only (no Domain attribute), HttpOnly, SameSite=Lax

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use rand::Rng;

use crate::affinity::cookie::CookieJar;

/// Name of the client-visible affinity cookie.
pub const AFFINITY_COOKIE: &str = "SZZD_CONTAINER";

/// Cookie lifetime in seconds (24 hours).
const COOKIE_MAX_AGE_SECS: u32 = 86_400;

/// Characters percent-encoded in the cookie value, beyond controls.
/// Covers the cookie-octet exclusions plus `%` so decoding is an
/// exact inverse.
const COOKIE_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b',')
    .add(b';')
    .add(b'\\')
    .add(b'%');

/// Outcome of shard resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Routing key into the runtime's namespace: `client-<shard>`.
    pub backend_name: String,

    /// Full `Set-Cookie` header value to append when this request got a
    /// fresh assignment. `None` when an existing pin was reused.
    pub set_cookie: Option<String>,
}

/// Resolve the backend instance name for a request.
///
/// `instance_count` comes straight from configuration; zero or negative
/// values are clamped to 1 only when drawing a new shard.
pub fn resolve(jar: &CookieJar, instance_count: i64) -> Resolution {
    if let Some(shard) = jar.get(AFFINITY_COOKIE).filter(|v| !v.is_empty()) {
        return Resolution {
            backend_name: backend_name(shard),
            set_cookie: None,
        };
    }

    let buckets = instance_count.max(1) as u64;
    let shard = rand::thread_rng().gen_range(0..buckets).to_string();
    let encoded = utf8_percent_encode(&shard, COOKIE_VALUE);
    let set_cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        AFFINITY_COOKIE, encoded, COOKIE_MAX_AGE_SECS
    );

    Resolution {
        backend_name: backend_name(&shard),
        set_cookie: Some(set_cookie),
    }
}

fn backend_name(shard: &str) -> String {
    format!("client-{}", shard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affinity::cookie::parse_cookie_header;

    #[test]
    fn existing_cookie_reused_without_set_cookie() {
        let jar = parse_cookie_header(Some("SZZD_CONTAINER=2"));
        let res = resolve(&jar, 8);
        assert_eq!(res.backend_name, "client-2");
        assert!(res.set_cookie.is_none());
    }

    #[test]
    fn out_of_range_cookie_still_honored() {
        // A shrunk pool must not remap pinned sessions.
        let jar = parse_cookie_header(Some("SZZD_CONTAINER=7"));
        let res = resolve(&jar, 2);
        assert_eq!(res.backend_name, "client-7");
        assert!(res.set_cookie.is_none());
    }

    #[test]
    fn empty_cookie_value_gets_new_assignment() {
        let jar = parse_cookie_header(Some("SZZD_CONTAINER="));
        let res = resolve(&jar, 1);
        assert_eq!(res.backend_name, "client-0");
        assert!(res.set_cookie.is_some());
    }

    #[test]
    fn new_assignment_within_range() {
        let jar = CookieJar::new();
        for _ in 0..50 {
            let res = resolve(&jar, 3);
            let shard: u64 = res
                .backend_name
                .strip_prefix("client-")
                .unwrap()
                .parse()
                .unwrap();
            assert!(shard < 3);
            let cookie = res.set_cookie.unwrap();
            assert!(cookie.starts_with(&format!("SZZD_CONTAINER={}", shard)));
            assert!(cookie.contains("Path=/"));
            assert!(cookie.contains("Max-Age=86400"));
            assert!(cookie.contains("HttpOnly"));
            assert!(cookie.contains("SameSite=Lax"));
            assert!(!cookie.contains("Domain"));
        }
    }

    #[test]
    fn nonpositive_count_clamped_to_one() {
        let jar = CookieJar::new();
        for count in [0, -5] {
            let res = resolve(&jar, count);
            assert_eq!(res.backend_name, "client-0");
        }
    }

    #[test]
    fn cookie_value_round_trips_through_parser() {
        let jar = CookieJar::new();
        let res = resolve(&jar, 10);
        let cookie = res.set_cookie.unwrap();
        let pair = cookie.split(';').next().unwrap();

        let parsed = parse_cookie_header(Some(pair));
        let replay = resolve(&parsed, 10);
        assert_eq!(replay.backend_name, res.backend_name);
        assert!(replay.set_cookie.is_none());
    }
}
