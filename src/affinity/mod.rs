//! Sticky-session affinity subsystem.
//!
//! # Data Flow
//! ```text
//! Cookie header line
//!     → cookie.rs (parse into per-request jar)
//!     → resolver.rs (reuse pinned shard, or draw a new one)
//!     → Resolution: backend instance name + optional Set-Cookie
//! ```
//!
//! # Design Decisions
//! - The jar is ephemeral, rebuilt per request; the only durable state
//!   is the client-held cookie
//! - A previously issued shard id is honored verbatim even if the
//!   instance count has since shrunk (remapping would break live
//!   sessions)
//! - Selection is a uniform random draw, never load-based

pub mod cookie;
pub mod resolver;

pub use cookie::CookieJar;
pub use resolver::{resolve, Resolution, AFFINITY_COOKIE};
