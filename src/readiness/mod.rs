//! Readiness gating subsystem.
//!
//! # Data Flow
//! ```text
//! resolved instance handle
//!     → gate.rs: start() once, then probe GET <probe_path>
//!     → status in [200, 499]        → Ready, forward real traffic
//!     → 5xx / transport failure     → sleep fixed interval, retry
//!     → deadline exceeded           → ReadinessError::Timeout → 503
//! ```
//!
//! # Design Decisions
//! - The readiness bar is "process is listening", not "process is
//!   healthy": a 404 from the application proves the stack serves
//! - Fixed-interval polling, bounded by wall clock rather than attempt
//!   count; cold starts resolve monotonically so adaptive backoff buys
//!   nothing
//! - Timeout is the sole user-visible failure and maps to a 503 that
//!   must never be cached

pub mod gate;

pub use gate::{ensure_ready, unavailable_response, ReadinessError, CONTAINER_STATE_HEADER};
