//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route)
//!     → request.rs (add request ID)
//!     → affinity resolver (cookie → backend instance name)
//!     → runtime handle + readiness gate
//!     → forward verbatim, relay response (+ Set-Cookie on fresh pin)
//! ```

pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
