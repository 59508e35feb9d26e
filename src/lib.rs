//! Sticky-Shard Container Edge Router
//!
//! A thin edge router in front of a platform-managed container runtime.
//! Incoming requests are pinned to a backend container instance via an
//! affinity cookie, gated on backend readiness during cold starts, and
//! forwarded verbatim.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                 SHARD ROUTER                  │
//!                     │                                               │
//!   Client Request    │  ┌─────────┐   ┌───────────┐   ┌──────────┐  │
//!   ──────────────────┼─▶│  http   │──▶│ affinity  │──▶│ runtime  │  │
//!                     │  │ server  │   │ resolver  │   │  handle  │  │
//!                     │  └─────────┘   └───────────┘   └────┬─────┘  │
//!                     │                                     │        │
//!                     │                                     ▼        │
//!                     │                              ┌───────────┐   │
//!   Client Response   │                              │ readiness │   │
//!   ◀─────────────────┼──── relay + Set-Cookie ◀─────│   gate    │◀──┼── Container
//!                     │                              └───────────┘   │    Instance
//!                     │                                               │
//!                     │  ┌─────────────────────────────────────────┐ │
//!                     │  │          Cross-Cutting Concerns          │ │
//!                     │  │  config · observability · lifecycle      │ │
//!                     │  └─────────────────────────────────────────┘ │
//!                     └──────────────────────────────────────────────┘
//! ```
//!
//! The container runtime itself (instance lifecycle, scheduling,
//! networking) is an external collaborator reached through the
//! [`runtime::ContainerRuntime`] seam. The router holds no state across
//! requests; affinity lives entirely in the client-held cookie.

// Core subsystems
pub mod affinity;
pub mod config;
pub mod http;
pub mod readiness;
pub mod runtime;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
