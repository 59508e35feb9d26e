//! Container runtime collaborator seam.
//!
//! # Data Flow
//! ```text
//! backend instance name ("client-<shard>")
//!     → ContainerRuntime::handle (name → network identity)
//!     → ContainerHandle::start (idempotent warm-up signal)
//!     → ContainerHandle::fetch (opaque request/response passthrough)
//! ```
//!
//! # Design Decisions
//! - The runtime owns instance lifecycle and the one-instance-per-name
//!   invariant; this crate only consumes the two capabilities above
//! - Traits are the unit-test seam; production uses the HTTP impl in
//!   `http.rs`
//! - Static dispatch throughout: the server is generic over the runtime

pub mod http;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use thiserror::Error;

pub use http::{HttpContainerHandle, HttpContainerRuntime};

/// Failures talking to the container runtime or a backend instance.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The configured mapping produced no usable authority for a name.
    #[error("no valid authority for instance {name}: {reason}")]
    Authority { name: String, reason: String },

    /// Transport-level failure reaching the backend (connection refused,
    /// reset, DNS). Retryable from the readiness gate's point of view.
    #[error("backend request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    /// The forwarded request could not be reconstructed.
    #[error("invalid upstream request: {0}")]
    Request(#[from] axum::http::Error),

    /// The control plane rejected the start signal.
    #[error("start signal rejected with status {0}")]
    StartRejected(StatusCode),
}

/// A handle to one named backend container instance.
///
/// Futures stay `Send` through auto-trait leakage because callers are
/// monomorphized over concrete handle types; no boxed dispatch here.
#[allow(async_fn_in_trait)]
pub trait ContainerHandle: Send + Sync {
    /// Issue the idempotent warm-up signal. Returns quickly when the
    /// instance is already running.
    async fn start(&self) -> Result<(), RuntimeError>;

    /// Forward a request to the instance and return its response.
    async fn fetch(&self, req: Request<Body>) -> Result<Response<Body>, RuntimeError>;
}

/// Access to the runtime's namespace of backend instances.
pub trait ContainerRuntime: Send + Sync {
    type Handle: ContainerHandle;

    /// Obtain a handle to the instance with the given routing key.
    fn handle(&self, name: &str) -> Result<Self::Handle, RuntimeError>;
}
