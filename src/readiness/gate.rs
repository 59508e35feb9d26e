//! Bounded readiness polling.
//!
//! # Responsibilities
//! - Issue the idempotent start signal exactly once per invocation
//! - Probe the backend until it proves it is listening
//! - Enforce the wall-clock deadline and surface the last probe error
//!
//! # State machine (per invocation, never persisted)
//! ```text
//! Starting → Probing → { Ready, TimedOut }
//! ```

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use tokio::time::{sleep, timeout, Instant};

use crate::config::ReadinessConfig;
use crate::runtime::ContainerHandle;

/// Diagnostic header attached to the transient-unavailable response.
pub const CONTAINER_STATE_HEADER: &str = "x-container-state";

/// The gate's sole failure mode: the backend never proved it was
/// listening within the wall-clock budget.
#[derive(Debug)]
pub struct ReadinessError {
    /// How long the gate waited before giving up.
    pub waited: Duration,
    /// Last start or probe failure observed, for diagnostics.
    pub last_error: Option<String>,
}

impl std::fmt::Display for ReadinessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "backend instance not ready within {} ms",
            self.waited.as_millis()
        )?;
        if let Some(cause) = &self.last_error {
            write!(f, "; last error: {}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ReadinessError {}

/// Wait until the backend behind `handle` accepts connections.
///
/// Starts the instance, then polls `GET <probe_path>` at a fixed
/// interval. Any status in `[200, 499]` counts as ready: a 404 from the
/// application still proves the process is listening, while 5xx keeps a
/// crash-looping backend gated. Returns within one poll interval past
/// the configured deadline.
pub async fn ensure_ready<H: ContainerHandle>(
    handle: &H,
    config: &ReadinessConfig,
) -> Result<(), ReadinessError> {
    let entered = Instant::now();
    let deadline = entered + Duration::from_millis(config.timeout_ms);
    let interval = Duration::from_millis(config.poll_interval_ms);

    let mut last_error = match handle.start().await {
        Ok(()) => None,
        // The probe loop decides readiness; a failed start only shapes
        // the eventual timeout diagnostic.
        Err(e) => {
            tracing::debug!(error = %e, "start signal failed, probing anyway");
            Some(e.to_string())
        }
    };

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(ReadinessError {
                waited: entered.elapsed(),
                last_error,
            });
        }

        match probe(handle, &config.probe_path, remaining).await {
            Ok(status) if (200..=499).contains(&status.as_u16()) => {
                tracing::debug!(status = %status, waited_ms = entered.elapsed().as_millis() as u64, "backend ready");
                return Ok(());
            }
            Ok(status) => {
                last_error = Some(format!("probe returned status {}", status));
            }
            Err(cause) => {
                last_error = Some(cause);
            }
        }

        if Instant::now() >= deadline {
            return Err(ReadinessError {
                waited: entered.elapsed(),
                last_error,
            });
        }
        sleep(interval).await;
    }
}

/// One probe attempt: a synthetic GET that only tests the socket.
async fn probe<H: ContainerHandle>(
    handle: &H,
    path: &str,
    budget: Duration,
) -> Result<StatusCode, String> {
    let req = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(header::USER_AGENT, "shard-router-probe")
        .body(Body::empty())
        .map_err(|e| e.to_string())?;

    match timeout(budget, handle.fetch(req)).await {
        Ok(Ok(resp)) => Ok(resp.status()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("probe timed out after {} ms", budget.as_millis())),
    }
}

/// Build the client-visible transient-failure response for a gate
/// timeout: 503, uncacheable, flagged as a still-starting container.
pub fn unavailable_response(err: &ReadinessError) -> Response<Body> {
    Response::builder()
        .status(StatusCode::SERVICE_UNAVAILABLE)
        .header(header::CACHE_CONTROL, "no-store")
        .header(CONTAINER_STATE_HEADER, "starting")
        .body(Body::from(format!("container is starting: {}", err)))
        .expect("static response construction")
}
