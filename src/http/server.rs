//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the single catch-all handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Resolve sticky affinity and gate on backend readiness
//! - Forward requests verbatim to the resolved container instance
//! - Relay responses, appending the affinity cookie on fresh pins
//!
//! The router is stateless by design: nothing here survives a request
//! except the shared upstream client's connection pool. Any edge node
//! can handle any request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::affinity::{self, cookie};
use crate::config::RouterConfig;
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::lifecycle::signals;
use crate::observability::metrics;
use crate::readiness;
use crate::runtime::{ContainerHandle, ContainerRuntime, HttpContainerRuntime};

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RouterConfig>,
    pub runtime: HttpContainerRuntime,
}

/// HTTP server for the shard router.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig) -> Self {
        let runtime = HttpContainerRuntime::new(config.runtime.clone());
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);

        let state = AppState {
            config: Arc::new(config),
            runtime,
        };

        let router = Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// Run the server, accepting connections on the given listener
    /// until an OS signal or the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let shutdown_future = async move {
            tokio::select! {
                _ = signals::shutdown_signal() => {}
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown requested via channel");
                }
            }
        };

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_future)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main edge handler: affinity → handle → readiness gate → forward.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().to_string();

    // 1. Sticky shard resolution from the request's cookie jar.
    let jar = cookie::parse_cookie_header(
        request
            .headers()
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok()),
    );
    let resolution = affinity::resolve(&jar, state.config.affinity.instance_count);
    let backend = resolution.backend_name.clone();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %request.uri().path(),
        backend = %backend,
        fresh_pin = resolution.set_cookie.is_some(),
        "Routing request"
    );

    // 2. Obtain the named instance handle from the runtime.
    let handle = match state.runtime.handle(&backend) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(request_id = %request_id, backend = %backend, error = %e, "Instance resolution failed");
            metrics::record_request(&method, 502, &backend, start_time);
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };

    // 3. Readiness gate, or a best-effort start when gating is off.
    if state.config.readiness.enabled {
        let gate_start = Instant::now();
        match readiness::ensure_ready(&handle, &state.config.readiness).await {
            Ok(()) => metrics::record_readiness_wait(&backend, gate_start),
            Err(e) => {
                tracing::warn!(request_id = %request_id, backend = %backend, error = %e, "Backend never became ready");
                metrics::record_readiness_timeout(&backend);
                metrics::record_request(&method, 503, &backend, start_time);
                return readiness::unavailable_response(&e);
            }
        }
    } else if let Err(e) = handle.start().await {
        // Fire-and-forget contract: a failed start signal is swallowed
        // and the forward decides the outcome.
        tracing::debug!(request_id = %request_id, backend = %backend, error = %e, "Start signal failed");
    }

    // 4. Forward the original request verbatim and relay the response.
    match handle.fetch(request).await {
        Ok(mut response) => {
            if let Some(cookie) = &resolution.set_cookie {
                match HeaderValue::from_str(cookie) {
                    // Append, never replace: the backend's own cookies
                    // must survive.
                    Ok(value) => {
                        response.headers_mut().append(header::SET_COOKIE, value);
                    }
                    Err(e) => {
                        tracing::error!(request_id = %request_id, error = %e, "Affinity cookie not header-safe")
                    }
                }
            }
            let status = response.status().as_u16();
            metrics::record_request(&method, status, &backend, start_time);
            tracing::debug!(request_id = %request_id, backend = %backend, status, "Request relayed");
            response.into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, backend = %backend, error = %e, "Upstream error");
            metrics::record_request(&method, 502, &backend, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
