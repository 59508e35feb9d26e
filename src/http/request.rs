//! Request identification.
//!
//! # Responsibilities
//! - Assign each request a unique ID (UUID v4) as early as possible
//! - Preserve an ID supplied by an upstream edge
//!
//! # Design Decisions
//! - Pure passthrough layer: no allocation when the header is present
//! - The ID is forwarded to the backend unchanged for correlation

use std::task::{Context, Poll};

use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that stamps `x-request-id` onto incoming requests.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Middleware service produced by [`RequestIdLayer`].
#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if !req.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            // A fresh UUID is always a valid header value.
            let value = HeaderValue::from_str(&id).expect("uuid header value");
            req.headers_mut().insert(X_REQUEST_ID, value);
        }
        self.inner.call(req)
    }
}
