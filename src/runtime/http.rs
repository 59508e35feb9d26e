//! HTTP implementation of the runtime seam.
//!
//! # Responsibilities
//! - Map instance names onto network authorities (explicit map first,
//!   then the `{name}` template, default port appended when absent)
//! - Forward requests verbatim through a shared hyper client
//! - Deliver the start signal to the control plane when configured
//!
//! # Design Decisions
//! - One client (and its connection pool) per runtime, cloned into
//!   handles; handles themselves are cheap per-request values
//! - Authority is validated when the handle is created, so the probe
//!   loop never re-parses it

use axum::body::Body;
use axum::http::uri::{Authority, Scheme};
use axum::http::{Method, Request, Response, Uri};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::RuntimeConfig;
use crate::runtime::{ContainerHandle, ContainerRuntime, RuntimeError};

/// Production runtime: names resolve to HTTP authorities.
#[derive(Clone)]
pub struct HttpContainerRuntime {
    client: Client<HttpConnector, Body>,
    config: RuntimeConfig,
}

impl HttpContainerRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, config }
    }

    /// Resolve an instance name to its authority string.
    fn authority_for(&self, name: &str) -> String {
        let mapped = match self.config.instances.get(name) {
            Some(explicit) => explicit.clone(),
            None => self.config.authority_template.replace("{name}", name),
        };
        if mapped.contains(':') {
            mapped
        } else {
            format!("{}:{}", mapped, self.config.default_port)
        }
    }
}

impl ContainerRuntime for HttpContainerRuntime {
    type Handle = HttpContainerHandle;

    fn handle(&self, name: &str) -> Result<HttpContainerHandle, RuntimeError> {
        let raw = self.authority_for(name);
        let authority: Authority = raw.parse().map_err(|e| RuntimeError::Authority {
            name: name.to_string(),
            reason: format!("{} ({})", raw, e),
        })?;

        let start_url = self
            .config
            .start_url_template
            .as_ref()
            .map(|t| t.replace("{name}", name));

        Ok(HttpContainerHandle {
            client: self.client.clone(),
            name: name.to_string(),
            authority,
            start_url,
        })
    }
}

/// Handle to one named instance, valid for a single request's lifetime.
#[derive(Clone, Debug)]
pub struct HttpContainerHandle {
    client: Client<HttpConnector, Body>,
    name: String,
    authority: Authority,
    start_url: Option<String>,
}

impl HttpContainerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

impl ContainerHandle for HttpContainerHandle {
    async fn start(&self) -> Result<(), RuntimeError> {
        let Some(url) = &self.start_url else {
            // No control plane configured: the platform provisions the
            // instance on first fetch.
            return Ok(());
        };

        let req = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header("user-agent", "shard-router-start")
            .body(Body::empty())?;

        let resp = self.client.request(req).await?;
        if resp.status().is_success() {
            tracing::debug!(instance = %self.name, "start signal delivered");
            Ok(())
        } else {
            Err(RuntimeError::StartRejected(resp.status()))
        }
    }

    async fn fetch(&self, req: Request<Body>) -> Result<Response<Body>, RuntimeError> {
        let (mut parts, body) = req.into_parts();

        let mut uri_parts = parts.uri.into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some("/".parse().expect("static path"));
        }
        parts.uri = Uri::from_parts(uri_parts)
            .map_err(|e| RuntimeError::Request(axum::http::Error::from(e)))?;

        let resp: Response<Incoming> = self
            .client
            .request(Request::from_parts(parts, body))
            .await?;
        let (head, incoming) = resp.into_parts();
        Ok(Response::from_parts(head, Body::new(incoming)))
    }
}
