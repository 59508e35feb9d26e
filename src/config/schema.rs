//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! router. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for the shard router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Sticky-session affinity settings.
    pub affinity: AffinityConfig,

    /// Readiness gate settings.
    pub readiness: ReadinessConfig,

    /// Container runtime collaborator settings.
    pub runtime: RuntimeConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Sticky-session affinity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AffinityConfig {
    /// Number of backend container instances to spread new clients over.
    ///
    /// Overridden by the `INSTANCE_COUNT` environment variable. Values
    /// of zero or less (and non-numeric env values) are treated as 1
    /// when a new shard is assigned. A cookie carrying a shard beyond
    /// this count is still honored verbatim so that shrinking the pool
    /// never breaks live sessions.
    pub instance_count: i64,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self { instance_count: 1 }
    }
}

/// Readiness gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Gate traffic on backend readiness. When disabled the start signal
    /// is still issued fire-and-forget before forwarding.
    pub enabled: bool,

    /// Total wall-clock budget for the warm-up wait, in milliseconds.
    pub timeout_ms: u64,

    /// Fixed delay between probe attempts, in milliseconds.
    pub poll_interval_ms: u64,

    /// Path probed against the backend. The probe only tests that the
    /// process is listening, so the root path is the default.
    pub probe_path: String,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 20_000,
            poll_interval_ms: 500,
            probe_path: "/".to_string(),
        }
    }
}

/// Container runtime collaborator configuration.
///
/// The platform runtime owns instance lifecycle; this section only
/// describes how an instance name maps onto the network and where the
/// start signal goes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Port container instances listen on when the mapped authority
    /// carries no explicit port.
    pub default_port: u16,

    /// Authority template with a `{name}` placeholder, e.g.
    /// `"{name}.containers.internal"`. Used when `instances` has no
    /// entry for the resolved name.
    pub authority_template: String,

    /// Explicit instance name → authority overrides
    /// (e.g. `"client-0" = "10.0.0.1:8081"`). Takes precedence over the
    /// template.
    pub instances: HashMap<String, String>,

    /// Optional control-plane URL template with a `{name}` placeholder
    /// for the idempotent start signal. When unset, start is a no-op and
    /// the platform is expected to provision on first fetch.
    pub start_url_template: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_port: 80,
            authority_template: "{name}.containers.internal".to_string(),
            instances: HashMap::new(),
            start_url_template: None,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Must leave room for the readiness timeout plus the forward.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
