//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parseable)
//! - Check the runtime mapping can produce an authority for any name
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::RouterConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `readiness.timeout_ms`.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration, collecting every error.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".into(),
            message: format!("not a valid socket address: {}", config.listener.bind_address),
        });
    }

    if config.readiness.timeout_ms == 0 {
        errors.push(ValidationError {
            field: "readiness.timeout_ms".into(),
            message: "must be greater than zero".into(),
        });
    }

    if config.readiness.poll_interval_ms == 0 {
        errors.push(ValidationError {
            field: "readiness.poll_interval_ms".into(),
            message: "must be greater than zero".into(),
        });
    }

    if !config.readiness.probe_path.starts_with('/') {
        errors.push(ValidationError {
            field: "readiness.probe_path".into(),
            message: "must start with '/'".into(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs".into(),
            message: "must be greater than zero".into(),
        });
    }

    if config.runtime.instances.is_empty() && !config.runtime.authority_template.contains("{name}")
    {
        errors.push(ValidationError {
            field: "runtime.authority_template".into(),
            message: "must contain a {name} placeholder when no explicit instances are mapped"
                .into(),
        });
    }

    if let Some(template) = &config.runtime.start_url_template {
        if !template.contains("{name}") {
            errors.push(ValidationError {
                field: "runtime.start_url_template".into(),
                message: "must contain a {name} placeholder".into(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address".into(),
            message: format!(
                "not a valid socket address: {}",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
