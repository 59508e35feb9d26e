//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: RouterConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults plus environment overrides.
pub fn default_config() -> Result<RouterConfig, ConfigError> {
    let mut config = RouterConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment variable overrides onto a loaded configuration.
///
/// `INSTANCE_COUNT` is the client-visible knob from the deployment
/// contract: an optional string parsed as an integer. A value that does
/// not parse is treated as absent.
fn apply_env_overrides(config: &mut RouterConfig) {
    if let Ok(raw) = std::env::var("INSTANCE_COUNT") {
        match raw.trim().parse::<i64>() {
            Ok(n) => config.affinity.instance_count = n,
            Err(_) => {
                tracing::warn!(value = %raw, "INSTANCE_COUNT is not numeric, keeping default");
            }
        }
    }

    if let Ok(addr) = std::env::var("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
}
