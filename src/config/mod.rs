//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: INSTANCE_COUNT, BIND_ADDRESS)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the router is stateless and reads
//!   configuration exactly once per process
//! - All fields have defaults so an empty config file is valid
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AffinityConfig;
pub use schema::ListenerConfig;
pub use schema::ReadinessConfig;
pub use schema::RouterConfig;
pub use schema::RuntimeConfig;
