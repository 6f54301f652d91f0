//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file (--config)
//!     → PORT environment variable
//!     → --port flag
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so the service runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigSources, PORT_ENV};
pub use schema::{
    CatalogConfig, HttpConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServiceConfig,
};
