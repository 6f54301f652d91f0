//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationIssue};

/// Environment variable holding the listener port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value '{0}'")]
    Port(String),

    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where a configuration comes from, lowest precedence first.
#[derive(Debug, Default, Clone)]
pub struct ConfigSources<'a> {
    /// Optional TOML file.
    pub file: Option<&'a Path>,
    /// Raw value of the `PORT` environment variable.
    pub port_env: Option<String>,
    /// Explicit port from the command line.
    pub port_flag: Option<u16>,
}

/// Parse a TOML file into a configuration without validating it.
pub fn read_config_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Resolve the effective configuration and validate it.
pub fn load_config(sources: ConfigSources<'_>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match sources.file {
        Some(path) => read_config_file(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(port) = parse_port_env(sources.port_env.as_deref())? {
        config.listener.port = port;
    }
    if let Some(port) = sources.port_flag {
        config.listener.port = port;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// An unset or blank `PORT` falls back to the configured port.
fn parse_port_env(raw: Option<&str>) -> Result<Option<u16>, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Port(value.to_string())),
    }
}
