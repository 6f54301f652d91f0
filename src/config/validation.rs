//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges. All issues are
//! returned together rather than stopping at the first one.

use std::fmt;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, returning every issue found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if config.listener.host.trim().is_empty() {
        issues.push(ValidationIssue {
            field: "listener.host",
            message: "must not be empty".to_string(),
        });
    }

    let base_url = config.catalog.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        issues.push(ValidationIssue {
            field: "catalog.base_url",
            message: format!("'{}' is not an http(s) URL", config.catalog.base_url),
        });
    }

    if config.catalog.page_size == 0 {
        issues.push(ValidationIssue {
            field: "catalog.page_size",
            message: "must be greater than 0".to_string(),
        });
    }

    if config.catalog.timeout_secs == Some(0) {
        issues.push(ValidationIssue {
            field: "catalog.timeout_secs",
            message: "must be greater than 0 when set".to_string(),
        });
    }

    if config.http.max_body_size == 0 {
        issues.push(ValidationIssue {
            field: "http.max_body_size",
            message: "must be greater than 0".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        issues.push(ValidationIssue {
            field: "observability.metrics_address",
            message: format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
