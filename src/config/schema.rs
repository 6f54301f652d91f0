//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the product search service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Upstream product catalog settings.
    pub catalog: CatalogConfig,

    /// Inbound HTTP surface settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Overridden by `PORT` when set.
    pub port: u16,
}

impl ListenerConfig {
    /// Socket address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Upstream catalog configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog base URL, without the `/products/search` suffix.
    pub base_url: String,

    /// Number of products requested per page (`limit` upstream).
    pub page_size: u32,

    /// Optional request timeout in seconds. `None` leaves the transport default.
    pub timeout_secs: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dummyjson.com".to_string(),
            page_size: crate::search::DEFAULT_PAGE_SIZE,
            timeout_secs: None,
        }
    }
}

/// Inbound HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,

    /// Include the error cause chain in the `fault` field of error responses.
    ///
    /// This leaks internal detail to callers; it stays on to keep the
    /// established response contract.
    pub expose_fault: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
            expose_fault: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "product_search=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = ServiceConfig::default();
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.listener.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.catalog.base_url, "https://dummyjson.com");
        assert_eq!(config.catalog.page_size, 2);
        assert!(config.catalog.timeout_secs.is_none());
        assert!(config.http.expose_fault);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [listener]
            port = 8080

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.catalog.page_size, 2);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
