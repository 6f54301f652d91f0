//! Startup orchestration.
//!
//! # Order
//! 1. Metrics exporter (if enabled)
//! 2. HTTP server and catalog client
//! 3. Listener bind, then traffic
//!
//! Any startup error is fatal.

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to build catalog client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Start every subsystem and serve until `shutdown` fires.
pub async fn start(
    config: ServiceConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let address = config.listener.bind_address();
    let port = config.listener.port;
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(port, %address, "Server is running on port {port}");

    server.run(listener, shutdown).await.map_err(StartupError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = ServiceConfig::default();
        config.listener.host = "127.0.0.1".to_string();
        config.listener.port = taken.local_addr().unwrap().port();

        let (_tx, rx) = broadcast::channel(1);
        let err = start(config, rx).await.unwrap_err();
        assert!(matches!(err, StartupError::Bind { .. }));
    }

    #[tokio::test]
    async fn stops_on_shutdown() {
        let mut config = ServiceConfig::default();
        config.listener.host = "127.0.0.1".to_string();
        config.listener.port = 0;

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(start(config, rx));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        tx.send(()).unwrap();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
