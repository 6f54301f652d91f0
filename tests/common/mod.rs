//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use product_search::config::ServiceConfig;
use product_search::http::HttpServer;
use product_search::lifecycle::Shutdown;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// A running service instance.
pub struct TestService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service on an ephemeral port against `catalog_url`.
pub async fn start_service(catalog_url: &str) -> TestService {
    let mut config = ServiceConfig::default();
    config.catalog.base_url = catalog_url.to_string();
    start_service_with(config).await
}

/// Start the service with a custom configuration.
pub async fn start_service_with(config: ServiceConfig) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestService { addr, shutdown }
}

/// Start a catalog stand-in that accepts connections and closes them without answering.
#[allow(dead_code)]
pub async fn start_hangup_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Client that never pools connections between tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
