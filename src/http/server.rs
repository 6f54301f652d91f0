//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, traffic log, body limit)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::post,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::catalog::CatalogClient;
use crate::config::ServiceConfig;
use crate::http::handlers::search_products;
use crate::http::middleware::traffic_log;
use crate::http::request::UuidRequestId;
use crate::search::SearchPipeline;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SearchPipeline<CatalogClient>>,
    pub expose_fault: bool,
}

/// HTTP server for the product search service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, reqwest::Error> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let state = AppState {
            pipeline: Arc::new(SearchPipeline::new(catalog, config.catalog.page_size)),
            expose_fault: config.http.expose_fault,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/products", post(search_products))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.http.max_body_size))
            .layer(middleware::from_fn_with_state(
                config.http.clone(),
                traffic_log,
            ))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Router with every layer applied, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            catalog = %self.config.catalog.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = ServiceConfig::default();
        // Nothing listens here; these tests never reach the catalog.
        config.catalog.base_url = "http://127.0.0.1:1".to_string();
        HttpServer::new(config).unwrap()
    }

    #[tokio::test]
    async fn invalid_query_gets_error_envelope() {
        let response = server()
            .router()
            .oneshot(
                Request::post("/api/products")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query":"ab"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().contains_key("x-request-id"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 400);
        assert_eq!(json["message"], "Bad Request");
        assert!(json["fault"].as_str().unwrap().contains("Invalid query parameter"));
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let response = server()
            .router()
            .oneshot(
                Request::post("/api/products")
                    .header("x-request-id", "trace-42")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "trace-42");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut config = ServiceConfig::default();
        config.catalog.base_url = "http://127.0.0.1:1".to_string();
        config.http.max_body_size = 16;
        let router = HttpServer::new(config).unwrap().router();

        let response = router
            .oneshot(
                Request::post("/api/products")
                    .body(Body::from(r#"{"query":"phone","page":1,"pad":"xxxxxxxx"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["fault"].as_str().unwrap().contains("Invalid body parameter"));
    }

    #[tokio::test]
    async fn non_json_body_is_read_as_empty() {
        let response = server()
            .router()
            .oneshot(
                Request::post("/api/products")
                    .header("content-type", "text/plain")
                    .body(Body::from(r#"{"query":"phone"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["fault"].as_str().unwrap().contains("Invalid query parameter"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = server()
            .router()
            .oneshot(Request::get("/api/other").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_on_search_route_is_not_allowed() {
        let response = server()
            .router()
            .oneshot(Request::get("/api/products").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
