//! HTTP client for the upstream product catalog.
//!
//! # Responsibilities
//! - Issue one GET per search against `<base>/products/search`
//! - Parse the body as JSON regardless of status code
//! - Reject payloads whose `products` field is not an array
//! - Decode every record, however incomplete
//!
//! # Design Decisions
//! - One `reqwest::Client` shared by all requests (connection pooling)
//! - No retries; a timeout only when configured

use std::time::{Duration, Instant};

use serde_json::{Map, Value};

use crate::catalog::types::{CatalogQuery, ProductCatalog, UpstreamProduct};
use crate::config::CatalogConfig;
use crate::observability::metrics;
use crate::search::{SearchError, UpstreamError};

/// reqwest-backed [`ProductCatalog`].
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, url: &str) -> Result<Vec<UpstreamProduct>, SearchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(UpstreamError::Transport)?;
        tracing::debug!(%url, %status, bytes = body.len(), "Catalog responded");

        let payload: Value = serde_json::from_slice(&body).map_err(UpstreamError::Decode)?;
        extract_products(payload)
    }
}

impl ProductCatalog for CatalogClient {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<UpstreamProduct>, SearchError> {
        let url = query.url(&self.base_url);
        let start = Instant::now();

        let result = self.fetch(&url).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_upstream(outcome, start);

        match &result {
            Ok(products) => tracing::debug!(
                query = %query.query,
                skip = query.skip,
                products = products.len(),
                "Catalog search succeeded"
            ),
            Err(e) => tracing::warn!(query = %query.query, error = %e, "Catalog search failed"),
        }

        result
    }
}

/// Pull the ordered product list out of a catalog payload.
///
/// Only the `products` container is checked. Every element yields a product;
/// an element that is not an object reads as a record with no fields.
pub fn extract_products(mut payload: Value) -> Result<Vec<UpstreamProduct>, SearchError> {
    match payload.get_mut("products").map(Value::take) {
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let record = match item {
                    Value::Object(_) => item,
                    _ => Value::Object(Map::new()),
                };
                serde_json::from_value(record)
                    .map_err(|e| SearchError::shape(format!("products[{index}]: {e}")))
            })
            .collect(),
        Some(other) => Err(SearchError::shape(format!(
            "`products` is {}, expected an array",
            json_kind(&other)
        ))),
        None => Err(SearchError::shape("`products` field is missing")),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
