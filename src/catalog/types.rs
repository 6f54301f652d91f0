//! Catalog wire types and the catalog seam.

use std::future::Future;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::search::SearchError;

/// One product record as returned by the catalog search endpoint.
///
/// Only the fields the service reads are modeled; everything else in the
/// upstream record is ignored. Decoding never fails on a record: absent or
/// `null` text stays `None`, and numeric fields are coerced the way a
/// JavaScript `Number(..)` would (absent → NaN, `null` → 0, `"12.5"` → 12.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamProduct {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default = "missing_number", deserialize_with = "lenient_number")]
    pub price: f64,
    #[serde(
        rename = "discountPercentage",
        default = "missing_number",
        deserialize_with = "lenient_number"
    )]
    pub discount_percentage: f64,
}

fn missing_number() -> f64 {
    f64::NAN
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_number(&Value::deserialize(deserializer)?))
}

/// Numeric value of a JSON scalar under JavaScript `Number(..)` rules.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        Value::String(text) => coerce_text(text.trim()),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

fn coerce_text(text: &str) -> f64 {
    match text {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust also accepts "inf" and "nan", which are not numbers here.
        _ if text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) =>
        {
            text.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Parameters of one catalog search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub query: String,
    pub limit: u32,
    pub skip: u32,
}

impl CatalogQuery {
    /// Build the query for a 1-based page: `skip = (page - 1) * limit`.
    pub fn for_page(query: impl Into<String>, page: u32, limit: u32) -> Self {
        Self {
            query: query.into(),
            limit,
            skip: page.saturating_sub(1).saturating_mul(limit),
        }
    }

    /// Search URL under `base_url`.
    ///
    /// Parameters are interpolated verbatim; the HTTP client is left to
    /// normalize whatever the caller sent.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/products/search?q={}&limit={}&skip={}",
            base_url.trim_end_matches('/'),
            self.query,
            self.limit,
            self.skip
        )
    }
}

/// Source of products for the search pipeline.
pub trait ProductCatalog: Send + Sync {
    /// Run one search. Never retried by the caller.
    fn search(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<Vec<UpstreamProduct>, SearchError>> + Send;
}
