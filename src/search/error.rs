//! Error taxonomy for the search pipeline.

use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

/// Inbound field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Query,
    Page,
    /// The request body as a whole (unreadable, not JSON, not an object).
    Body,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Query => f.write_str("query"),
            Field::Page => f.write_str("page"),
            Field::Body => f.write_str("body"),
        }
    }
}

/// A request parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field} parameter: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// The catalog call itself failed.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, TLS or body transfer failure.
    #[error("catalog request failed")]
    Transport(#[source] reqwest::Error),

    /// The catalog answered with something that is not JSON.
    #[error("catalog response is not valid JSON")]
    Decode(#[source] serde_json::Error),
}

/// Any failure of the search pipeline.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("API response format is not as expected")]
    Shape { detail: String },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl SearchError {
    pub fn shape(detail: impl Into<String>) -> Self {
        SearchError::Shape {
            detail: detail.into(),
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Validation(_) => "validation",
            SearchError::Shape { .. } => "shape",
            SearchError::Upstream(_) => "upstream",
        }
    }

    /// HTTP status reported to the caller.
    ///
    /// Every kind currently answers 400, upstream faults included. The
    /// variants stay distinct so the mapping can diverge per kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::Validation(_) => StatusCode::BAD_REQUEST,
            SearchError::Shape { .. } => StatusCode::BAD_REQUEST,
            SearchError::Upstream(_) => StatusCode::BAD_REQUEST,
        }
    }
}
