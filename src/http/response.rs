//! Response rendering for pipeline failures.
//!
//! # Responsibilities
//! - Map each `SearchError` kind to a status code
//! - Render the `{ code, message, fault }` envelope
//! - Log the failure once, at the boundary

use std::error::Error as _;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::search::SearchError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: u16,
    pub message: String,
    /// Error text and cause chain. Omitted when fault exposure is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

/// A [`SearchError`] on its way out to the caller.
#[derive(Debug)]
pub struct ErrorResponse {
    error: SearchError,
    expose_fault: bool,
}

impl ErrorResponse {
    pub fn new(error: SearchError, expose_fault: bool) -> Self {
        Self {
            error,
            expose_fault,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let status = self.error.status_code();
        ErrorEnvelope {
            code: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Error").to_string(),
            fault: self.expose_fault.then(|| fault_trace(&self.error)),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let trace = fault_trace(&self.error);
        match &self.error {
            SearchError::Validation(e) => {
                tracing::error!(kind = "validation", field = %e.field, fault = %trace, "Request rejected")
            }
            SearchError::Shape { detail } => {
                tracing::error!(kind = "shape", %detail, fault = %trace, "Catalog payload rejected")
            }
            SearchError::Upstream(_) => {
                tracing::error!(kind = "upstream", fault = %trace, "Catalog request failed")
            }
        }

        (self.error.status_code(), Json(self.envelope())).into_response()
    }
}

/// `Error: <message>` followed by one line per detail or source.
pub fn fault_trace(error: &SearchError) -> String {
    let mut trace = format!("Error: {error}");
    if let SearchError::Shape { detail } = error {
        trace.push_str(&format!("\n    detail: {detail}"));
    }

    let mut source = error.source();
    while let Some(cause) = source {
        trace.push_str(&format!("\n    caused by: {cause}"));
        source = cause.source();
    }
    trace
}
