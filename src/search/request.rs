//! Inbound search request parsing and validation.

use std::ops::RangeInclusive;

use serde::Deserialize;
use serde_json::Value;

use crate::search::error::{Field, ValidationError};

/// Accepted `query` length, in characters.
pub const QUERY_LENGTH: RangeInclusive<usize> = 3..=10;

/// Page used when the caller sends none.
pub const DEFAULT_PAGE: u32 = 1;

/// Untyped inbound body. Types are checked in [`SearchRequestBody::validate`]
/// so each failure can name its field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchRequestBody {
    #[serde(default)]
    pub query: Option<Value>,
    #[serde(default)]
    pub page: Option<Value>,
}

/// A validated, normalized search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
}

impl SearchRequestBody {
    /// Parse raw request bytes. The body must be a JSON object.
    pub fn from_slice(raw: &[u8]) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| ValidationError::new(Field::Body, format!("malformed JSON: {e}")))?;

        if !value.is_object() {
            return Err(ValidationError::new(Field::Body, "expected a JSON object"));
        }

        serde_json::from_value(value).map_err(|e| ValidationError::new(Field::Body, e.to_string()))
    }

    pub fn validate(&self) -> Result<SearchRequest, ValidationError> {
        Ok(SearchRequest {
            query: validate_query(self.query.as_ref())?,
            page: validate_page(self.page.as_ref())?,
        })
    }
}

fn validate_query(value: Option<&Value>) -> Result<String, ValidationError> {
    let query = match value {
        Some(Value::String(query)) => query,
        Some(_) => return Err(ValidationError::new(Field::Query, "must be a string")),
        None => return Err(ValidationError::new(Field::Query, "is required")),
    };

    let length = query.chars().count();
    if !QUERY_LENGTH.contains(&length) {
        return Err(ValidationError::new(
            Field::Query,
            format!(
                "length {length} is outside {}..={}",
                QUERY_LENGTH.start(),
                QUERY_LENGTH.end()
            ),
        ));
    }

    Ok(query.clone())
}

fn validate_page(value: Option<&Value>) -> Result<u32, ValidationError> {
    let number = match value {
        None => return Ok(DEFAULT_PAGE),
        Some(Value::Number(n)) => n.as_f64(),
        // Numeric strings ("2") are accepted as numbers.
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    let number = number
        .filter(|n| n.is_finite())
        .ok_or_else(|| ValidationError::new(Field::Page, "must be a number"))?;

    if number < 1.0 {
        return Err(ValidationError::new(Field::Page, "must be at least 1"));
    }
    if number.fract() != 0.0 || number > f64::from(u32::MAX) {
        return Err(ValidationError::new(Field::Page, "must be a whole page number"));
    }

    Ok(number as u32)
}
