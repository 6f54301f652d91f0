use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::http::response::ErrorResponse;
use crate::http::server::AppState;

/// Body a request without a JSON content type is searched with.
const EMPTY_OBJECT: &[u8] = b"{}";

/// `POST /api/products`
///
/// Bodies not declared as `application/json` are read as an empty object,
/// so they fail on the missing query.
pub async fn search_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = if is_json(&headers) {
        body
    } else {
        Bytes::from_static(EMPTY_OBJECT)
    };

    match state.pipeline.run(body).await {
        Ok(summaries) => Json(summaries).into_response(),
        Err(error) => ErrorResponse::new(error, state.expose_fault).into_response(),
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}
