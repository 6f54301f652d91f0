//! Inbound/outbound traffic logging.
//!
//! Every request is logged as a `messageIn` entry before it reaches the
//! handler. The response body is wrapped in [`CapturingBody`], which forwards
//! each frame untouched and keeps a copy; once the stream ends a `messageOut`
//! entry with the full body is logged.

use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::{Bytes, BytesMut};
use chrono::{SecondsFormat, Utc};
use http_body::{Frame, SizeHint};
use pin_project_lite::pin_project;

use crate::config::HttpConfig;
use crate::http::request::request_id;
use crate::http::response::ErrorResponse;
use crate::observability::metrics;
use crate::search::{Field, ValidationError};

pin_project! {
    /// Response body decorator that records every data frame it forwards.
    ///
    /// `on_complete` receives the concatenated bytes exactly once, when the
    /// inner body reports end of stream.
    pub struct CapturingBody<B, F> {
        #[pin]
        inner: B,
        captured: BytesMut,
        on_complete: Option<F>,
    }
}

impl<B, F> CapturingBody<B, F>
where
    B: http_body::Body<Data = Bytes>,
    F: FnOnce(Bytes),
{
    pub fn new(inner: B, on_complete: F) -> Self {
        let mut body = Self {
            inner,
            captured: BytesMut::new(),
            on_complete: Some(on_complete),
        };
        // An already finished body may never be polled.
        if body.inner.is_end_stream() {
            complete(&mut body.captured, &mut body.on_complete);
        }
        body
    }
}

impl<B, F> http_body::Body for CapturingBody<B, F>
where
    B: http_body::Body<Data = Bytes>,
    F: FnOnce(Bytes),
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let mut this = self.project();
        let polled = ready!(this.inner.as_mut().poll_frame(cx));

        match &polled {
            Some(Ok(frame)) => {
                if let Some(data) = frame.data_ref() {
                    this.captured.extend_from_slice(data);
                }
                if this.inner.is_end_stream() {
                    complete(this.captured, this.on_complete);
                }
            }
            Some(Err(_)) => {}
            None => complete(this.captured, this.on_complete),
        }

        Poll::Ready(polled)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

fn complete<F: FnOnce(Bytes)>(captured: &mut BytesMut, on_complete: &mut Option<F>) {
    if let Some(callback) = on_complete.take() {
        callback(captured.split().freeze());
    }
}

/// ISO-8601 UTC timestamp with millisecond precision.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Middleware logging `messageIn` / `messageOut` for every exchange.
pub async fn traffic_log(
    State(config): State<HttpConfig>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(request.headers());
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let (parts, body) = request.into_parts();
    let response = match axum::body::to_bytes(body, config.max_body_size).await {
        Ok(bytes) => {
            tracing::info!(
                message_type = "messageIn",
                request_id = %request_id,
                method = %method,
                path = %path,
                body = %String::from_utf8_lossy(&bytes),
                date_time = %iso_timestamp(),
                "Incoming request"
            );
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        Err(e) => {
            tracing::info!(
                message_type = "messageIn",
                request_id = %request_id,
                method = %method,
                path = %path,
                date_time = %iso_timestamp(),
                "Incoming request with unreadable body"
            );
            let error = ValidationError::new(Field::Body, format!("unreadable request body: {e}"));
            ErrorResponse::new(error.into(), config.expose_fault).into_response()
        }
    };

    let status = response.status();
    metrics::record_request(method.as_str(), status.as_u16(), start);

    let (parts, body) = response.into_parts();
    let body = CapturingBody::new(body, move |captured: Bytes| {
        tracing::info!(
            message_type = "messageOut",
            request_id = %request_id,
            status = status.as_u16(),
            body = %String::from_utf8_lossy(&captured),
            date_time = %iso_timestamp(),
            "Outgoing response"
        );
    });

    Response::from_parts(parts, Body::new(body))
}
