//! Request logging
//!
//! Callbacks for `tower_http::trace::TraceLayer`: every request gets a span
//! carrying a request id, and its start, status and latency are logged.

use axum::body::Body;
use axum::extract::Request;
use axum::http::Response;
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn make_span(request: &Request<Body>) -> Span {
    let request_id = Uuid::new_v4().to_string();
    info_span!(
        "http_request",
        request_id = %request_id,
        method = ?request.method(),
        uri = ?request.uri(),
        user_id = tracing::field::Empty,
    )
}

pub fn on_request(request: &Request<Body>, _span: &Span) {
    info!("started processing request: {} {}", request.method(), request.uri().path());
}

pub fn on_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    info!(
        status = response.status().as_u16(),
        latency_ms = latency.as_millis() as u64,
        "finished processing request"
    );
}

pub fn on_failure(failure: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    error!(latency_ms = latency.as_millis() as u64, "request failed: {:?}", failure);
}
