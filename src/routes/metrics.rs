use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use prometheus::{Encoder, TextEncoder, TEXT_FORMAT};

/// GET /metrics — Prometheus text exposition of the default registry.
pub async fn metrics_handler() -> Response {
    let mut body = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&prometheus::gather(), &mut body) {
        tracing::error!("Metrics encoding failed: {}", e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response()
}
