//! Request logging middleware

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Log one line per completed request
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    match status {
        s if s.is_server_error() => warn!(
            method = %method,
            path = %path,
            status = s.as_u16(),
            elapsed_ms,
            "Request failed"
        ),
        StatusCode::NOT_FOUND => debug!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "Request completed"
        ),
        s => info!(
            method = %method,
            path = %path,
            status = s.as_u16(),
            elapsed_ms,
            "Request completed"
        ),
    }

    response
}
