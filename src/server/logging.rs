use std::time::Instant;

use axum::body::HttpBody;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

/// Logs one line per request: method, uri, status, body length and the time spent serving it,
/// e.g. `POST /api/persons 201 52 - 0.412 ms`.
pub(crate) async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let length = response
        .body()
        .size_hint()
        .exact()
        .map_or_else(|| "-".to_string(), |len| len.to_string());
    info!(
        "{} {} {} {} - {:.3} ms",
        method,
        uri,
        response.status().as_u16(),
        length,
        elapsed_ms
    );
    response
}
