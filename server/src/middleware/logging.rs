use axum::{
    body::{Body, Bytes},
    http::{header::CONTENT_LENGTH, Request},
    middleware::Next,
    response::Response,
    Error as AxumError,
};
use http_body_util::BodyExt;
use std::time::Instant;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 2048;

/// Records diagnostics whenever a handler answers with a 4xx or 5xx status.
/// The response body is buffered so the same payload still reaches the caller
/// after logging.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    let (mut parts, body) = response.into_parts();
    match buffer_body(body).await {
        Ok((bytes, preview)) => {
            if status.is_server_error() {
                tracing::error!(
                    status = status.as_u16(),
                    method,
                    uri,
                    latency_ms,
                    body = preview,
                    "Request failed"
                );
            } else {
                tracing::warn!(
                    status = status.as_u16(),
                    method,
                    uri,
                    latency_ms,
                    body = preview,
                    "Request rejected"
                );
            }
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            tracing::error!(
                status = status.as_u16(),
                method,
                uri,
                latency_ms,
                error = ?err,
                "Failed to read error response body"
            );
            Response::from_parts(parts, Body::empty())
        }
    }
}

async fn buffer_body(mut body: Body) -> Result<(Bytes, String), AxumError> {
    let mut buffered: Vec<u8> = Vec::new();
    while let Some(frame) = body.frame().await {
        let frame = frame?;
        if let Some(data) = frame.data_ref() {
            if buffered.len() + data.len() > MAX_BUFFERED_BODY_BYTES {
                return Err(AxumError::new("error response body exceeded the buffer cap"));
            }
            buffered.extend_from_slice(data);
        }
    }
    let bytes = Bytes::from(buffered);
    let preview = if bytes.len() > MAX_LOGGED_BODY_BYTES {
        let slice = bytes.slice(0..MAX_LOGGED_BODY_BYTES);
        format!(
            "{}... (truncated, {} bytes total)",
            String::from_utf8_lossy(&slice),
            bytes.len()
        )
    } else {
        String::from_utf8_lossy(&bytes).to_string()
    };
    Ok((bytes, preview))
}
