//! Error response normalization
//!
//! Handler errors already leave as `{error, message}` JSON through
//! `AppError`. Framework rejections (malformed JSON bodies, missing
//! fields, unknown routes, wrong methods, oversized bodies) come out of
//! axum as text/plain; this middleware rewrites them into the same shape.
//! Body rejections (422) are reported as 400 `validation`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Plain-text probe endpoints that keep their own bodies
const PASSTHROUGH_PATHS: &[&str] = &["/health", "/ready", "/metrics"];

pub async fn normalize_error_response(request: Request<Body>, next: Next) -> Response {
    let passthrough = PASSTHROUGH_PATHS.contains(&request.uri().path());
    let response = next.run(request).await;

    let status = response.status();
    if passthrough || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    if is_json {
        return response;
    }

    generic_error_response(status)
}

fn generic_error_response(status: StatusCode) -> Response {
    let (status, error_type, message) = match status {
        StatusCode::BAD_REQUEST => (status, "bad_request", "Invalid request body"),
        StatusCode::UNPROCESSABLE_ENTITY => (
            StatusCode::BAD_REQUEST,
            "validation",
            "Request body is missing fields or has invalid values",
        ),
        StatusCode::UNAUTHORIZED => (status, "unauthorized", "Authentication required"),
        StatusCode::FORBIDDEN => (status, "forbidden", "Access denied"),
        StatusCode::NOT_FOUND => (status, "not_found", "Not found"),
        StatusCode::METHOD_NOT_ALLOWED => (status, "method_not_allowed", "Method not allowed"),
        StatusCode::CONFLICT => (status, "conflict", "Resource conflict"),
        StatusCode::PAYLOAD_TOO_LARGE => (status, "payload_too_large", "Request body too large"),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            (status, "unsupported_media_type", "Unsupported content type")
        }
        StatusCode::TOO_MANY_REQUESTS => (status, "rate_limited", "Too many requests"),
        _ if status.is_client_error() => (status, "client_error", "Client error"),
        _ => (status, "internal_error", "An internal error occurred"),
    };

    let body = json!({
        "error": error_type,
        "message": message,
    });
    (status, axum::Json(body)).into_response()
}
