//! Security headers middleware
//!
//! Adds standard security headers to all responses to protect against
//! XSS, clickjacking and content sniffing. Uploaded SVGs are served under
//! the same restrictive CSP, so scripts embedded in them never run.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Path prefixes whose responses must never be cached
const PRIVATE_PREFIXES: &[&str] = &["/api/admin", "/api/auth"];

pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let private = PRIVATE_PREFIXES
        .iter()
        .any(|p| request.uri().path().starts_with(p));

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );

    if private {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, private"),
        );
    }

    response
}
