//! HTTP middleware for Taita Core
//!
//! - `AuthUser` extractor for admin routes
//! - `CurrentBlog` extractor that resolves the tenant of public routes
//! - client IP injection, security headers, error normalization
//! - observability layer and trace spans

pub mod auth;
pub mod client_ip;
pub mod error_response;
pub mod metrics;
pub mod security_headers;
pub mod tenant;
pub mod trace;

pub use auth::{bearer_token, AuthUser};
pub use client_ip::{extract_ip, inject_client_ip, ClientIp};
pub use error_response::normalize_error_response;
pub use metrics::ObservabilityLayer;
pub use security_headers::security_headers_middleware;
pub use tenant::CurrentBlog;
pub use trace::SanitizedMakeSpan;
