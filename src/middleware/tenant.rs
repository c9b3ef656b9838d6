//! Tenant resolution for public routes
//!
//! The blog a request addresses is picked, in order, from the
//! `X-Taita-Subdomain` header, the `tenant` or `subdomain` query
//! parameter, the host name, and finally the configured default tenant.

use crate::config::TenantConfig;
use crate::domain::{Blog, TenantKey};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{FromRequestParts, Query},
    http::{header::HOST, request::Parts, HeaderMap},
};
use serde::Deserialize;
use std::net::IpAddr;

/// Override header used by the frontend and local tooling
pub const TENANT_HEADER: &str = "x-taita-subdomain";

#[derive(Debug, Default, Deserialize)]
pub struct TenantQuery {
    pub tenant: Option<String>,
    pub subdomain: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Request host without port, from `X-Forwarded-Host` or `Host`
fn request_host(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(HOST))
        .and_then(|v| v.to_str().ok())?;
    let first = raw.split(',').next()?.trim();

    let host = if let Some(rest) = first.strip_prefix('[') {
        // [::1]:8080
        rest.split(']').next().unwrap_or(rest)
    } else if first.matches(':').count() == 1 {
        first.split(':').next().unwrap_or(first)
    } else {
        first
    };
    non_empty(Some(host)).map(str::to_string)
}

/// Key derived from a host name, if it names a blog
fn key_from_host(host: &str, base_domain: &str) -> Option<TenantKey> {
    if host == "localhost" || host.parse::<IpAddr>().is_ok() {
        return None;
    }
    if let Some(sub) = host.strip_suffix(".localhost") {
        return non_empty(Some(sub)).map(|s| TenantKey::Subdomain(s.to_string()));
    }
    if host == base_domain {
        return None;
    }
    if let Some(sub) = host.strip_suffix(base_domain).and_then(|p| p.strip_suffix('.')) {
        return match sub {
            "" | "www" => None,
            sub => Some(TenantKey::Subdomain(sub.to_string())),
        };
    }
    Some(TenantKey::CustomDomain(host.to_string()))
}

/// Work out which blog a public request addresses
pub fn resolve_tenant_key(
    headers: &HeaderMap,
    query: &TenantQuery,
    config: &TenantConfig,
) -> TenantKey {
    let header = headers.get(TENANT_HEADER).and_then(|v| v.to_str().ok());
    if let Some(sub) = non_empty(header) {
        return TenantKey::Subdomain(sub.to_string());
    }

    if let Some(sub) =
        non_empty(query.tenant.as_deref()).or_else(|| non_empty(query.subdomain.as_deref()))
    {
        return TenantKey::Subdomain(sub.to_string());
    }

    if let Some(key) = request_host(headers).and_then(|h| key_from_host(&h, &config.base_domain)) {
        return key;
    }

    TenantKey::Subdomain(config.default_tenant.clone())
}

/// The blog resolved for a public request
#[derive(Debug, Clone)]
pub struct CurrentBlog(pub Blog);

impl FromRequestParts<AppState> for CurrentBlog {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let query = Query::<TenantQuery>::try_from_uri(&parts.uri)
            .map(|q| q.0)
            .unwrap_or_default();
        let key = resolve_tenant_key(&parts.headers, &query, &state.config.tenant);
        let blog = state.blog_service.resolve(&key).await?;
        Ok(CurrentBlog(blog))
    }
}
