//! Bearer token extraction for admin routes
//!
//! Provides:
//! - `AuthUser` extractor for handlers requiring a blog administrator
//! - `bearer_token` for handlers that verify other token kinds themselves

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::{StringUuid, UserRole};
use crate::jwt::AccessClaims;
use crate::state::AppState;

/// Administrator identified by an access token. Admin routes take the
/// blog from here, never from the request host.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: StringUuid,
    pub blog_id: StringUuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn from_claims(claims: AccessClaims) -> Result<Self, AuthError> {
        let user_id = StringUuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidToken("Invalid user ID in token".to_string()))?;
        let blog_id = StringUuid::parse_str(&claims.blog_id)
            .map_err(|_| AuthError::InvalidToken("Invalid blog ID in token".to_string()))?;

        Ok(Self {
            user_id,
            blog_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Authentication errors
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No Authorization header present
    MissingToken,
    /// Invalid Authorization header format
    InvalidHeader(String),
    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidHeader(_) => "Invalid authorization header",
            AuthError::InvalidToken(_) => "Invalid token",
        };
        tracing::debug!(reason = ?self, "Rejected admin request");

        let body = serde_json::json!({
            "error": "unauthorized",
            "message": message,
        });

        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Extract and validate Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("Invalid header encoding".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AuthError::InvalidHeader("Authorization header must use Bearer scheme".to_string())
        })
}

/// Bearer token if the request carries a well-formed one
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    extract_bearer_token(headers).ok()
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let claims = state
            .jwt_manager
            .verify_access_token(token)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        AuthUser::from_claims(claims)
    }
}
