//! JWT token handling

use crate::config::JwtConfig;
use crate::domain::{StringUuid, UserRole};
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Audience of admin access tokens
pub const ACCESS_AUDIENCE: &str = "taita";
/// Audience of commenter tokens
pub const COMMENTER_AUDIENCE: &str = "taita-comments";

const ACCESS_TOKEN_TYPE: &str = "access";
const COMMENTER_TOKEN_TYPE: &str = "commenter";

/// Admin access token claims (issued on signup/login)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Blog the user administers
    pub blog_id: String,
    pub role: UserRole,
    pub iss: String,
    pub aud: String,
    /// Token type discriminator (prevents token confusion attacks)
    #[serde(default)]
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

/// Commenter token claims (issued after OTP verification)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommenterClaims {
    /// Subject (the verified email)
    pub sub: String,
    pub email: String,
    pub email_verified: bool,
    pub iss: String,
    pub aud: String,
    #[serde(default)]
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

/// JWT token manager (HS256)
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create a Validation with a strict leeway (5 seconds) instead of the default 60 seconds.
    fn strict_validation(&self, audience: &str) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 5;
        v.set_audience(&[audience]);
        v.set_issuer(&[&self.config.issuer]);
        v
    }

    /// Create an admin access token
    pub fn create_access_token(
        &self,
        user_id: StringUuid,
        email: &str,
        blog_id: StringUuid,
        role: UserRole,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_ttl_secs);

        let claims = AccessClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            blog_id: blog_id.to_string(),
            role,
            iss: self.config.issuer.clone(),
            aud: ACCESS_AUDIENCE.to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify and decode an admin access token
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        let validation = self.strict_validation(ACCESS_AUDIENCE);
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &validation)?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(AppError::Unauthorized("Invalid token type".to_string()));
        }
        Ok(token_data.claims)
    }

    /// Create a commenter token bound to a verified email
    pub fn create_commenter_token(&self, email: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.commenter_token_ttl_secs);

        let claims = CommenterClaims {
            sub: email.to_string(),
            email: email.to_string(),
            email_verified: true,
            iss: self.config.issuer.clone(),
            aud: COMMENTER_AUDIENCE.to_string(),
            token_type: COMMENTER_TOKEN_TYPE.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify and decode a commenter token
    pub fn verify_commenter_token(&self, token: &str) -> Result<CommenterClaims> {
        let validation = self.strict_validation(COMMENTER_AUDIENCE);
        let token_data = decode::<CommenterClaims>(token, &self.decoding_key, &validation)?;

        let claims = token_data.claims;
        if claims.token_type != COMMENTER_TOKEN_TYPE || !claims.email_verified {
            return Err(AppError::Unauthorized("Invalid token type".to_string()));
        }
        Ok(claims)
    }

    /// Admin access token lifetime in seconds
    pub fn access_token_ttl(&self) -> i64 {
        self.config.access_token_ttl_secs
    }

    /// Commenter token lifetime in seconds
    pub fn commenter_token_ttl(&self) -> i64 {
        self.config.commenter_token_ttl_secs
    }
}
