//! One-time code domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Pending email verification code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpRecord {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
}

impl OtpRecord {
    pub fn new(code: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            code,
            expires_at,
            verified: false,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Normalize an email for use as an OTP key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequestOtpInput {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyOtpInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpRequested {
    pub message: String,
    pub expires_in: i64,
    /// Only present when code echo is enabled outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Commenter token issued after a successful verification
#[derive(Debug, Clone, Serialize)]
pub struct CommenterToken {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub email: String,
}
