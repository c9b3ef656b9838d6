//! Blog user (admin account) domain model

use super::common::{string_enum, validate_slug, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Role of a user within its blog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Admin,
    #[default]
    Editor,
}

string_enum!(UserRole {
    Owner => "owner",
    Admin => "admin",
    Editor => "editor",
});

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: StringUuid,
    pub blog_id: StringUuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            blog_id: StringUuid::nil(),
            email: String::new(),
            password_hash: String::new(),
            name: String::new(),
            role: UserRole::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for signing up a new blog and its owner
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(length(min = 1, max = 255))]
    pub blog_name: String,
    #[validate(length(min = 3, max = 63), custom(function = "validate_slug"))]
    pub subdomain: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Input for password login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Access token issued on signup and login
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}
