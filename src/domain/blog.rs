//! Blog (tenant) domain model

use super::common::{string_enum, validate_slug, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Blog status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Active,
    Suspended,
}

string_enum!(BlogStatus {
    Active => "active",
    Suspended => "suspended",
});

/// Blog entity. Every piece of content is owned by exactly one blog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: StringUuid,
    pub name: String,
    pub subdomain: String,
    pub custom_domain: Option<String>,
    pub description: Option<String>,
    pub status: BlogStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Blog {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            subdomain: String::new(),
            custom_domain: None,
            description: None,
            status: BlogStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Blog {
    pub fn is_active(&self) -> bool {
        self.status == BlogStatus::Active
    }
}

/// How a request identified its blog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantKey {
    Subdomain(String),
    CustomDomain(String),
}

impl std::fmt::Display for TenantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TenantKey::Subdomain(s) => write!(f, "subdomain:{}", s),
            TenantKey::CustomDomain(d) => write!(f, "domain:{}", d),
        }
    }
}

/// Input for creating a blog (used by signup)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBlogInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 3, max = 63), custom(function = "validate_slug"))]
    pub subdomain: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Input for updating the blog profile
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBlogInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// `null` clears the custom domain
    #[serde(default, deserialize_with = "super::common::deserialize_some")]
    pub custom_domain: Option<Option<String>>,
}
