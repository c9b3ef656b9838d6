//! Static page domain model

use super::common::{validate_slug, StringUuid};
use super::post::PublishStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Page {
    pub id: StringUuid,
    pub blog_id: StringUuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PublishStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Page {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            blog_id: StringUuid::nil(),
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            status: PublishStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePageInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: PublishStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePageInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub content: Option<String>,
    pub status: Option<PublishStatus>,
}
