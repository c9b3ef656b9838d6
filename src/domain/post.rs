//! Post domain model

use super::common::{deserialize_some, string_enum, validate_slug, StringUuid};
use super::taxonomy::Taxonomy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Publication status shared by posts and pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
}

string_enum!(PublishStatus {
    Draft => "draft",
    Published => "published",
});

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: StringUuid,
    pub blog_id: StringUuid,
    pub author_id: Option<StringUuid>,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub status: PublishStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub category_id: Option<StringUuid>,
    pub series_id: Option<StringUuid>,
    pub series_order: Option<i32>,
    #[sqlx(skip)]
    #[serde(default)]
    pub tags: Vec<Taxonomy>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Post {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            blog_id: StringUuid::nil(),
            author_id: None,
            title: String::new(),
            slug: String::new(),
            excerpt: None,
            content: String::new(),
            cover_image_url: None,
            status: PublishStatus::default(),
            published_at: None,
            category_id: None,
            series_id: None,
            series_order: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }
}

/// Input for creating a post
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Generated from the title when absent
    #[validate(length(min = 1, max = 255), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 1000))]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    #[validate(length(max = 2048))]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub status: PublishStatus,
    pub category_id: Option<StringUuid>,
    pub series_id: Option<StringUuid>,
    pub series_order: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<StringUuid>,
}

/// Input for updating a post. Nullable fields accept `null` to clear.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub cover_image_url: Option<Option<String>>,
    pub status: Option<PublishStatus>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category_id: Option<Option<StringUuid>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub series_id: Option<Option<StringUuid>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub series_order: Option<Option<i32>>,
    pub tag_ids: Option<Vec<StringUuid>>,
}

/// Listing filter for posts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    pub status: Option<PublishStatus>,
    pub category_id: Option<StringUuid>,
    pub tag_id: Option<StringUuid>,
    pub series_id: Option<StringUuid>,
    /// Matched against title and content
    pub search: Option<String>,
}

/// Public listing filter addressed by term slugs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicPostQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub series: Option<String>,
    pub search: Option<String>,
}
