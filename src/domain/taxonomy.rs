//! Taxonomy terms: categories, tags and series share one shape

use super::common::{string_enum, validate_slug, StringUuid};
use super::post::Post;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    Category,
    Tag,
    Series,
}

string_enum!(TaxonomyKind {
    Category => "category",
    Tag => "tag",
    Series => "series",
});

impl TaxonomyKind {
    /// Human label used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "Category",
            TaxonomyKind::Tag => "Tag",
            TaxonomyKind::Series => "Series",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Taxonomy {
    pub id: StringUuid,
    pub blog_id: StringUuid,
    pub kind: TaxonomyKind,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Taxonomy {
    pub fn new(blog_id: StringUuid, kind: TaxonomyKind, name: &str, slug: &str) -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            blog_id,
            kind,
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTaxonomyInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTaxonomyInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "super::common::deserialize_some")]
    pub description: Option<Option<String>>,
}

/// A series with its published posts in reading order
#[derive(Debug, Clone, Serialize)]
pub struct SeriesDetail {
    #[serde(flatten)]
    pub series: Taxonomy,
    pub posts: Vec<Post>,
}
