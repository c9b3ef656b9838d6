//! Navigation menu domain model

use super::common::{deserialize_some, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub id: StringUuid,
    pub blog_id: StringUuid,
    pub label: String,
    pub url: String,
    pub position: i32,
    pub parent_id: Option<StringUuid>,
    pub open_in_new_tab: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for MenuItem {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            blog_id: StringUuid::nil(),
            label: String::new(),
            url: String::new(),
            position: 0,
            parent_id: None,
            open_in_new_tab: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateMenuItemInput {
    #[validate(length(min = 1, max = 100))]
    pub label: String,
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    /// Appended after the last item when absent
    pub position: Option<i32>,
    pub parent_id: Option<StringUuid>,
    #[serde(default)]
    pub open_in_new_tab: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMenuItemInput {
    #[validate(length(min = 1, max = 100))]
    pub label: Option<String>,
    #[validate(length(min = 1, max = 2048))]
    pub url: Option<String>,
    pub position: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub parent_id: Option<Option<StringUuid>>,
    pub open_in_new_tab: Option<bool>,
}

/// One entry of a reorder request
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MenuPosition {
    pub id: StringUuid,
    pub position: i32,
    #[serde(default)]
    pub parent_id: Option<StringUuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderMenuInput {
    #[validate(length(min = 1))]
    pub items: Vec<MenuPosition>,
}
