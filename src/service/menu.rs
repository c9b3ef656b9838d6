//! Navigation menu business logic

use crate::domain::{
    CreateMenuItemInput, MenuItem, ReorderMenuInput, StringUuid, UpdateMenuItemInput,
};
use crate::error::{AppError, Result};
use crate::repository::MenuRepository;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

pub struct MenuService {
    repo: Arc<dyn MenuRepository>,
}

impl MenuService {
    pub fn new(repo: Arc<dyn MenuRepository>) -> Self {
        Self { repo }
    }

    /// Items ordered by position
    pub async fn list(&self, blog_id: StringUuid) -> Result<Vec<MenuItem>> {
        self.repo.list(blog_id).await
    }

    async fn check_parent(
        &self,
        blog_id: StringUuid,
        item_id: StringUuid,
        parent_id: Option<StringUuid>,
    ) -> Result<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        if parent_id == item_id {
            return Err(AppError::BadRequest(
                "A menu item cannot be its own parent".to_string(),
            ));
        }
        if self.repo.find_by_id(blog_id, parent_id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Parent menu item {} does not exist",
                parent_id
            )));
        }
        Ok(())
    }

    pub async fn create(&self, blog_id: StringUuid, input: CreateMenuItemInput) -> Result<MenuItem> {
        input.validate()?;
        let mut item = MenuItem {
            blog_id,
            label: input.label,
            url: input.url,
            parent_id: input.parent_id,
            open_in_new_tab: input.open_in_new_tab,
            ..Default::default()
        };
        self.check_parent(blog_id, item.id, item.parent_id).await?;

        item.position = match input.position {
            Some(position) => position,
            None => self
                .repo
                .max_position(blog_id)
                .await?
                .map(|p| p + 1)
                .unwrap_or(0),
        };

        self.repo.create(&item).await
    }

    pub async fn update(
        &self,
        blog_id: StringUuid,
        id: StringUuid,
        input: UpdateMenuItemInput,
    ) -> Result<MenuItem> {
        input.validate()?;
        let mut item = self
            .repo
            .find_by_id(blog_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Menu item {} not found", id)))?;

        if let Some(label) = input.label {
            item.label = label;
        }
        if let Some(url) = input.url {
            item.url = url;
        }
        if let Some(position) = input.position {
            item.position = position;
        }
        if let Some(parent_id) = input.parent_id {
            self.check_parent(blog_id, id, parent_id).await?;
            item.parent_id = parent_id;
        }
        if let Some(new_tab) = input.open_in_new_tab {
            item.open_in_new_tab = new_tab;
        }
        item.updated_at = Utc::now();

        self.repo.update(&item).await
    }

    /// Remove an item; its children move to the top level
    pub async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()> {
        self.repo.delete(blog_id, id).await
    }

    /// Apply new positions and parents in one transaction
    pub async fn reorder(&self, blog_id: StringUuid, input: ReorderMenuInput) -> Result<Vec<MenuItem>> {
        input.validate()?;
        let known: HashSet<StringUuid> = self
            .repo
            .list(blog_id)
            .await?
            .into_iter()
            .map(|item| item.id)
            .collect();

        let mut seen = HashSet::new();
        for entry in &input.items {
            if !known.contains(&entry.id) {
                return Err(AppError::BadRequest(format!(
                    "Menu item {} does not exist",
                    entry.id
                )));
            }
            if !seen.insert(entry.id) {
                return Err(AppError::BadRequest(format!(
                    "Menu item {} is listed twice",
                    entry.id
                )));
            }
            if let Some(parent_id) = entry.parent_id {
                if parent_id == entry.id || !known.contains(&parent_id) {
                    return Err(AppError::BadRequest(format!(
                        "Invalid parent for menu item {}",
                        entry.id
                    )));
                }
            }
        }

        self.repo.reorder(blog_id, &input.items).await?;
        self.repo.list(blog_id).await
    }
}
