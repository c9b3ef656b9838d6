//! Static page business logic

use super::resolve_slug;
use crate::domain::{CreatePageInput, Page, PublishStatus, StringUuid, UpdatePageInput};
use crate::error::{AppError, Result};
use crate::repository::PageRepository;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct PageService {
    repo: Arc<dyn PageRepository>,
}

impl PageService {
    pub fn new(repo: Arc<dyn PageRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_public(&self, blog_id: StringUuid) -> Result<Vec<Page>> {
        self.repo.list(blog_id, Some(PublishStatus::Published)).await
    }

    pub async fn get_public(&self, blog_id: StringUuid, slug: &str) -> Result<Page> {
        self.repo
            .find_by_slug(blog_id, slug)
            .await?
            .filter(|p| p.status == PublishStatus::Published)
            .ok_or_else(|| AppError::NotFound(format!("Page '{}' not found", slug)))
    }

    pub async fn list(&self, blog_id: StringUuid) -> Result<Vec<Page>> {
        self.repo.list(blog_id, None).await
    }

    pub async fn get(&self, blog_id: StringUuid, id: StringUuid) -> Result<Page> {
        self.repo
            .find_by_id(blog_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Page {} not found", id)))
    }

    pub async fn create(&self, blog_id: StringUuid, input: CreatePageInput) -> Result<Page> {
        input.validate()?;
        let repo = &self.repo;
        let slug = resolve_slug(input.slug.as_deref(), &input.title, "page", |s| async move {
            repo.slug_exists(blog_id, &s, None).await
        })
        .await?;

        let page = Page {
            blog_id,
            title: input.title,
            slug,
            content: input.content,
            status: input.status,
            ..Default::default()
        };
        self.repo.create(&page).await
    }

    pub async fn update(
        &self,
        blog_id: StringUuid,
        id: StringUuid,
        input: UpdatePageInput,
    ) -> Result<Page> {
        input.validate()?;
        let mut page = self.get(blog_id, id).await?;

        if let Some(slug) = input.slug.as_deref().filter(|s| *s != page.slug) {
            let repo = &self.repo;
            page.slug = resolve_slug(Some(slug), &page.title, "page", |s| async move {
                repo.slug_exists(blog_id, &s, Some(id)).await
            })
            .await?;
        }
        if let Some(title) = input.title {
            page.title = title;
        }
        if let Some(content) = input.content {
            page.content = content;
        }
        if let Some(status) = input.status {
            page.status = status;
        }
        page.updated_at = Utc::now();

        self.repo.update(&page).await
    }

    pub async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()> {
        self.repo.delete(blog_id, id).await
    }
}
