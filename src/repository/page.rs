//! Page repository

use crate::domain::{Page, PublishStatus, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn create(&self, page: &Page) -> Result<Page>;
    async fn find_by_id(&self, blog_id: StringUuid, id: StringUuid) -> Result<Option<Page>>;
    async fn find_by_slug(&self, blog_id: StringUuid, slug: &str) -> Result<Option<Page>>;
    async fn list(&self, blog_id: StringUuid, status: Option<PublishStatus>) -> Result<Vec<Page>>;
    async fn update(&self, page: &Page) -> Result<Page>;
    async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()>;
    async fn slug_exists(
        &self,
        blog_id: StringUuid,
        slug: &str,
        exclude_id: Option<StringUuid>,
    ) -> Result<bool>;
}

pub struct PageRepositoryImpl {
    pool: MySqlPool,
}

impl PageRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageRepository for PageRepositoryImpl {
    async fn create(&self, page: &Page) -> Result<Page> {
        sqlx::query(
            r#"
            INSERT INTO pages (id, blog_id, title, slug, content, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(page.id)
        .bind(page.blog_id)
        .bind(&page.title)
        .bind(&page.slug)
        .bind(&page.content)
        .bind(page.status)
        .execute(&self.pool)
        .await?;

        self.find_by_id(page.blog_id, page.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create page")))
    }

    async fn find_by_id(&self, blog_id: StringUuid, id: StringUuid) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, blog_id, title, slug, content, status, created_at, updated_at
            FROM pages
            WHERE blog_id = ? AND id = ?
            "#,
        )
        .bind(blog_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }

    async fn find_by_slug(&self, blog_id: StringUuid, slug: &str) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, blog_id, title, slug, content, status, created_at, updated_at
            FROM pages
            WHERE blog_id = ? AND slug = ?
            "#,
        )
        .bind(blog_id)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }

    async fn list(&self, blog_id: StringUuid, status: Option<PublishStatus>) -> Result<Vec<Page>> {
        let pages = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, blog_id, title, slug, content, status, created_at, updated_at
            FROM pages
            WHERE blog_id = ? AND (? IS NULL OR status = ?)
            ORDER BY title
            "#,
        )
        .bind(blog_id)
        .bind(status)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(pages)
    }

    async fn update(&self, page: &Page) -> Result<Page> {
        let result = sqlx::query(
            r#"
            UPDATE pages
            SET title = ?, slug = ?, content = ?, status = ?, updated_at = NOW()
            WHERE id = ? AND blog_id = ?
            "#,
        )
        .bind(&page.title)
        .bind(&page.slug)
        .bind(&page.content)
        .bind(page.status)
        .bind(page.id)
        .bind(page.blog_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Page {} not found", page.id)));
        }

        self.find_by_id(page.blog_id, page.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update page")))
    }

    async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM pages WHERE id = ? AND blog_id = ?")
            .bind(id)
            .bind(blog_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Page {} not found", id)));
        }

        Ok(())
    }

    async fn slug_exists(
        &self,
        blog_id: StringUuid,
        slug: &str,
        exclude_id: Option<StringUuid>,
    ) -> Result<bool> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM pages WHERE blog_id = ? AND slug = ? AND (? IS NULL OR id <> ?)",
        )
        .bind(blog_id)
        .bind(slug)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0 > 0)
    }
}
