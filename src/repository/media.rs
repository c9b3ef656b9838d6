//! Media repository

use crate::domain::{Media, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn create(&self, media: &Media) -> Result<Media>;
    async fn find_by_id(&self, blog_id: StringUuid, id: StringUuid) -> Result<Option<Media>>;
    async fn list(&self, blog_id: StringUuid, offset: i64, limit: i64) -> Result<Vec<Media>>;
    async fn count(&self, blog_id: StringUuid) -> Result<i64>;
    async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()>;
}

pub struct MediaRepositoryImpl {
    pool: MySqlPool,
}

impl MediaRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaRepository for MediaRepositoryImpl {
    async fn create(&self, media: &Media) -> Result<Media> {
        sqlx::query(
            r#"
            INSERT INTO media (id, blog_id, filename, original_name, mime_type, size_bytes, url,
                               alt_text, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW())
            "#,
        )
        .bind(media.id)
        .bind(media.blog_id)
        .bind(&media.filename)
        .bind(&media.original_name)
        .bind(&media.mime_type)
        .bind(media.size_bytes)
        .bind(&media.url)
        .bind(&media.alt_text)
        .execute(&self.pool)
        .await?;

        self.find_by_id(media.blog_id, media.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create media")))
    }

    async fn find_by_id(&self, blog_id: StringUuid, id: StringUuid) -> Result<Option<Media>> {
        let media = sqlx::query_as::<_, Media>(
            r#"
            SELECT id, blog_id, filename, original_name, mime_type, size_bytes, url, alt_text, created_at
            FROM media
            WHERE blog_id = ? AND id = ?
            "#,
        )
        .bind(blog_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(media)
    }

    async fn list(&self, blog_id: StringUuid, offset: i64, limit: i64) -> Result<Vec<Media>> {
        let media = sqlx::query_as::<_, Media>(
            r#"
            SELECT id, blog_id, filename, original_name, mime_type, size_bytes, url, alt_text, created_at
            FROM media
            WHERE blog_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(blog_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(media)
    }

    async fn count(&self, blog_id: StringUuid) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media WHERE blog_id = ?")
            .bind(blog_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM media WHERE id = ? AND blog_id = ?")
            .bind(id)
            .bind(blog_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Media {} not found", id)));
        }

        Ok(())
    }
}
