//! Comment repository

use crate::domain::{Comment, CommentStatus, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &Comment) -> Result<Comment>;
    async fn find_by_id(&self, blog_id: StringUuid, id: StringUuid) -> Result<Option<Comment>>;
    /// Approved comments of a post, oldest first
    async fn list_approved_for_post(&self, post_id: StringUuid) -> Result<Vec<Comment>>;
    /// Newest first
    async fn list(
        &self,
        blog_id: StringUuid,
        status: Option<CommentStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>>;
    async fn count(&self, blog_id: StringUuid, status: Option<CommentStatus>) -> Result<i64>;
    async fn update_status(
        &self,
        blog_id: StringUuid,
        id: StringUuid,
        status: CommentStatus,
        is_spam: bool,
    ) -> Result<Comment>;
    async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()>;
}

pub struct CommentRepositoryImpl {
    pool: MySqlPool,
}

impl CommentRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for CommentRepositoryImpl {
    async fn create(&self, comment: &Comment) -> Result<Comment> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, blog_id, post_id, parent_id, author_name, author_email, content,
                                  is_spam, status, ip_address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(comment.id)
        .bind(comment.blog_id)
        .bind(comment.post_id)
        .bind(comment.parent_id)
        .bind(&comment.author_name)
        .bind(&comment.author_email)
        .bind(&comment.content)
        .bind(comment.is_spam)
        .bind(comment.status)
        .bind(&comment.ip_address)
        .execute(&self.pool)
        .await?;

        self.find_by_id(comment.blog_id, comment.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create comment")))
    }

    async fn find_by_id(&self, blog_id: StringUuid, id: StringUuid) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, blog_id, post_id, parent_id, author_name, author_email, content, is_spam,
                   status, ip_address, created_at, updated_at
            FROM comments
            WHERE blog_id = ? AND id = ?
            "#,
        )
        .bind(blog_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_approved_for_post(&self, post_id: StringUuid) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, blog_id, post_id, parent_id, author_name, author_email, content, is_spam,
                   status, ip_address, created_at, updated_at
            FROM comments
            WHERE post_id = ? AND status = 'approved'
            ORDER BY created_at
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn list(
        &self,
        blog_id: StringUuid,
        status: Option<CommentStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, blog_id, post_id, parent_id, author_name, author_email, content, is_spam,
                   status, ip_address, created_at, updated_at
            FROM comments
            WHERE blog_id = ? AND (? IS NULL OR status = ?)
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(blog_id)
        .bind(status)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn count(&self, blog_id: StringUuid, status: Option<CommentStatus>) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM comments WHERE blog_id = ? AND (? IS NULL OR status = ?)",
        )
        .bind(blog_id)
        .bind(status)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    async fn update_status(
        &self,
        blog_id: StringUuid,
        id: StringUuid,
        status: CommentStatus,
        is_spam: bool,
    ) -> Result<Comment> {
        let result = sqlx::query(
            "UPDATE comments SET status = ?, is_spam = ?, updated_at = NOW() WHERE id = ? AND blog_id = ?",
        )
        .bind(status)
        .bind(is_spam)
        .bind(id)
        .bind(blog_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment {} not found", id)));
        }

        self.find_by_id(blog_id, id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update comment")))
    }

    async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ? AND blog_id = ?")
            .bind(id)
            .bind(blog_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment {} not found", id)));
        }

        Ok(())
    }
}
