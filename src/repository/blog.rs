//! Blog repository

use crate::domain::{Blog, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self, blog: &Blog) -> Result<Blog>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Blog>>;
    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<Blog>>;
    async fn find_by_custom_domain(&self, domain: &str) -> Result<Option<Blog>>;
    async fn update(&self, blog: &Blog) -> Result<Blog>;
}

pub struct BlogRepositoryImpl {
    pool: MySqlPool,
}

impl BlogRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const BLOG_COLUMNS: &str =
    "id, name, subdomain, custom_domain, description, status, created_at, updated_at";

#[async_trait]
impl BlogRepository for BlogRepositoryImpl {
    async fn create(&self, blog: &Blog) -> Result<Blog> {
        sqlx::query(
            r#"
            INSERT INTO blogs (id, name, subdomain, custom_domain, description, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(blog.id)
        .bind(&blog.name)
        .bind(&blog.subdomain)
        .bind(&blog.custom_domain)
        .bind(&blog.description)
        .bind(blog.status)
        .execute(&self.pool)
        .await?;

        self.find_by_id(blog.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create blog")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Blog>> {
        let sql = format!("SELECT {} FROM blogs WHERE id = ?", BLOG_COLUMNS);
        let blog = sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(blog)
    }

    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<Blog>> {
        let sql = format!("SELECT {} FROM blogs WHERE subdomain = ?", BLOG_COLUMNS);
        let blog = sqlx::query_as::<_, Blog>(&sql)
            .bind(subdomain)
            .fetch_optional(&self.pool)
            .await?;

        Ok(blog)
    }

    async fn find_by_custom_domain(&self, domain: &str) -> Result<Option<Blog>> {
        let sql = format!("SELECT {} FROM blogs WHERE custom_domain = ?", BLOG_COLUMNS);
        let blog = sqlx::query_as::<_, Blog>(&sql)
            .bind(domain)
            .fetch_optional(&self.pool)
            .await?;

        Ok(blog)
    }

    async fn update(&self, blog: &Blog) -> Result<Blog> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET name = ?, custom_domain = ?, description = ?, status = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&blog.name)
        .bind(&blog.custom_domain)
        .bind(&blog.description)
        .bind(blog.status)
        .bind(blog.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Blog {} not found", blog.id)));
        }

        self.find_by_id(blog.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update blog")))
    }
}
