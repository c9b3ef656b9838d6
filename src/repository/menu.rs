//! Menu repository

use crate::domain::{MenuItem, MenuPosition, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn create(&self, item: &MenuItem) -> Result<MenuItem>;
    async fn find_by_id(&self, blog_id: StringUuid, id: StringUuid) -> Result<Option<MenuItem>>;
    /// Ordered by position
    async fn list(&self, blog_id: StringUuid) -> Result<Vec<MenuItem>>;
    async fn max_position(&self, blog_id: StringUuid) -> Result<Option<i32>>;
    async fn update(&self, item: &MenuItem) -> Result<MenuItem>;
    async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()>;
    /// Apply positions atomically; ids of other blogs are ignored
    async fn reorder(&self, blog_id: StringUuid, positions: &[MenuPosition]) -> Result<()>;
}

pub struct MenuRepositoryImpl {
    pool: MySqlPool,
}

impl MenuRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuRepository for MenuRepositoryImpl {
    async fn create(&self, item: &MenuItem) -> Result<MenuItem> {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, blog_id, label, url, position, parent_id, open_in_new_tab,
                                    created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(item.id)
        .bind(item.blog_id)
        .bind(&item.label)
        .bind(&item.url)
        .bind(item.position)
        .bind(item.parent_id)
        .bind(item.open_in_new_tab)
        .execute(&self.pool)
        .await?;

        self.find_by_id(item.blog_id, item.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create menu item")))
    }

    async fn find_by_id(&self, blog_id: StringUuid, id: StringUuid) -> Result<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, blog_id, label, url, position, parent_id, open_in_new_tab, created_at, updated_at
            FROM menu_items
            WHERE blog_id = ? AND id = ?
            "#,
        )
        .bind(blog_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn list(&self, blog_id: StringUuid) -> Result<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, blog_id, label, url, position, parent_id, open_in_new_tab, created_at, updated_at
            FROM menu_items
            WHERE blog_id = ?
            ORDER BY position, created_at
            "#,
        )
        .bind(blog_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn max_position(&self, blog_id: StringUuid) -> Result<Option<i32>> {
        let row: (Option<i32>,) =
            sqlx::query_as("SELECT MAX(position) FROM menu_items WHERE blog_id = ?")
                .bind(blog_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(row.0)
    }

    async fn update(&self, item: &MenuItem) -> Result<MenuItem> {
        let result = sqlx::query(
            r#"
            UPDATE menu_items
            SET label = ?, url = ?, position = ?, parent_id = ?, open_in_new_tab = ?, updated_at = NOW()
            WHERE id = ? AND blog_id = ?
            "#,
        )
        .bind(&item.label)
        .bind(&item.url)
        .bind(item.position)
        .bind(item.parent_id)
        .bind(item.open_in_new_tab)
        .bind(item.id)
        .bind(item.blog_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Menu item {} not found", item.id)));
        }

        self.find_by_id(item.blog_id, item.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update menu item")))
    }

    async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE menu_items SET parent_id = NULL WHERE blog_id = ? AND parent_id = ?")
            .bind(blog_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM menu_items WHERE id = ? AND blog_id = ?")
            .bind(id)
            .bind(blog_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Menu item {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn reorder(&self, blog_id: StringUuid, positions: &[MenuPosition]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for entry in positions {
            sqlx::query(
                r#"
                UPDATE menu_items SET position = ?, parent_id = ?, updated_at = NOW()
                WHERE id = ? AND blog_id = ?
                "#,
            )
            .bind(entry.position)
            .bind(entry.parent_id)
            .bind(entry.id)
            .bind(blog_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
