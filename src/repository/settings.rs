//! Blog settings repository

use crate::domain::{BlogSettings, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self, blog_id: StringUuid) -> Result<Option<BlogSettings>>;
    async fn upsert(&self, blog_id: StringUuid, settings: &BlogSettings) -> Result<()>;
}

pub struct SettingsRepositoryImpl {
    pool: MySqlPool,
}

impl SettingsRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SettingsRepositoryImpl {
    async fn get(&self, blog_id: StringUuid) -> Result<Option<BlogSettings>> {
        let row: Option<(sqlx::types::Json<BlogSettings>,)> =
            sqlx::query_as("SELECT settings FROM blog_settings WHERE blog_id = ?")
                .bind(blog_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(json,)| json.0))
    }

    async fn upsert(&self, blog_id: StringUuid, settings: &BlogSettings) -> Result<()> {
        let settings_json =
            serde_json::to_string(settings).map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO blog_settings (blog_id, settings, updated_at)
            VALUES (?, ?, NOW())
            ON DUPLICATE KEY UPDATE settings = VALUES(settings), updated_at = NOW()
            "#,
        )
        .bind(blog_id)
        .bind(&settings_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
