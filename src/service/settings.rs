//! Blog settings business logic

use crate::domain::{BlogSettings, PublicSettings, StringUuid, UpdateSettingsInput};
use crate::error::Result;
use crate::repository::SettingsRepository;
use std::sync::Arc;
use validator::Validate;

pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Stored settings, or defaults for a blog that never saved any
    pub async fn get(&self, blog_id: StringUuid) -> Result<BlogSettings> {
        Ok(self.repo.get(blog_id).await?.unwrap_or_default())
    }

    pub async fn get_public(&self, blog_id: StringUuid) -> Result<PublicSettings> {
        Ok(self.get(blog_id).await?.into())
    }

    pub async fn update(
        &self,
        blog_id: StringUuid,
        input: UpdateSettingsInput,
    ) -> Result<BlogSettings> {
        input.validate()?;
        let mut settings = self.get(blog_id).await?;
        settings.merge(input);
        self.repo.upsert(blog_id, &settings).await?;
        Ok(settings)
    }
}
