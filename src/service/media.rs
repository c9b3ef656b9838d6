//! Media uploads stored on local disk

use crate::config::MediaConfig;
use crate::domain::{extension_for, Media, MediaUpload, StringUuid};
use crate::error::{AppError, Result};
use crate::repository::MediaRepository;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

pub struct MediaService {
    repo: Arc<dyn MediaRepository>,
    config: MediaConfig,
}

impl MediaService {
    pub fn new(repo: Arc<dyn MediaRepository>, config: MediaConfig) -> Self {
        Self { repo, config }
    }

    fn blog_dir(&self, blog_id: StringUuid) -> PathBuf {
        PathBuf::from(&self.config.upload_dir).join(blog_id.to_string())
    }

    fn public_url(&self, blog_id: StringUuid, filename: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.public_path.trim_end_matches('/'),
            blog_id,
            filename
        )
    }

    pub async fn list(
        &self,
        blog_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Media>, i64)> {
        let items = self.repo.list(blog_id, offset, limit).await?;
        let total = self.repo.count(blog_id).await?;
        Ok((items, total))
    }

    /// Check type and size, write the file, then record it
    pub async fn upload(&self, blog_id: StringUuid, upload: MediaUpload) -> Result<Media> {
        let ext = extension_for(&upload.content_type).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unsupported media type '{}'",
                upload.content_type
            ))
        })?;
        if upload.data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }
        if upload.data.len() > self.config.max_upload_bytes {
            return Err(AppError::BadRequest(format!(
                "File exceeds the {} byte limit",
                self.config.max_upload_bytes
            )));
        }

        let id = StringUuid::new_v4();
        let filename = format!("{}.{}", id, ext);
        let dir = self.blog_dir(blog_id);
        let path = dir.join(&filename);

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create upload dir: {}", e)))?;
        tokio::fs::write(&path, &upload.data)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write upload: {}", e)))?;

        let original_name = match upload.original_name.trim() {
            "" => filename.clone(),
            name => name.to_string(),
        };
        let media = Media {
            id,
            blog_id,
            url: self.public_url(blog_id, &filename),
            filename,
            original_name,
            mime_type: upload.content_type,
            size_bytes: upload.data.len() as i64,
            alt_text: upload.alt_text.filter(|a| !a.trim().is_empty()),
            created_at: Utc::now(),
        };

        match self.repo.create(&media).await {
            Ok(created) => {
                tracing::info!(blog_id = %blog_id, media_id = %created.id, size = created.size_bytes, "Media uploaded");
                Ok(created)
            }
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(path = %path.display(), "Failed to remove orphaned upload: {}", remove_err);
                }
                Err(e)
            }
        }
    }

    /// Delete the record and the file. A file already gone is not an error.
    pub async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()> {
        let media = self
            .repo
            .find_by_id(blog_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Media {} not found", id)))?;

        self.repo.delete(blog_id, id).await?;

        let path = self.blog_dir(blog_id).join(&media.filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Media file already missing");
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "Failed to remove media file: {}", e);
            }
        }
        Ok(())
    }
}
