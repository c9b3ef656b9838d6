//! Uploaded media domain model

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// MIME types accepted for upload, with the extension stored on disk
pub const ALLOWED_MEDIA_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/svg+xml", "svg"),
    ("application/pdf", "pdf"),
];

/// File extension for an allowed MIME type
pub fn extension_for(mime_type: &str) -> Option<&'static str> {
    let mime = mime_type.split(';').next().unwrap_or("").trim();
    ALLOWED_MEDIA_TYPES
        .iter()
        .find(|(m, _)| m.eq_ignore_ascii_case(mime))
        .map(|(_, ext)| *ext)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Media {
    pub id: StringUuid,
    pub blog_id: StringUuid,
    /// Name on disk, `<uuid>.<ext>`
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub url: String,
    pub alt_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// File received from a multipart upload
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub original_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub alt_text: Option<String>,
}
