//! Business logic layer

pub mod auth;
pub mod blog;
pub mod comment;
pub mod media;
pub mod menu;
pub mod moderation;
pub mod otp;
pub mod page;
pub mod post;
pub mod settings;
pub mod subscription;
pub mod taxonomy;

pub use auth::AuthService;
pub use blog::BlogService;
pub use comment::CommentService;
pub use media::MediaService;
pub use menu::MenuService;
pub use moderation::SpamFilter;
pub use otp::OtpService;
pub use page::PageService;
pub use post::PostService;
pub use settings::SettingsService;
pub use subscription::SubscriptionService;
pub use taxonomy::TaxonomyService;

use crate::domain::slugify;
use crate::error::{AppError, Result};
use std::future::Future;

/// Attempts at `<base>-N` before falling back to a random suffix
const MAX_SLUG_SUFFIX: u32 = 50;

/// Pick the slug for a new or renamed entity.
///
/// An explicit slug must be free, otherwise `Conflict`. A slug derived from
/// `title` gets `-2`, `-3`, ... appended until it is free.
pub(crate) async fn resolve_slug<F, Fut>(
    explicit: Option<&str>,
    title: &str,
    fallback: &str,
    exists: F,
) -> Result<String>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    if let Some(slug) = explicit {
        if exists(slug.to_string()).await? {
            return Err(AppError::Conflict(format!("Slug '{}' is already in use", slug)));
        }
        return Ok(slug.to_string());
    }

    let mut base = slugify(title);
    if base.is_empty() {
        base = fallback.to_string();
    }
    base.truncate(200);

    if !exists(base.clone()).await? {
        return Ok(base);
    }
    for n in 2..=MAX_SLUG_SUFFIX {
        let candidate = format!("{}-{}", base, n);
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
    }

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    Ok(format!("{}-{}", base, &suffix[..8]))
}

/// Offset for a 1-based page
pub(crate) fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1) * per_page
}
