//! Reader comments: submission gate and moderation

use super::moderation::SpamFilter;
use crate::cache::CommentThrottle;
use crate::domain::{
    Blog, Comment, CommentStatus, Post, PublicComment, StringUuid, SubmitCommentInput,
};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::{CommentRepository, PostRepository, SettingsRepository};
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

fn record_outcome(outcome: &'static str) {
    counter!("taita_comments_submitted_total", "outcome" => outcome).increment(1);
}

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    settings: Arc<dyn SettingsRepository>,
    throttle: Arc<dyn CommentThrottle>,
    jwt: JwtManager,
    filter: SpamFilter,
    rate_window: Duration,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        settings: Arc<dyn SettingsRepository>,
        throttle: Arc<dyn CommentThrottle>,
        jwt: JwtManager,
        filter: SpamFilter,
        rate_window: Duration,
    ) -> Self {
        Self {
            comments,
            posts,
            settings,
            throttle,
            jwt,
            filter,
            rate_window,
        }
    }

    async fn published_post(&self, blog_id: StringUuid, slug: &str) -> Result<Post> {
        self.posts
            .find_by_slug(blog_id, slug)
            .await?
            .filter(|p| p.is_published())
            .ok_or_else(|| AppError::NotFound(format!("Post '{}' not found", slug)))
    }

    /// Run a reader submission through the gate and store it.
    ///
    /// Checks run in order: commenter token, honeypot, input and target
    /// post, per-IP rate limit, content heuristic. The first failing check
    /// ends the request. Flagged content is stored as pending.
    ///
    /// The rate-limit slot is reserved before the insert and handed back
    /// if the insert fails.
    pub async fn submit(
        &self,
        blog: &Blog,
        post_slug: &str,
        bearer: Option<&str>,
        ip: &str,
        input: SubmitCommentInput,
    ) -> Result<Comment> {
        let Some(token) = bearer else {
            record_outcome("unauthenticated");
            return Err(AppError::Unauthorized(
                "A verified email is required to comment".to_string(),
            ));
        };
        let claims = self.jwt.verify_commenter_token(token).inspect_err(|_| {
            record_outcome("unauthenticated");
        })?;

        if input.honeypot_filled() {
            record_outcome("bot");
            tracing::info!(blog_id = %blog.id, ip = %ip, "Comment rejected by honeypot");
            return Err(AppError::BadRequest("Invalid submission".to_string()));
        }

        input.validate()?;
        let post = self.published_post(blog.id, post_slug).await?;

        let settings = self.settings.get(blog.id).await?.unwrap_or_default();
        if !settings.comments_enabled {
            return Err(AppError::Forbidden(
                "Comments are disabled on this blog".to_string(),
            ));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = self.comments.find_by_id(blog.id, parent_id).await?;
            let valid = parent
                .map(|p| p.post_id == post.id && p.status == CommentStatus::Approved)
                .unwrap_or(false);
            if !valid {
                return Err(AppError::BadRequest("Invalid parent comment".to_string()));
            }
        }

        let now = Utc::now();
        if !self.throttle.try_acquire(ip, now, self.rate_window).await? {
            record_outcome("rate_limited");
            return Err(AppError::TooManyRequests(
                "Please wait before commenting again".to_string(),
            ));
        }

        let reason = self.filter.check(&input.content, &settings.comment_blocklist);
        let status = if reason.is_some() || settings.moderate_all_comments {
            CommentStatus::Pending
        } else {
            CommentStatus::Approved
        };

        let comment = Comment {
            blog_id: blog.id,
            post_id: post.id,
            parent_id: input.parent_id,
            author_name: input.author_name.trim().to_string(),
            author_email: claims.email,
            content: input.content,
            is_spam: reason.is_some(),
            status,
            ip_address: Some(ip.to_string()),
            created_at: now,
            updated_at: now,
            ..Default::default()
        };
        let created = match self.comments.create(&comment).await {
            Ok(created) => created,
            Err(e) => {
                if let Err(release_err) = self.throttle.release(ip, now).await {
                    tracing::warn!(ip = %ip, "Failed to release comment slot: {}", release_err);
                }
                return Err(e);
            }
        };

        if let Some(reason) = reason {
            record_outcome("suspect");
            tracing::info!(comment_id = %created.id, reason = ?reason, "Comment held for review");
        } else {
            record_outcome(status.as_str());
        }

        Ok(created)
    }

    /// Approved comments of a published post
    pub async fn list_public(&self, blog_id: StringUuid, post_slug: &str) -> Result<Vec<PublicComment>> {
        let post = self.published_post(blog_id, post_slug).await?;
        let comments = self.comments.list_approved_for_post(post.id).await?;
        Ok(comments.into_iter().map(PublicComment::from).collect())
    }

    pub async fn list_admin(
        &self,
        blog_id: StringUuid,
        status: Option<CommentStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Comment>, i64)> {
        let comments = self.comments.list(blog_id, status, offset, limit).await?;
        let total = self.comments.count(blog_id, status).await?;
        Ok((comments, total))
    }

    /// Moderate a comment. Marking it spam also sets the spam flag.
    pub async fn set_status(
        &self,
        blog_id: StringUuid,
        id: StringUuid,
        status: CommentStatus,
    ) -> Result<Comment> {
        let is_spam = status == CommentStatus::Spam;
        self.comments.update_status(blog_id, id, status, is_spam).await
    }

    pub async fn delete(&self, blog_id: StringUuid, id: StringUuid) -> Result<()> {
        self.comments.delete(blog_id, id).await
    }
}
