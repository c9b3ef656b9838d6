//! Comment domain model

use super::common::{string_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Moderation status of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Spam,
}

string_enum!(CommentStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Spam => "spam",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: StringUuid,
    pub blog_id: StringUuid,
    pub post_id: StringUuid,
    pub parent_id: Option<StringUuid>,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    /// Set when the content heuristic flagged the comment
    pub is_spam: bool,
    pub status: CommentStatus,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Comment {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            blog_id: StringUuid::nil(),
            post_id: StringUuid::nil(),
            parent_id: None,
            author_name: String::new(),
            author_email: String::new(),
            content: String::new(),
            is_spam: false,
            status: CommentStatus::default(),
            ip_address: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Comment as shown to readers: no email, no IP
#[derive(Debug, Clone, Serialize)]
pub struct PublicComment {
    pub id: StringUuid,
    pub post_id: StringUuid,
    pub parent_id: Option<StringUuid>,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for PublicComment {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            post_id: c.post_id,
            parent_id: c.parent_id,
            author_name: c.author_name,
            content: c.content,
            created_at: c.created_at,
        }
    }
}

/// Returned to the submitter so they know whether the comment is held
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedComment {
    #[serde(flatten)]
    pub comment: PublicComment,
    pub status: CommentStatus,
}

impl From<Comment> for SubmittedComment {
    fn from(c: Comment) -> Self {
        let status = c.status;
        Self {
            comment: c.into(),
            status,
        }
    }
}

/// Body of a reader comment submission
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitCommentInput {
    #[validate(length(min = 1, max = 100))]
    pub author_name: String,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    pub parent_id: Option<StringUuid>,
    /// Hidden form field; humans leave it empty
    #[serde(default, alias = "website")]
    pub honeypot: Option<String>,
}

impl SubmitCommentInput {
    pub fn honeypot_filled(&self) -> bool {
        self.honeypot
            .as_deref()
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommentStatusInput {
    pub status: CommentStatus,
}
