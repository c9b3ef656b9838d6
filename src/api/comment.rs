//! Comment handlers: reader submission and admin moderation

use crate::api::{
    default_page, default_per_page, deserialize_page, deserialize_per_page, MessageResponse,
    PaginatedResponse, PaginationQuery, SuccessResponse,
};
use crate::domain::{
    CommentStatus, StringUuid, SubmitCommentInput, SubmittedComment, UpdateCommentStatusInput,
};
use crate::error::Result;
use crate::middleware::{bearer_token, AuthUser, ClientIp, CurrentBlog};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    #[serde(default = "default_page", deserialize_with = "deserialize_page")]
    pub page: i64,
    #[serde(
        default = "default_per_page",
        deserialize_with = "deserialize_per_page",
        alias = "limit"
    )]
    pub per_page: i64,
    pub status: Option<CommentStatus>,
}

/// GET /api/posts/{slug}/comments
pub async fn list_public(
    State(state): State<AppState>,
    CurrentBlog(blog): CurrentBlog,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let comments = state.comment_service.list_public(blog.id, &slug).await?;
    Ok(Json(SuccessResponse::new(comments)))
}

/// POST /api/posts/{slug}/comments
///
/// Requires the commenter token issued by OTP verification.
pub async fn submit(
    State(state): State<AppState>,
    CurrentBlog(blog): CurrentBlog,
    ClientIp(ip): ClientIp,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Json(input): Json<SubmitCommentInput>,
) -> Result<impl IntoResponse> {
    let comment = state
        .comment_service
        .submit(&blog, &slug, bearer_token(&headers), &ip, input)
        .await?;
    Ok(Json(SuccessResponse::new(SubmittedComment::from(comment))))
}

/// GET /api/admin/comments?status=
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CommentListQuery>,
) -> Result<impl IntoResponse> {
    let page = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let (comments, total) = state
        .comment_service
        .list_admin(auth.blog_id, query.status, page.offset(), page.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        comments,
        page.page,
        page.per_page,
        total,
    )))
}

/// PUT /api/admin/comments/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateCommentStatusInput>,
) -> Result<impl IntoResponse> {
    let comment = state
        .comment_service
        .set_status(auth.blog_id, id, input.status)
        .await?;
    Ok(Json(SuccessResponse::new(comment)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.comment_service.delete(auth.blog_id, id).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}
