//! Post handlers

use crate::api::{
    default_page, default_per_page, deserialize_page, deserialize_per_page, MessageResponse,
    PaginatedResponse, PaginationQuery, SuccessResponse,
};
use crate::domain::{
    CreatePostInput, PostFilter, PublicPostQuery, PublishStatus, StringUuid, UpdatePostInput,
};
use crate::error::Result;
use crate::middleware::{AuthUser, CurrentBlog};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

/// Reader listing: pagination plus term slugs and free-text search
#[derive(Debug, Deserialize)]
pub struct PublicPostListQuery {
    #[serde(default = "default_page", deserialize_with = "deserialize_page")]
    pub page: i64,
    #[serde(
        default = "default_per_page",
        deserialize_with = "deserialize_per_page",
        alias = "limit"
    )]
    pub per_page: i64,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub series: Option<String>,
    pub search: Option<String>,
}

/// Admin listing: pagination plus status and term ids
#[derive(Debug, Deserialize)]
pub struct AdminPostListQuery {
    #[serde(default = "default_page", deserialize_with = "deserialize_page")]
    pub page: i64,
    #[serde(
        default = "default_per_page",
        deserialize_with = "deserialize_per_page",
        alias = "limit"
    )]
    pub per_page: i64,
    pub status: Option<PublishStatus>,
    pub category_id: Option<StringUuid>,
    pub tag_id: Option<StringUuid>,
    pub series_id: Option<StringUuid>,
    pub search: Option<String>,
}

/// GET /api/posts
pub async fn list_public(
    State(state): State<AppState>,
    CurrentBlog(blog): CurrentBlog,
    Query(query): Query<PublicPostListQuery>,
) -> Result<impl IntoResponse> {
    let page = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let filter = PublicPostQuery {
        category: query.category,
        tag: query.tag,
        series: query.series,
        search: query.search,
    };
    let (posts, total) = state
        .post_service
        .list_public(blog.id, &filter, page.offset(), page.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        posts,
        page.page,
        page.per_page,
        total,
    )))
}

/// GET /api/posts/{slug}
pub async fn get_public(
    State(state): State<AppState>,
    CurrentBlog(blog): CurrentBlog,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let post = state.post_service.get_public(blog.id, &slug).await?;
    Ok(Json(SuccessResponse::new(post)))
}

/// GET /api/admin/posts
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AdminPostListQuery>,
) -> Result<impl IntoResponse> {
    let page = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let filter = PostFilter {
        status: query.status,
        category_id: query.category_id,
        tag_id: query.tag_id,
        series_id: query.series_id,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };
    let (posts, total) = state
        .post_service
        .list(auth.blog_id, &filter, page.offset(), page.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        posts,
        page.page,
        page.per_page,
        total,
    )))
}

/// GET /api/admin/posts/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let post = state.post_service.get(auth.blog_id, id).await?;
    Ok(Json(SuccessResponse::new(post)))
}

/// POST /api/admin/posts
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreatePostInput>,
) -> Result<impl IntoResponse> {
    let post = state
        .post_service
        .create(auth.blog_id, auth.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(post))))
}

/// PUT /api/admin/posts/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdatePostInput>,
) -> Result<impl IntoResponse> {
    let post = state.post_service.update(auth.blog_id, id, input).await?;
    Ok(Json(SuccessResponse::new(post)))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.post_service.delete(auth.blog_id, id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
