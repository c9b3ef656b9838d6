//! Static page handlers

use crate::api::{MessageResponse, SuccessResponse};
use crate::domain::{CreatePageInput, StringUuid, UpdatePageInput};
use crate::error::Result;
use crate::middleware::{AuthUser, CurrentBlog};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// GET /api/pages
pub async fn list_public(
    State(state): State<AppState>,
    CurrentBlog(blog): CurrentBlog,
) -> Result<impl IntoResponse> {
    let pages = state.page_service.list_public(blog.id).await?;
    Ok(Json(SuccessResponse::new(pages)))
}

/// GET /api/pages/{slug}
pub async fn get_public(
    State(state): State<AppState>,
    CurrentBlog(blog): CurrentBlog,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let page = state.page_service.get_public(blog.id, &slug).await?;
    Ok(Json(SuccessResponse::new(page)))
}

pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let pages = state.page_service.list(auth.blog_id).await?;
    Ok(Json(SuccessResponse::new(pages)))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let page = state.page_service.get(auth.blog_id, id).await?;
    Ok(Json(SuccessResponse::new(page)))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreatePageInput>,
) -> Result<impl IntoResponse> {
    let page = state.page_service.create(auth.blog_id, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(page))))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdatePageInput>,
) -> Result<impl IntoResponse> {
    let page = state.page_service.update(auth.blog_id, id, input).await?;
    Ok(Json(SuccessResponse::new(page)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.page_service.delete(auth.blog_id, id).await?;
    Ok(Json(MessageResponse::new("Page deleted successfully")))
}
