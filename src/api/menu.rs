//! Navigation menu handlers

use crate::api::{MessageResponse, SuccessResponse};
use crate::domain::{CreateMenuItemInput, ReorderMenuInput, StringUuid, UpdateMenuItemInput};
use crate::error::Result;
use crate::middleware::{AuthUser, CurrentBlog};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// GET /api/menu
pub async fn list_public(
    State(state): State<AppState>,
    CurrentBlog(blog): CurrentBlog,
) -> Result<impl IntoResponse> {
    let items = state.menu_service.list(blog.id).await?;
    Ok(Json(SuccessResponse::new(items)))
}

pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let items = state.menu_service.list(auth.blog_id).await?;
    Ok(Json(SuccessResponse::new(items)))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateMenuItemInput>,
) -> Result<impl IntoResponse> {
    let item = state.menu_service.create(auth.blog_id, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(item))))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateMenuItemInput>,
) -> Result<impl IntoResponse> {
    let item = state.menu_service.update(auth.blog_id, id, input).await?;
    Ok(Json(SuccessResponse::new(item)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.menu_service.delete(auth.blog_id, id).await?;
    Ok(Json(MessageResponse::new("Menu item deleted successfully")))
}

/// PUT /api/admin/menu/reorder
pub async fn reorder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ReorderMenuInput>,
) -> Result<impl IntoResponse> {
    let items = state.menu_service.reorder(auth.blog_id, input).await?;
    Ok(Json(SuccessResponse::new(items)))
}
