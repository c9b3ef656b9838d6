//! Blog settings handlers

use crate::api::SuccessResponse;
use crate::domain::UpdateSettingsInput;
use crate::error::Result;
use crate::middleware::{AuthUser, CurrentBlog};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};

/// GET /api/settings (reader-facing subset)
pub async fn get_public(
    State(state): State<AppState>,
    CurrentBlog(blog): CurrentBlog,
) -> Result<impl IntoResponse> {
    let settings = state.settings_service.get_public(blog.id).await?;
    Ok(Json(SuccessResponse::new(settings)))
}

/// GET /api/admin/settings
pub async fn get(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let settings = state.settings_service.get(auth.blog_id).await?;
    Ok(Json(SuccessResponse::new(settings)))
}

/// PUT /api/admin/settings
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateSettingsInput>,
) -> Result<impl IntoResponse> {
    let settings = state.settings_service.update(auth.blog_id, input).await?;
    Ok(Json(SuccessResponse::new(settings)))
}
