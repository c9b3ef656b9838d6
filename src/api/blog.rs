//! Blog profile handlers

use crate::api::SuccessResponse;
use crate::domain::UpdateBlogInput;
use crate::error::Result;
use crate::middleware::{AuthUser, CurrentBlog};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};

/// GET /api/blog
pub async fn get_public(CurrentBlog(blog): CurrentBlog) -> Result<impl IntoResponse> {
    Ok(Json(SuccessResponse::new(blog)))
}

/// GET /api/admin/blog
pub async fn get(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let blog = state.blog_service.get(auth.blog_id).await?;
    Ok(Json(SuccessResponse::new(blog)))
}

/// PUT /api/admin/blog
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateBlogInput>,
) -> Result<impl IntoResponse> {
    let blog = state
        .blog_service
        .update_profile(auth.blog_id, input)
        .await?;
    Ok(Json(SuccessResponse::new(blog)))
}
