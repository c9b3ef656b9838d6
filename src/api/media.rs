//! Media library handlers

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{MediaUpload, StringUuid};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

fn multipart_error(e: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (items, total) = state
        .media_service
        .list(auth.blog_id, pagination.offset(), pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        items,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// POST /api/admin/media (multipart: `file`, optional `alt_text`)
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut alt_text = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((original_name, content_type, data.to_vec()));
            }
            Some("alt_text") => {
                let text = field.text().await.map_err(multipart_error)?;
                alt_text = Some(text.trim().to_string()).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }

    let (original_name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' field".to_string()))?;

    let media = state
        .media_service
        .upload(
            auth.blog_id,
            MediaUpload {
                original_name,
                content_type,
                data,
                alt_text,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(media))))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.media_service.delete(auth.blog_id, id).await?;
    Ok(Json(MessageResponse::new("Media deleted successfully")))
}
