//! Category, tag and series handlers
//!
//! The three kinds share handlers; each route set binds its kind.

use crate::api::{MessageResponse, SuccessResponse};
use crate::domain::{CreateTaxonomyInput, StringUuid, TaxonomyKind, UpdateTaxonomyInput};
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, CurrentBlog};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

/// Public listing of one kind at `path`
pub fn public_routes(path: &str, kind: TaxonomyKind) -> Router<AppState> {
    Router::new().route(
        path,
        get(
            move |State(state): State<AppState>, CurrentBlog(blog): CurrentBlog| async move {
                let terms = state.taxonomy_service.list(blog.id, kind).await?;
                Ok::<_, AppError>(Json(SuccessResponse::new(terms)))
            },
        ),
    )
}

/// Admin CRUD of one kind at `path` and `path/{id}`
pub fn admin_routes(path: &str, kind: TaxonomyKind) -> Router<AppState> {
    Router::new()
        .route(
            path,
            get(move |state: State<AppState>, auth: AuthUser| list(state, auth, kind)).post(
                move |state: State<AppState>, auth: AuthUser, body: Json<CreateTaxonomyInput>| {
                    create(state, auth, body, kind)
                },
            ),
        )
        .route(
            &format!("{}/{{id}}", path),
            get(
                move |state: State<AppState>, auth: AuthUser, id: Path<StringUuid>| {
                    get_one(state, auth, id, kind)
                },
            )
            .put(
                move |state: State<AppState>,
                      auth: AuthUser,
                      id: Path<StringUuid>,
                      body: Json<UpdateTaxonomyInput>| {
                    update(state, auth, id, body, kind)
                },
            )
            .delete(
                move |state: State<AppState>, auth: AuthUser, id: Path<StringUuid>| {
                    delete(state, auth, id, kind)
                },
            ),
        )
}

/// GET /api/series/{slug}
pub async fn series_detail(
    State(state): State<AppState>,
    CurrentBlog(blog): CurrentBlog,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let detail = state.taxonomy_service.series_detail(blog.id, &slug).await?;
    Ok(Json(SuccessResponse::new(detail)))
}

async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    kind: TaxonomyKind,
) -> Result<impl IntoResponse> {
    let terms = state.taxonomy_service.list(auth.blog_id, kind).await?;
    Ok(Json(SuccessResponse::new(terms)))
}

async fn get_one(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
    kind: TaxonomyKind,
) -> Result<impl IntoResponse> {
    let term = state.taxonomy_service.get(auth.blog_id, kind, id).await?;
    Ok(Json(SuccessResponse::new(term)))
}

async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTaxonomyInput>,
    kind: TaxonomyKind,
) -> Result<impl IntoResponse> {
    let term = state
        .taxonomy_service
        .create(auth.blog_id, kind, input)
        .await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(term))))
}

async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateTaxonomyInput>,
    kind: TaxonomyKind,
) -> Result<impl IntoResponse> {
    let term = state
        .taxonomy_service
        .update(auth.blog_id, kind, id, input)
        .await?;
    Ok(Json(SuccessResponse::new(term)))
}

async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<StringUuid>,
    kind: TaxonomyKind,
) -> Result<impl IntoResponse> {
    state
        .taxonomy_service
        .delete(auth.blog_id, kind, id)
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "{} deleted successfully",
        kind.label()
    ))))
}
