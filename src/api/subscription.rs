//! Subscription and payment webhook handlers

use crate::api::SuccessResponse;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use serde_json::json;

/// GET /api/admin/subscription
pub async fn get(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let subscription = state.subscription_service.get(auth.blog_id).await?;
    Ok(Json(SuccessResponse::new(subscription)))
}

/// POST /api/webhooks/mercadopago
///
/// Redelivered events are acknowledged with 200 so the provider stops
/// retrying them.
pub async fn mercadopago(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> Result<impl IntoResponse> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let outcome = state
        .subscription_service
        .handle_notification(payload, header("x-signature"), header("x-request-id"))
        .await?;
    Ok(Json(json!({ "received": true, "result": outcome.as_str() })))
}
