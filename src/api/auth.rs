//! Authentication handlers: blog owner signup/login and commenter OTP

use crate::api::SuccessResponse;
use crate::domain::{LoginInput, RequestOtpInput, SignupInput, VerifyOtpInput};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupInput>,
) -> Result<impl IntoResponse> {
    let response = state.auth_service.signup(input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(response))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse> {
    let response = state.auth_service.login(input).await?;
    Ok(Json(SuccessResponse::new(response)))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let user = state.auth_service.me(auth.user_id).await?;
    Ok(Json(SuccessResponse::new(user)))
}

/// POST /api/auth/otp/request
pub async fn request_otp(
    State(state): State<AppState>,
    Json(input): Json<RequestOtpInput>,
) -> Result<impl IntoResponse> {
    let requested = state.otp_service.request(input).await?;
    Ok(Json(SuccessResponse::new(requested)))
}

/// POST /api/auth/otp/verify
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(input): Json<VerifyOtpInput>,
) -> Result<impl IntoResponse> {
    let token = state.otp_service.verify(input).await?;
    Ok(Json(SuccessResponse::new(token)))
}
