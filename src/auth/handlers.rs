use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{
    ActionResponse, LoginRequest, LoginResponse, OwnerSignupRequest, ResendVerificationRequest,
    SignupResponse, UserMeResponse, VerifyAccountRequest,
};
use crate::auth::jwt::CurrentUser;
use crate::auth::service;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/verify", post(verify_account))
        .route("/auth/resend-verification", post(resend_verification))
        .route("/me", get(me))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = service::login(&state, payload).await?;
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<OwnerSignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let response = service::signup(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, payload))]
async fn verify_account(
    State(state): State<AppState>,
    Json(payload): Json<VerifyAccountRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let response = service::verify_account(&state, &payload.token).await?;
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<ResendVerificationRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let response = service::resend_verification(&state, &payload.email).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
async fn me(CurrentUser(user): CurrentUser) -> Json<UserMeResponse> {
    Json(UserMeResponse {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        role: user.role,
        email_verified: user.email_verified,
        last_login_at: user.last_login_at,
    })
}
