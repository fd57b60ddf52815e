use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::{
    service::SessionService,
    types::{LoginRequest, LoginResponse, RegisterRequest},
};
use crate::extract::ValidatedJson;
use crate::shared::{AppError, AppState};
use crate::user::UserResponse;

/// HTTP handler for registering a new user
///
/// POST /auth/register
/// Returns the created user without its password
#[instrument(name = "register", skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = SessionService::from_state(&state).register(request).await?;

    info!(user_id = user.id, "User registered");

    Ok(Json(user))
}

/// HTTP handler for logging in
///
/// POST /auth/login
/// Returns a JWT valid for 24 hours
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = SessionService::from_state(&state).login(request).await?;

    info!(token_length = response.token.len(), "Login succeeded");

    Ok(Json(response))
}
