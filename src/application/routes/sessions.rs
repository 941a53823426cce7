use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::application::auth::AuthenticatedAccount;
use crate::application::errors::ApiError;
use crate::application::routes::support::{JsonPayload, MessageResponse};
use crate::application::state::AppState;
use crate::domain::tokens::{AccessToken, LoginResponse, LoginSubmission, RefreshSubmission};
use crate::domain::users::{Account, AccountSubmission};

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn signup(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload<AccountSubmission>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.session_service.signup(payload).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("User created"))))
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn login(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload<LoginSubmission>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.session_service.login(payload).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn logout(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload<RefreshSubmission>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.session_service.logout(&payload.refresh).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn refresh(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload<RefreshSubmission>,
) -> Result<Json<AccessToken>, ApiError> {
    let access = state.session_service.refresh(&payload.refresh).await?;
    Ok(Json(access))
}

#[tracing::instrument(skip(auth))]
pub(crate) async fn me(auth: AuthenticatedAccount) -> Json<Account> {
    Json(auth.0)
}
