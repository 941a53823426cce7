use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::application::auth::AuthenticatedAccount;
use crate::application::errors::ApiError;
use crate::application::routes::support::{
    JsonPayload, MessageResponse, PathId, StatusResponse,
};
use crate::application::state::AppState;
use crate::domain::ids::AccountId;
use crate::domain::users::{Account, AccountSubmission};

#[tracing::instrument(skip(state))]
pub(crate) async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Account>>, ApiError> {
    let accounts = state.account_repo.list().await?;
    Ok(Json(accounts))
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn create_account(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload<AccountSubmission>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let account = state.account_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn get_account(
    State(state): State<AppState>,
    PathId(id): PathId<AccountId>,
) -> Result<Json<Account>, ApiError> {
    let account = state.account_repo.get(id).await?;
    Ok(Json(account))
}

#[tracing::instrument(skip(state, _auth, payload))]
pub(crate) async fn update_account(
    State(state): State<AppState>,
    _auth: AuthenticatedAccount,
    PathId(id): PathId<AccountId>,
    JsonPayload(payload): JsonPayload<AccountSubmission>,
) -> Result<Json<Account>, ApiError> {
    let account = state.account_service.update(id, payload).await?;
    Ok(Json(account))
}

#[tracing::instrument(skip(state, _auth))]
pub(crate) async fn delete_account(
    State(state): State<AppState>,
    _auth: AuthenticatedAccount,
    PathId(id): PathId<AccountId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.account_service.delete(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

#[tracing::instrument(skip(state, _auth))]
pub(crate) async fn activate_account(
    State(state): State<AppState>,
    _auth: AuthenticatedAccount,
    PathId(id): PathId<AccountId>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.account_service.activate(id).await?;
    Ok(Json(StatusResponse::new("User activated")))
}
