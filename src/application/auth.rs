use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::{Span, warn};

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::users::Account;

/// The account behind a valid `Authorization: Bearer <access token>` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub Account);

impl FromRequestParts<AppState> for AuthenticatedAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<AuthenticatedAccount>() {
            Span::current().record("account.id", tracing::field::display(&auth.0.id));
            return Ok(auth.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|err| {
            warn!(error = %err, "authorization header contains invalid characters");
            AppError::Unauthorized
        })?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let account = state.session_service.authenticate(token.trim()).await?;

        Span::current().record("account.id", tracing::field::display(&account.id));
        let auth = AuthenticatedAccount(account);
        parts.extensions.insert(auth.clone());
        Ok(auth)
    }
}
