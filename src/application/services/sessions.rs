use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use super::{AccountService, verify_in_background};
use crate::application::errors::AppError;
use crate::domain::RepositoryError;
use crate::domain::repositories::{AccountRepository, RevokedTokenRepository};
use crate::domain::tokens::{
    AccessToken, Claims, LoginResponse, LoginSubmission, NewRevokedToken, TokenKind,
};
use crate::domain::users::{Account, AccountSubmission};
use crate::infrastructure::auth::TokenCodec;

/// Signup, login, logout and refresh on top of signed tokens.
#[derive(Clone)]
pub struct SessionService {
    accounts: AccountService,
    account_repo: Arc<dyn AccountRepository>,
    revoked_repo: Arc<dyn RevokedTokenRepository>,
    tokens: Arc<TokenCodec>,
}

impl SessionService {
    pub fn new(
        accounts: AccountService,
        account_repo: Arc<dyn AccountRepository>,
        revoked_repo: Arc<dyn RevokedTokenRepository>,
        tokens: Arc<TokenCodec>,
    ) -> Self {
        Self {
            accounts,
            account_repo,
            revoked_repo,
            tokens,
        }
    }

    pub async fn signup(&self, submission: AccountSubmission) -> Result<Account, AppError> {
        self.accounts.create(submission).await
    }

    #[tracing::instrument(skip(self, submission), fields(username = %submission.username))]
    pub async fn login(&self, submission: LoginSubmission) -> Result<LoginResponse, AppError> {
        submission.validate().map_err(AppError::Validation)?;
        let credentials = match self
            .account_repo
            .credentials_by_username(submission.username.trim())
            .await
        {
            Ok(credentials) => credentials,
            Err(RepositoryError::NotFound) => return Err(AppError::InvalidCredentials),
            Err(err) => return Err(err.into()),
        };

        let matches =
            verify_in_background(submission.password, credentials.password_hash).await?;
        if !matches || !credentials.account.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let account = credentials.account;
        let tokens = self.tokens.issue_pair(account.id)?;
        info!(account.id = %account.id, "login succeeded");

        Ok(LoginResponse {
            user: account.summary(),
            tokens,
        })
    }

    /// Revoke a refresh token so it can no longer mint access tokens.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self, refresh: &str) -> Result<(), AppError> {
        let claims = self.tokens.decode(refresh, TokenKind::Refresh)?;

        match self
            .revoked_repo
            .insert(NewRevokedToken::from_claims(&claims))
            .await
        {
            Ok(_) => {
                info!(account.id = %claims.account_id(), "refresh token revoked");
                Ok(())
            }
            Err(RepositoryError::Conflict(_)) => {
                Err(AppError::invalid_token("token has been revoked"))
            }
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn refresh(&self, refresh: &str) -> Result<AccessToken, AppError> {
        let claims = self.live_refresh_claims(refresh).await?;
        let access = self.tokens.issue(claims.account_id(), TokenKind::Access)?;
        Ok(AccessToken { access })
    }

    /// Resolve a bearer access token to its account.
    pub async fn authenticate(&self, access: &str) -> Result<Account, AppError> {
        let claims = self
            .tokens
            .decode(access, TokenKind::Access)
            .map_err(|_| AppError::Unauthorized)?;

        match self.account_repo.get(claims.account_id()).await {
            Ok(account) if account.is_active => Ok(account),
            Ok(_) | Err(RepositoryError::NotFound) => Err(AppError::Unauthorized),
            Err(err) => Err(err.into()),
        }
    }

    /// Decode a refresh token that is unrevoked and still belongs to an
    /// active account.
    async fn live_refresh_claims(&self, refresh: &str) -> Result<Claims, AppError> {
        let claims = self.tokens.decode(refresh, TokenKind::Refresh)?;
        if self.revoked_repo.is_revoked(&claims.jti).await? {
            return Err(AppError::invalid_token("token has been revoked"));
        }
        match self.account_repo.get(claims.account_id()).await {
            Ok(account) if account.is_active => Ok(claims),
            Ok(_) | Err(RepositoryError::NotFound) => {
                Err(AppError::invalid_token("account is no longer active"))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Periodically drop revocation records whose tokens have expired anyway.
/// The first pass runs immediately.
pub async fn revoked_token_purge_task(repo: Arc<dyn RevokedTokenRepository>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        match repo.delete_expired(Utc::now()).await {
            Ok(count) if count > 0 => {
                info!(count, "purged expired revoked tokens");
            }
            Err(err) => {
                warn!(error = %err, "revoked token purge failed");
            }
            _ => {}
        }
    }
}
