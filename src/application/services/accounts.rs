use std::sync::Arc;

use tracing::{info, warn};

use super::hash_in_background;
use crate::application::errors::AppError;
use crate::domain::RepositoryError;
use crate::domain::ids::AccountId;
use crate::domain::repositories::{AccountProfileRepository, AccountRepository};
use crate::domain::storage::PictureStore;
use crate::domain::users::{Account, AccountSubmission};

#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    profile_repo: Arc<dyn AccountProfileRepository>,
    picture_store: Arc<dyn PictureStore>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(
        repo: Arc<dyn AccountRepository>,
        profile_repo: Arc<dyn AccountProfileRepository>,
        picture_store: Arc<dyn PictureStore>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repo,
            profile_repo,
            picture_store,
            bcrypt_cost,
        }
    }

    #[tracing::instrument(skip(self, submission), fields(username = %submission.username))]
    pub async fn create(&self, submission: AccountSubmission) -> Result<Account, AppError> {
        let submission = submission.normalize();
        submission.validate().map_err(AppError::Validation)?;
        self.ensure_unique(&submission, None).await?;

        let hash = hash_in_background(submission.password.clone(), self.bcrypt_cost).await?;
        let account = self.repo.insert(submission.into_new_account(hash)).await?;

        info!(account.id = %account.id, username = %account.username, "account created");
        Ok(account)
    }

    /// Replace every writable field of an account.
    #[tracing::instrument(skip(self, submission))]
    pub async fn update(
        &self,
        id: AccountId,
        submission: AccountSubmission,
    ) -> Result<Account, AppError> {
        self.repo.get(id).await?;

        let submission = submission.normalize();
        submission.validate().map_err(AppError::Validation)?;
        self.ensure_unique(&submission, Some(id)).await?;

        let hash = hash_in_background(submission.password.clone(), self.bcrypt_cost).await?;
        let account = self
            .repo
            .update(id, submission.into_new_account(hash))
            .await?;

        info!(account.id = %account.id, "account updated");
        Ok(account)
    }

    /// Delete an account. Its profile row goes with it; the stored picture is
    /// removed afterwards on a best-effort basis.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: AccountId) -> Result<(), AppError> {
        let picture = match self.profile_repo.get_by_account(id).await {
            Ok(profile) => profile.picture,
            Err(RepositoryError::NotFound) => None,
            Err(err) => return Err(err.into()),
        };

        self.repo.delete(id).await?;
        info!(account.id = %id, "account deleted");

        if let Some(picture) = picture
            && let Err(err) = self.picture_store.remove(&picture.path).await
        {
            warn!(error = %err, path = %picture.path, "failed to remove picture of deleted account");
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, id: AccountId) -> Result<Account, AppError> {
        let account = self.repo.set_active(id, true).await?;
        info!(account.id = %id, "account activated");
        Ok(account)
    }

    pub async fn set_active(&self, id: AccountId, active: bool) -> Result<Account, AppError> {
        Ok(self.repo.set_active(id, active).await?)
    }

    async fn ensure_unique(
        &self,
        submission: &AccountSubmission,
        exclude: Option<AccountId>,
    ) -> Result<(), AppError> {
        let is_other = |account: &Account| Some(account.id) != exclude;

        match self.repo.get_by_email(&submission.email).await {
            Ok(existing) if is_other(&existing) => {
                return Err(AppError::validation(
                    "email: user with this email already exists",
                ));
            }
            Ok(_) | Err(RepositoryError::NotFound) => {}
            Err(err) => return Err(err.into()),
        }

        match self.repo.get_by_username(&submission.username).await {
            Ok(existing) if is_other(&existing) => Err(AppError::validation(
                "username: a user with that username already exists",
            )),
            Ok(_) | Err(RepositoryError::NotFound) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
