use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::account_profiles::{AccountProfile, PictureRef};
use crate::domain::author_profiles::{AuthorProfile, NewAuthorProfile};
use crate::domain::books::{Book, NewBook};
use crate::domain::ids::{AccountId, AuthorProfileId, BookId, ReaderId};
use crate::domain::readers::{NewReader, Reader};
use crate::domain::tokens::{NewRevokedToken, RevokedToken};
use crate::domain::users::{Account, AccountCredentials, NewAccount, UpdateAccount};
use async_trait::async_trait;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn insert(&self, account: NewAccount) -> Result<Account, RepositoryError>;
    async fn get(&self, id: AccountId) -> Result<Account, RepositoryError>;
    async fn get_by_email(&self, email: &str) -> Result<Account, RepositoryError>;
    async fn get_by_username(&self, username: &str) -> Result<Account, RepositoryError>;
    async fn credentials_by_username(
        &self,
        username: &str,
    ) -> Result<AccountCredentials, RepositoryError>;
    async fn list(&self) -> Result<Vec<Account>, RepositoryError>;
    async fn update(
        &self,
        id: AccountId,
        changes: UpdateAccount,
    ) -> Result<Account, RepositoryError>;
    async fn set_active(&self, id: AccountId, active: bool) -> Result<Account, RepositoryError>;
    async fn delete(&self, id: AccountId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait AccountProfileRepository: Send + Sync {
    async fn get_by_account(&self, account_id: AccountId)
    -> Result<AccountProfile, RepositoryError>;
    /// Return the account's profile, creating an empty one if none exists.
    /// Safe under concurrent callers: the store keeps `account_id` unique.
    async fn get_or_create(&self, account_id: AccountId)
    -> Result<AccountProfile, RepositoryError>;
    async fn set_picture(
        &self,
        account_id: AccountId,
        picture: PictureRef,
    ) -> Result<AccountProfile, RepositoryError>;
}

#[async_trait]
pub trait AuthorProfileRepository: Send + Sync {
    async fn insert(&self, profile: NewAuthorProfile) -> Result<AuthorProfile, RepositoryError>;
    async fn get(&self, id: AuthorProfileId) -> Result<AuthorProfile, RepositoryError>;
    async fn get_by_account(&self, account_id: AccountId)
    -> Result<AuthorProfile, RepositoryError>;
    async fn list(&self) -> Result<Vec<AuthorProfile>, RepositoryError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn insert(&self, book: NewBook) -> Result<Book, RepositoryError>;
    async fn get(&self, id: BookId) -> Result<Book, RepositoryError>;
    async fn get_by_title(&self, title: &str) -> Result<Book, RepositoryError>;
    async fn list(&self) -> Result<Vec<Book>, RepositoryError>;
}

#[async_trait]
pub trait ReaderRepository: Send + Sync {
    async fn insert(&self, reader: NewReader) -> Result<Reader, RepositoryError>;
    async fn get(&self, id: ReaderId) -> Result<Reader, RepositoryError>;
    async fn list(&self) -> Result<Vec<Reader>, RepositoryError>;
}

#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    /// Record a revocation. Fails with `Conflict` if the jti is already revoked.
    async fn insert(&self, token: NewRevokedToken) -> Result<RevokedToken, RepositoryError>;
    async fn is_revoked(&self, jti: &str) -> Result<bool, RepositoryError>;
    /// Drop entries whose token would have expired anyway.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}
