use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{AccountService, PictureService, SeedService, SessionService};
use crate::domain::repositories::{
    AccountProfileRepository, AccountRepository, AuthorProfileRepository, BookRepository,
    ReaderRepository, RevokedTokenRepository,
};
use crate::domain::storage::PictureStore;
use crate::infrastructure::auth::TokenCodec;
use crate::infrastructure::database::Database;
use crate::infrastructure::repositories::{
    SqlAccountProfileRepository, SqlAccountRepository, SqlAuthorProfileRepository,
    SqlBookRepository, SqlReaderRepository, SqlRevokedTokenRepository,
};
use crate::infrastructure::storage::FilesystemPictureStore;

/// Everything that varies between production and test environments.
/// Repositories and services are created from the database pool.
pub struct AppStateConfig {
    pub tokens: TokenCodec,
    pub media_root: PathBuf,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct AppState {
    pub account_repo: Arc<dyn AccountRepository>,
    pub account_profile_repo: Arc<dyn AccountProfileRepository>,
    pub author_profile_repo: Arc<dyn AuthorProfileRepository>,
    pub book_repo: Arc<dyn BookRepository>,
    pub reader_repo: Arc<dyn ReaderRepository>,
    pub revoked_token_repo: Arc<dyn RevokedTokenRepository>,
    pub picture_store: Arc<dyn PictureStore>,
    pub account_service: AccountService,
    pub session_service: SessionService,
    pub picture_service: PictureService,
    pub seed_service: SeedService,
}

impl AppState {
    pub fn from_database(database: &Database, config: AppStateConfig) -> Self {
        let pool = database.clone_pool();

        let account_repo: Arc<dyn AccountRepository> =
            Arc::new(SqlAccountRepository::new(pool.clone()));
        let account_profile_repo: Arc<dyn AccountProfileRepository> =
            Arc::new(SqlAccountProfileRepository::new(pool.clone()));
        let author_profile_repo: Arc<dyn AuthorProfileRepository> =
            Arc::new(SqlAuthorProfileRepository::new(pool.clone()));
        let book_repo: Arc<dyn BookRepository> = Arc::new(SqlBookRepository::new(pool.clone()));
        let reader_repo: Arc<dyn ReaderRepository> =
            Arc::new(SqlReaderRepository::new(pool.clone()));
        let revoked_token_repo: Arc<dyn RevokedTokenRepository> =
            Arc::new(SqlRevokedTokenRepository::new(pool));
        let picture_store: Arc<dyn PictureStore> =
            Arc::new(FilesystemPictureStore::new(config.media_root));

        let account_service = AccountService::new(
            Arc::clone(&account_repo),
            Arc::clone(&account_profile_repo),
            Arc::clone(&picture_store),
            config.bcrypt_cost,
        );
        let session_service = SessionService::new(
            account_service.clone(),
            Arc::clone(&account_repo),
            Arc::clone(&revoked_token_repo),
            Arc::new(config.tokens),
        );
        let picture_service = PictureService::new(
            Arc::clone(&account_repo),
            Arc::clone(&account_profile_repo),
            Arc::clone(&picture_store),
        );
        let seed_service = SeedService::new(
            account_service.clone(),
            Arc::clone(&account_repo),
            Arc::clone(&author_profile_repo),
            Arc::clone(&book_repo),
            Arc::clone(&reader_repo),
        );

        Self {
            account_repo,
            account_profile_repo,
            author_profile_repo,
            book_repo,
            reader_repo,
            revoked_token_repo,
            picture_store,
            account_service,
            session_service,
            picture_service,
            seed_service,
        }
    }
}
