use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AccountService;
use crate::application::errors::AppError;
use crate::application::server::BCRYPT_COST_RANGE;
use crate::application::state::{AppState, AppStateConfig};
use crate::domain::author_profiles::NewAuthorProfile;
use crate::domain::books::NewBook;
use crate::domain::ids::BookId;
use crate::domain::readers::NewReader;
use crate::domain::repositories::{
    AccountRepository, AuthorProfileRepository, BookRepository, ReaderRepository,
};
use crate::domain::users::AccountSubmission;
use crate::infrastructure::auth::{TokenCodec, generate_secret};
use crate::infrastructure::database::Database;

/// A self-contained document of accounts and library records.
///
/// Author profiles refer to accounts by username, books to authors by
/// username, and readers to books by title.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SeedData {
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
    #[serde(default)]
    pub author_profiles: Vec<SeedAuthorProfile>,
    #[serde(default)]
    pub books: Vec<SeedBook>,
    #[serde(default)]
    pub readers: Vec<SeedReader>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SeedAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SeedAuthorProfile {
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SeedBook {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SeedReader {
    pub name: String,
    #[serde(default)]
    pub books: Vec<String>,
}

impl SeedData {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw)
            .map_err(|err| AppError::validation(format!("invalid seed document: {err}")))
    }

    /// Check every cross reference resolves within the document.
    pub fn check_references(&self) -> Result<(), AppError> {
        let usernames: HashSet<&str> = self
            .accounts
            .iter()
            .map(|a| a.username.trim())
            .collect();
        let authors: HashSet<&str> = self
            .author_profiles
            .iter()
            .map(|p| p.username.trim())
            .collect();
        let titles: HashSet<&str> = self.books.iter().map(|b| b.title.trim()).collect();

        if let Some(profile) = self
            .author_profiles
            .iter()
            .find(|p| !usernames.contains(p.username.trim()))
        {
            return Err(AppError::validation(format!(
                "author profile refers to unknown account '{}'",
                profile.username
            )));
        }
        if let Some(book) = self
            .books
            .iter()
            .find(|b| !authors.contains(b.author.trim()))
        {
            return Err(AppError::validation(format!(
                "book '{}' refers to unknown author '{}'",
                book.title, book.author
            )));
        }
        for reader in &self.readers {
            if let Some(title) = reader.books.iter().find(|t| !titles.contains(t.trim())) {
                return Err(AppError::validation(format!(
                    "reader '{}' refers to unknown book '{title}'",
                    reader.name
                )));
            }
        }
        Ok(())
    }
}

/// Counts of records written by a seed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub accounts: usize,
    pub author_profiles: usize,
    pub books: usize,
    pub readers: usize,
}

#[derive(Clone)]
pub struct SeedService {
    accounts: AccountService,
    account_repo: Arc<dyn AccountRepository>,
    author_repo: Arc<dyn AuthorProfileRepository>,
    book_repo: Arc<dyn BookRepository>,
    reader_repo: Arc<dyn ReaderRepository>,
}

impl SeedService {
    pub fn new(
        accounts: AccountService,
        account_repo: Arc<dyn AccountRepository>,
        author_repo: Arc<dyn AuthorProfileRepository>,
        book_repo: Arc<dyn BookRepository>,
        reader_repo: Arc<dyn ReaderRepository>,
    ) -> Self {
        Self {
            accounts,
            account_repo,
            author_repo,
            book_repo,
            reader_repo,
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn load(&self, data: SeedData) -> Result<SeedReport, AppError> {
        data.check_references()?;
        let mut report = SeedReport::default();

        for seed in data.accounts {
            let account = self
                .accounts
                .create(AccountSubmission {
                    username: seed.username,
                    email: seed.email,
                    password: seed.password,
                })
                .await?;
            if !seed.is_active {
                self.accounts.set_active(account.id, false).await?;
            }
            report.accounts += 1;
        }

        for seed in data.author_profiles {
            let account = self.account_repo.get_by_username(seed.username.trim()).await?;
            let profile = NewAuthorProfile {
                account_id: account.id,
                bio: seed.bio,
                website: seed.website,
            }
            .normalize();
            profile.validate().map_err(AppError::Validation)?;
            self.author_repo.insert(profile).await?;
            report.author_profiles += 1;
        }

        for seed in data.books {
            let account = self.account_repo.get_by_username(seed.author.trim()).await?;
            let author = self.author_repo.get_by_account(account.id).await?;
            let book = NewBook {
                title: seed.title,
                author_id: author.id,
            }
            .normalize();
            book.validate().map_err(AppError::Validation)?;
            self.book_repo.insert(book).await?;
            report.books += 1;
        }

        for seed in data.readers {
            let mut book_ids: Vec<BookId> = Vec::with_capacity(seed.books.len());
            for title in &seed.books {
                book_ids.push(self.book_repo.get_by_title(title.trim()).await?.id);
            }
            let reader = NewReader {
                name: seed.name,
                book_ids,
            }
            .normalize();
            reader.validate().map_err(AppError::Validation)?;
            self.reader_repo.insert(reader).await?;
            report.readers += 1;
        }

        info!(
            accounts = report.accounts,
            author_profiles = report.author_profiles,
            books = report.books,
            readers = report.readers,
            "seed data loaded"
        );
        Ok(report)
    }
}

pub struct SeedConfig {
    pub database_url: String,
    pub file: PathBuf,
    pub media_root: PathBuf,
    pub bcrypt_cost: u32,
}

/// Load a seed file into the configured database.
pub async fn seed_database(config: SeedConfig) -> anyhow::Result<SeedReport> {
    anyhow::ensure!(
        BCRYPT_COST_RANGE.contains(&config.bcrypt_cost),
        "bcrypt cost must be within {}..={}, got {}",
        BCRYPT_COST_RANGE.start(),
        BCRYPT_COST_RANGE.end(),
        config.bcrypt_cost
    );
    let raw = tokio::fs::read_to_string(&config.file)
        .await
        .with_context(|| format!("failed to read {}", config.file.display()))?;
    let data = SeedData::from_json(&raw)?;

    let database = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    // Seeding never issues tokens; the codec only satisfies the state builder.
    let state = AppState::from_database(
        &database,
        AppStateConfig {
            tokens: TokenCodec::new(
                generate_secret().as_bytes(),
                chrono::Duration::minutes(5),
                chrono::Duration::hours(24),
            ),
            media_root: config.media_root,
            bcrypt_cost: config.bcrypt_cost,
        },
    );

    let report = state.seed_service.load(data).await?;
    Ok(report)
}
