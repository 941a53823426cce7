use async_trait::async_trait;
use sqlx::query_as;

use crate::domain::RepositoryError;
use crate::domain::author_profiles::{AuthorProfile, NewAuthorProfile};
use crate::domain::ids::{AccountId, AuthorProfileId};
use crate::domain::repositories::AuthorProfileRepository;
use crate::domain::users::AccountSummary;
use crate::infrastructure::database::DatabasePool;

/// Profile columns joined with the owning account, shared with the book queries.
pub(crate) const AUTHOR_SELECT: &str = r"SELECT ap.id AS author_id, ap.bio, ap.website,
          a.id AS account_id, a.username, a.email
   FROM author_profiles ap
   JOIN accounts a ON a.id = ap.account_id";

#[derive(Clone)]
pub struct SqlAuthorProfileRepository {
    pool: DatabasePool,
}

impl SqlAuthorProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        clause: &'static str,
        value: i64,
    ) -> Result<AuthorProfile, RepositoryError> {
        let sql = format!("{AUTHOR_SELECT} WHERE {clause} = ?");
        query_as::<_, AuthorProfileRecord>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .map(AuthorProfileRecord::into_domain)
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl AuthorProfileRepository for SqlAuthorProfileRepository {
    async fn insert(&self, profile: NewAuthorProfile) -> Result<AuthorProfile, RepositoryError> {
        let profile = profile.normalize();

        let (id,): (i64,) = query_as(
            "INSERT INTO author_profiles (account_id, bio, website) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(i64::from(profile.account_id))
        .bind(&profile.bio)
        .bind(profile.website.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.is_unique_violation() {
                    return RepositoryError::conflict("account already has an author profile");
                }
                if db_err.is_foreign_key_violation() {
                    return RepositoryError::conflict("account does not exist");
                }
            }
            RepositoryError::unexpected(err.to_string())
        })?;

        self.get(AuthorProfileId::from(id)).await
    }

    async fn get(&self, id: AuthorProfileId) -> Result<AuthorProfile, RepositoryError> {
        self.fetch_one_where("ap.id", i64::from(id)).await
    }

    async fn get_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<AuthorProfile, RepositoryError> {
        self.fetch_one_where("ap.account_id", i64::from(account_id))
            .await
    }

    async fn list(&self) -> Result<Vec<AuthorProfile>, RepositoryError> {
        let sql = format!("{AUTHOR_SELECT} ORDER BY ap.id ASC");
        let records = query_as::<_, AuthorProfileRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(records
            .into_iter()
            .map(AuthorProfileRecord::into_domain)
            .collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AuthorProfileRecord {
    pub author_id: i64,
    pub bio: String,
    pub website: Option<String>,
    pub account_id: i64,
    pub username: String,
    pub email: String,
}

impl AuthorProfileRecord {
    pub fn into_domain(self) -> AuthorProfile {
        AuthorProfile {
            id: AuthorProfileId::from(self.author_id),
            bio: self.bio,
            website: self.website,
            author: AccountSummary {
                id: AccountId::from(self.account_id),
                username: self.username,
                email: self.email,
            },
        }
    }
}
