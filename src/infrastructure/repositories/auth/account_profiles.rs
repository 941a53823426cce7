use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};

use crate::domain::RepositoryError;
use crate::domain::account_profiles::{AccountProfile, PictureRef};
use crate::domain::ids::{AccountId, AccountProfileId};
use crate::domain::repositories::AccountProfileRepository;
use crate::infrastructure::database::DatabasePool;

const PROFILE_COLUMNS: &str =
    "id, account_id, picture_path, picture_filename, picture_content_type, updated_at";

#[derive(Clone)]
pub struct SqlAccountProfileRepository {
    pool: DatabasePool,
}

impl SqlAccountProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_domain(record: AccountProfileRecord) -> AccountProfile {
        let picture = match (
            record.picture_path,
            record.picture_filename,
            record.picture_content_type,
        ) {
            (Some(path), Some(filename), Some(content_type)) => Some(PictureRef {
                path,
                filename,
                content_type,
            }),
            _ => None,
        };

        AccountProfile {
            id: AccountProfileId::from(record.id),
            account_id: AccountId::from(record.account_id),
            picture,
            updated_at: record.updated_at,
        }
    }
}

#[async_trait]
impl AccountProfileRepository for SqlAccountProfileRepository {
    async fn get_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<AccountProfile, RepositoryError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM account_profiles WHERE account_id = ?");
        query_as::<_, AccountProfileRecord>(&sql)
            .bind(i64::from(account_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .map(Self::into_domain)
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_or_create(
        &self,
        account_id: AccountId,
    ) -> Result<AccountProfile, RepositoryError> {
        // A concurrent creator wins the unique index; we then read its row.
        query(
            "INSERT INTO account_profiles (account_id, updated_at) VALUES (?, ?) \
             ON CONFLICT (account_id) DO NOTHING",
        )
        .bind(i64::from(account_id))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::unexpected(err.to_string())
        })?;

        self.get_by_account(account_id).await
    }

    async fn set_picture(
        &self,
        account_id: AccountId,
        picture: PictureRef,
    ) -> Result<AccountProfile, RepositoryError> {
        let sql = format!(
            "UPDATE account_profiles \
             SET picture_path = ?, picture_filename = ?, picture_content_type = ?, updated_at = ? \
             WHERE account_id = ? RETURNING {PROFILE_COLUMNS}"
        );
        query_as::<_, AccountProfileRecord>(&sql)
            .bind(&picture.path)
            .bind(&picture.filename)
            .bind(&picture.content_type)
            .bind(Utc::now())
            .bind(i64::from(account_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .map(Self::into_domain)
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountProfileRecord {
    id: i64,
    account_id: i64,
    picture_path: Option<String>,
    picture_filename: Option<String>,
    picture_content_type: Option<String>,
    updated_at: DateTime<Utc>,
}
