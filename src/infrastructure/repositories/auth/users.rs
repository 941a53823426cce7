use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};

use crate::domain::RepositoryError;
use crate::domain::ids::AccountId;
use crate::domain::repositories::AccountRepository;
use crate::domain::users::{Account, AccountCredentials, NewAccount, UpdateAccount};
use crate::infrastructure::database::DatabasePool;
use crate::infrastructure::repositories::map_write_error;

const ACCOUNT_COLUMNS: &str = "id, username, email, is_active, created_at";

#[derive(Clone)]
pub struct SqlAccountRepository {
    pool: DatabasePool,
}

impl SqlAccountRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_domain(record: AccountRecord) -> Account {
        Account {
            id: AccountId::from(record.id),
            username: record.username,
            email: record.email,
            is_active: record.is_active,
            created_at: record.created_at,
        }
    }

    fn duplicate(message: &str) -> RepositoryError {
        if message.contains("accounts.email") {
            RepositoryError::conflict("email: an account with this email already exists")
        } else {
            RepositoryError::conflict("username: an account with this username already exists")
        }
    }

    async fn fetch_one_by(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Account, RepositoryError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = ?");
        query_as::<_, AccountRecord>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .map(Self::into_domain)
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl AccountRepository for SqlAccountRepository {
    async fn insert(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let sql = format!(
            "INSERT INTO accounts (username, email, password_hash, is_active, created_at) \
             VALUES (?, ?, ?, 1, ?) RETURNING {ACCOUNT_COLUMNS}"
        );
        let record = query_as::<_, AccountRecord>(&sql)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| map_write_error(err, Self::duplicate))?;

        Ok(Self::into_domain(record))
    }

    async fn get(&self, id: AccountId) -> Result<Account, RepositoryError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?");
        let record = query_as::<_, AccountRecord>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        match record {
            Some(record) => Ok(Self::into_domain(record)),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<Account, RepositoryError> {
        self.fetch_one_by("email", email).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Account, RepositoryError> {
        self.fetch_one_by("username", username).await
    }

    async fn credentials_by_username(
        &self,
        username: &str,
    ) -> Result<AccountCredentials, RepositoryError> {
        let record = query_as::<_, CredentialsRecord>(
            "SELECT id, username, email, is_active, created_at, password_hash \
             FROM accounts WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(AccountCredentials {
            account: Account {
                id: AccountId::from(record.id),
                username: record.username,
                email: record.email,
                is_active: record.is_active,
                created_at: record.created_at,
            },
            password_hash: record.password_hash,
        })
    }

    async fn list(&self) -> Result<Vec<Account>, RepositoryError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id ASC");
        let records = query_as::<_, AccountRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(records.into_iter().map(Self::into_domain).collect())
    }

    async fn update(
        &self,
        id: AccountId,
        changes: UpdateAccount,
    ) -> Result<Account, RepositoryError> {
        let sql = format!(
            "UPDATE accounts SET username = ?, email = ?, password_hash = ? \
             WHERE id = ? RETURNING {ACCOUNT_COLUMNS}"
        );
        let record = query_as::<_, AccountRecord>(&sql)
            .bind(&changes.username)
            .bind(&changes.email)
            .bind(&changes.password_hash)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| map_write_error(err, Self::duplicate))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(Self::into_domain(record))
    }

    async fn set_active(&self, id: AccountId, active: bool) -> Result<Account, RepositoryError> {
        let sql =
            format!("UPDATE accounts SET is_active = ? WHERE id = ? RETURNING {ACCOUNT_COLUMNS}");
        let record = query_as::<_, AccountRecord>(&sql)
            .bind(active)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(Self::into_domain(record))
    }

    async fn delete(&self, id: AccountId) -> Result<(), RepositoryError> {
        let result = query("DELETE FROM accounts WHERE id = ?")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRecord {
    id: i64,
    username: String,
    email: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CredentialsRecord {
    id: i64,
    username: String,
    email: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    password_hash: String,
}
