use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, query_scalar};

use crate::domain::RepositoryError;
use crate::domain::ids::AccountId;
use crate::domain::repositories::RevokedTokenRepository;
use crate::domain::tokens::{NewRevokedToken, RevokedToken};
use crate::infrastructure::database::DatabasePool;
use crate::infrastructure::repositories::map_write_error;

#[derive(Clone)]
pub struct SqlRevokedTokenRepository {
    pool: DatabasePool,
}

impl SqlRevokedTokenRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevokedTokenRepository for SqlRevokedTokenRepository {
    async fn insert(&self, token: NewRevokedToken) -> Result<RevokedToken, RepositoryError> {
        let record = query_as::<_, RevokedTokenRecord>(
            "INSERT INTO revoked_tokens (jti, account_id, revoked_at, expires_at) \
             VALUES (?, ?, ?, ?) RETURNING jti, account_id, revoked_at, expires_at",
        )
        .bind(&token.jti)
        .bind(i64::from(token.account_id))
        .bind(Utc::now())
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_write_error(err, |_| RepositoryError::conflict("token already revoked")))?;

        Ok(RevokedToken {
            jti: record.jti,
            account_id: AccountId::from(record.account_id),
            revoked_at: record.revoked_at,
            expires_at: record.expires_at,
        })
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, RepositoryError> {
        let count: i64 = query_scalar("SELECT COUNT(*) FROM revoked_tokens WHERE jti = ?")
            .bind(jti)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(count > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = query("DELETE FROM revoked_tokens WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct RevokedTokenRecord {
    jti: String,
    account_id: i64,
    revoked_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}
