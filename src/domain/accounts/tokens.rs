use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::AccountId;
use crate::domain::users::AccountSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by every signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub jti: String,
    pub token_type: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn account_id(&self) -> AccountId {
        AccountId::new(self.sub)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSubmission {
    pub username: String,
    pub password: String,
}

impl LoginSubmission {
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username: this field may not be blank".to_string());
        }
        if self.password.is_empty() {
            return Err("password: this field may not be blank".to_string());
        }
        Ok(())
    }
}

/// Body of logout and refresh requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSubmission {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: AccountSummary,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access: String,
}

/// A refresh token that can no longer be used.
#[derive(Debug, Clone)]
pub struct RevokedToken {
    pub jti: String,
    pub account_id: AccountId,
    pub revoked_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRevokedToken {
    pub jti: String,
    pub account_id: AccountId,
    pub expires_at: DateTime<Utc>,
}

impl NewRevokedToken {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            jti: claims.jti.clone(),
            account_id: claims.account_id(),
            expires_at: claims.expires_at(),
        }
    }
}
