use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::AccountId;

const MAX_USERNAME_LEN: usize = 150;

/// A registered account as exposed to callers. The password hash never leaves
/// the repository layer except through [`AccountCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Lightweight account info embedded in other representations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub username: String,
    pub email: String,
}

/// An account together with its stored password hash, used for login only.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub account: Account,
    pub password_hash: String,
}

/// Payload for creating or fully replacing an account.
///
/// `password` is plaintext here and is hashed by the account service before
/// anything reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSubmission {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AccountSubmission {
    pub fn normalize(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self
    }

    /// Check field rules. Returns a human-readable message for the first
    /// failing field.
    pub fn validate(&self) -> Result<(), String> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err("password: this field may not be blank".to_string());
        }
        Ok(())
    }

    pub fn into_new_account(self, password_hash: String) -> NewAccount {
        NewAccount {
            username: self.username,
            email: self.email,
            password_hash,
        }
    }
}

/// Validated account ready for insertion or replacement.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

pub type UpdateAccount = NewAccount;

fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("username: this field may not be blank".to_string());
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(format!(
            "username: ensure this field has no more than {MAX_USERNAME_LEN} characters"
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(
            "username: may contain only letters, numbers, and @/./+/-/_ characters".to_string(),
        );
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), String> {
    let invalid = || "email: enter a valid email address".to_string();

    let (local, domain) = email.rsplit_once('@').ok_or_else(invalid)?;
    if local.is_empty() || local.contains(char::is_whitespace) {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2
        || labels
            .iter()
            .any(|label| label.is_empty() || !label.chars().all(|c| c.is_alphanumeric() || c == '-'))
    {
        return Err(invalid());
    }
    Ok(())
}
