use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::ids::{AccountId, AuthorProfileId};
use crate::domain::users::AccountSummary;

/// An author profile with its owning account embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub id: AuthorProfileId,
    pub bio: String,
    pub website: Option<String>,
    pub author: AccountSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuthorProfile {
    pub account_id: AccountId,
    pub bio: String,
    #[serde(default)]
    pub website: Option<String>,
}

impl NewAuthorProfile {
    pub fn normalize(mut self) -> Self {
        self.bio = self.bio.trim().to_string();
        self.website = self
            .website
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(website) = &self.website {
            let parsed = Url::parse(website).map_err(|err| format!("website: {err}"))?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
                return Err("website: enter a valid http(s) URL".to_string());
            }
        }
        Ok(())
    }
}
