use serde::{Deserialize, Serialize};

use crate::domain::author_profiles::AuthorProfile;
use crate::domain::ids::{AuthorProfileId, BookId};

const MAX_TITLE_LEN: usize = 50;

/// A book with its author profile (and that profile's account) embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: AuthorProfile,
}

/// Lightweight book info embedded in reader listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author_id: AuthorProfileId,
}

impl NewBook {
    pub fn normalize(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("title: this field may not be blank".to_string());
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(format!(
                "title: ensure this field has no more than {MAX_TITLE_LEN} characters"
            ));
        }
        Ok(())
    }
}
