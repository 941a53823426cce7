use serde::{Deserialize, Serialize};

use crate::domain::books::BookSummary;
use crate::domain::ids::{BookId, ReaderId};

const MAX_NAME_LEN: usize = 20;

/// A reader with every book they have read embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reader {
    pub id: ReaderId,
    pub name: String,
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReader {
    pub name: String,
    #[serde(default)]
    pub book_ids: Vec<BookId>,
}

impl NewReader {
    /// Trim the name and collapse duplicate book ids, keeping first-seen order.
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        let mut seen = std::collections::HashSet::new();
        self.book_ids.retain(|id| seen.insert(*id));
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("name: this field may not be blank".to_string());
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(format!(
                "name: ensure this field has no more than {MAX_NAME_LEN} characters"
            ));
        }
        Ok(())
    }
}
