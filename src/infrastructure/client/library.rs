use anyhow::Result;

use super::UserdeskClient;
use crate::domain::author_profiles::AuthorProfile;
use crate::domain::books::Book;
use crate::domain::ids::{AuthorProfileId, BookId, ReaderId};
use crate::domain::readers::Reader;

pub struct LibraryClient<'a> {
    client: &'a UserdeskClient,
}

impl<'a> LibraryClient<'a> {
    pub fn new(client: &'a UserdeskClient) -> Self {
        Self { client }
    }

    pub async fn list_profiles(&self) -> Result<Vec<AuthorProfile>> {
        self.client.get_json("api/v1/profiles").await
    }

    pub async fn get_profile(&self, id: AuthorProfileId) -> Result<AuthorProfile> {
        self.client.get_json(&format!("api/v1/profiles/{id}")).await
    }

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.client.get_json("api/v1/books").await
    }

    pub async fn get_book(&self, id: BookId) -> Result<Book> {
        self.client.get_json(&format!("api/v1/books/{id}")).await
    }

    pub async fn list_readers(&self) -> Result<Vec<Reader>> {
        self.client.get_json("api/v1/readers").await
    }

    pub async fn get_reader(&self, id: ReaderId) -> Result<Reader> {
        self.client.get_json(&format!("api/v1/readers/{id}")).await
    }
}
