use anyhow::Result;

use super::UserdeskClient;
use crate::application::routes::support::MessageResponse;
use crate::domain::tokens::{AccessToken, LoginResponse, LoginSubmission, RefreshSubmission};
use crate::domain::users::{Account, AccountSubmission};

pub struct AuthClient<'a> {
    client: &'a UserdeskClient,
}

impl<'a> AuthClient<'a> {
    pub fn new(client: &'a UserdeskClient) -> Self {
        Self { client }
    }

    pub async fn signup(&self, payload: &AccountSubmission) -> Result<MessageResponse> {
        self.client.post_json("api/v1/auth/signup", payload).await
    }

    pub async fn login(&self, payload: &LoginSubmission) -> Result<LoginResponse> {
        self.client.post_json("api/v1/auth/login", payload).await
    }

    pub async fn logout(&self, refresh: String) -> Result<MessageResponse> {
        self.client
            .post_json("api/v1/auth/logout", &RefreshSubmission { refresh })
            .await
    }

    pub async fn refresh(&self, refresh: String) -> Result<AccessToken> {
        self.client
            .post_json("api/v1/auth/refresh", &RefreshSubmission { refresh })
            .await
    }

    pub async fn me(&self) -> Result<Account> {
        self.client.get_json("api/v1/auth/me").await
    }
}
