pub mod accounts;
pub mod auth;
pub mod library;

/// Generates `create`, `get`, `update` (full replace) and `delete` for a
/// resource client. `list` and resource-specific actions are written by hand.
macro_rules! define_client_crud {
    (
        resource_path: $path:expr,
        id_type: $id:ty,
        entity_type: $entity:ty,
        submission_type: $submission:ty,
        deleted_type: $deleted:ty
    ) => {
        pub async fn create(&self, payload: &$submission) -> anyhow::Result<$entity> {
            self.client.post_json($path, payload).await
        }

        pub async fn get(&self, id: $id) -> anyhow::Result<$entity> {
            self.client.get_json(&format!(concat!($path, "/{}"), id)).await
        }

        pub async fn update(&self, id: $id, payload: &$submission) -> anyhow::Result<$entity> {
            let url = self.client.endpoint(&format!(concat!($path, "/{}"), id))?;
            let response = self
                .client
                .request(reqwest::Method::PUT, url)
                .json(payload)
                .send()
                .await?;
            self.client.handle_response(response).await
        }

        pub async fn delete(&self, id: $id) -> anyhow::Result<$deleted> {
            let url = self.client.endpoint(&format!(concat!($path, "/{}"), id))?;
            let response = self
                .client
                .request(reqwest::Method::DELETE, url)
                .send()
                .await?;
            self.client.handle_response(response).await
        }
    };
}

pub(crate) use define_client_crud;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Url};

use crate::application::errors::ErrorResponse;

pub struct UserdeskClient {
    base_url: Url,
    http: Client,
    token: Option<String>,
}

impl UserdeskClient {
    pub fn new(base_url: Url) -> Result<Self> {
        let mut normalized = base_url;
        if !normalized.path().ends_with('/') {
            normalized.set_path(&format!("{}/", normalized.path().trim_end_matches('/')));
        }

        let token = std::env::var("USERDESK_TOKEN").ok();

        let http = Client::builder()
            .user_agent("userdesk-cli/1.0")
            .build()
            .context("failed to configure HTTP client")?;

        Ok(Self {
            base_url: normalized,
            http,
            token,
        })
    }

    /// Use `token` for bearer auth instead of `USERDESK_TOKEN`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn from_base_url(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url).with_context(|| format!("invalid API url: {base_url}"))?;
        Self::new(url)
    }

    pub fn accounts(&self) -> accounts::AccountsClient<'_> {
        accounts::AccountsClient::new(self)
    }

    pub fn auth(&self) -> auth::AuthClient<'_> {
        auth::AuthClient::new(self)
    }

    pub fn library(&self) -> library::LibraryClient<'_> {
        library::LibraryClient::new(self)
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid API path: {path}"))
    }

    /// Build a request with authentication if a token is available.
    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    pub(crate) async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self.request(reqwest::Method::GET, url).send().await?;
        self.handle_response(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub(crate) async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if response.status().is_success() {
            response
                .json::<T>()
                .await
                .context("failed to deserialize response body")
        } else {
            Err(self.response_error(response).await)
        }
    }

    pub(crate) async fn response_error(&self, response: reqwest::Response) -> anyhow::Error {
        let status = response.status();
        let bytes = response.bytes().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_slice::<ErrorResponse>(&bytes) {
            return anyhow!("request failed ({status}): {}", err.message);
        }

        let message = String::from_utf8_lossy(&bytes);
        anyhow!("request failed ({status}): {message}")
    }
}
