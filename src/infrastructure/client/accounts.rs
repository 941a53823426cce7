use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};

use super::{UserdeskClient, define_client_crud};
use crate::application::routes::support::{MessageResponse, StatusResponse};
use crate::domain::account_profiles::{AccountProfile, PictureDownload};
use crate::domain::ids::AccountId;
use crate::domain::users::{Account, AccountSubmission};

pub struct AccountsClient<'a> {
    client: &'a UserdeskClient,
}

impl<'a> AccountsClient<'a> {
    pub fn new(client: &'a UserdeskClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Account>> {
        self.client.get_json("api/v1/users").await
    }

    define_client_crud!(
        resource_path: "api/v1/users",
        id_type: AccountId,
        entity_type: Account,
        submission_type: AccountSubmission,
        deleted_type: MessageResponse
    );

    pub async fn activate(&self, id: AccountId) -> Result<StatusResponse> {
        let url = self.client.endpoint(&format!("api/v1/users/{id}/activate"))?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn upload_picture(
        &self,
        id: AccountId,
        filename: String,
        data: Vec<u8>,
    ) -> Result<AccountProfile> {
        let url = self
            .client
            .endpoint(&format!("api/v1/users/{id}/upload_profile_pic"))?;
        let form = Form::new().part("profile_pic", Part::bytes(data).file_name(filename));
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .multipart(form)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn download_picture(&self, id: AccountId) -> Result<PictureDownload> {
        let url = self
            .client
            .endpoint(&format!("api/v1/users/{id}/download_profile_pic"))?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(self.client.response_error(response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| format!("profile-{id}"));
        let data = response
            .bytes()
            .await
            .context("failed to read picture body")?
            .to_vec();

        Ok(PictureDownload {
            filename,
            content_type,
            data,
        })
    }
}

fn filename_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
