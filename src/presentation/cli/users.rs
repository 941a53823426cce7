use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::print_json;
use crate::domain::ids::AccountId;
use crate::domain::users::AccountSubmission;
use crate::infrastructure::client::UserdeskClient;

#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// List all accounts
    List,
    /// Get an account by ID
    Get(AccountIdArgs),
    /// Create an account
    Create(AccountFields),
    /// Replace an account's username, email and password
    Update(UpdateAccountCommand),
    /// Delete an account
    Delete(AccountIdArgs),
    /// Mark an account active
    Activate(AccountIdArgs),
    /// Upload a profile picture
    #[command(name = "upload-picture")]
    UploadPicture(UploadPictureCommand),
    /// Download a profile picture
    #[command(name = "download-picture")]
    DownloadPicture(DownloadPictureCommand),
}

pub async fn run(client: &UserdeskClient, cmd: UserCommands) -> Result<()> {
    let accounts = client.accounts();
    match cmd {
        UserCommands::List => print_json(&accounts.list().await?),
        UserCommands::Get(c) => print_json(&accounts.get(c.account_id()).await?),
        UserCommands::Create(fields) => print_json(&accounts.create(&fields.into()).await?),
        UserCommands::Update(c) => {
            let id = AccountId::new(c.id);
            print_json(&accounts.update(id, &c.fields.into()).await?)
        }
        UserCommands::Delete(c) => print_json(&accounts.delete(c.account_id()).await?),
        UserCommands::Activate(c) => print_json(&accounts.activate(c.account_id()).await?),
        UserCommands::UploadPicture(c) => upload_picture(client, c).await,
        UserCommands::DownloadPicture(c) => download_picture(client, c).await,
    }
}

#[derive(Debug, Args)]
pub struct AccountIdArgs {
    #[arg(long)]
    pub id: i64,
}

impl AccountIdArgs {
    fn account_id(&self) -> AccountId {
        AccountId::new(self.id)
    }
}

#[derive(Debug, Args)]
pub struct AccountFields {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "USERDESK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl From<AccountFields> for AccountSubmission {
    fn from(fields: AccountFields) -> Self {
        Self {
            username: fields.username,
            email: fields.email,
            password: fields.password,
        }
    }
}

#[derive(Debug, Args)]
pub struct UpdateAccountCommand {
    #[arg(long)]
    pub id: i64,
    #[command(flatten)]
    pub fields: AccountFields,
}

#[derive(Debug, Args)]
pub struct UploadPictureCommand {
    #[arg(long)]
    pub id: i64,
    /// Image file to upload
    #[arg(long)]
    pub file: PathBuf,
}

async fn upload_picture(client: &UserdeskClient, command: UploadPictureCommand) -> Result<()> {
    let data = tokio::fs::read(&command.file)
        .await
        .with_context(|| format!("failed to read {}", command.file.display()))?;
    let filename = command
        .file
        .file_name()
        .map_or_else(|| "picture".to_string(), |n| n.to_string_lossy().into_owned());

    let profile = client
        .accounts()
        .upload_picture(AccountId::new(command.id), filename, data)
        .await?;
    print_json(&profile)
}

#[derive(Debug, Args)]
pub struct DownloadPictureCommand {
    #[arg(long)]
    pub id: i64,
    /// Where to write the picture; defaults to its original filename
    #[arg(long)]
    pub output: Option<PathBuf>,
}

async fn download_picture(client: &UserdeskClient, command: DownloadPictureCommand) -> Result<()> {
    let picture = client
        .accounts()
        .download_picture(AccountId::new(command.id))
        .await?;
    let output = command
        .output
        .unwrap_or_else(|| PathBuf::from(&picture.filename));

    tokio::fs::write(&output, &picture.data)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!(
        "Wrote {} bytes ({}) to {}",
        picture.data.len(),
        picture.content_type,
        output.display()
    );
    Ok(())
}
