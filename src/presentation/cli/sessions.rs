use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use super::users::AccountFields;
use crate::domain::tokens::LoginSubmission;
use crate::infrastructure::client::UserdeskClient;

#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Create an account without logging in
    Signup(AccountFields),
    /// Exchange credentials for an access and refresh token
    Login(LoginCommand),
    /// Revoke a refresh token
    Logout(RefreshTokenArgs),
    /// Mint a new access token from a refresh token
    Refresh(RefreshTokenArgs),
    /// Show the account behind USERDESK_TOKEN
    Me,
}

pub async fn run(client: &UserdeskClient, cmd: AuthCommands) -> Result<()> {
    let auth = client.auth();
    match cmd {
        AuthCommands::Signup(fields) => print_json(&auth.signup(&fields.into()).await?),
        AuthCommands::Login(c) => {
            let payload = LoginSubmission {
                username: c.username,
                password: c.password,
            };
            print_json(&auth.login(&payload).await?)
        }
        AuthCommands::Logout(c) => print_json(&auth.logout(c.refresh).await?),
        AuthCommands::Refresh(c) => print_json(&auth.refresh(c.refresh).await?),
        AuthCommands::Me => print_json(&auth.me().await?),
    }
}

#[derive(Debug, Args)]
pub struct LoginCommand {
    #[arg(long)]
    pub username: String,
    #[arg(long, env = "USERDESK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct RefreshTokenArgs {
    #[arg(long, env = "USERDESK_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh: String,
}
