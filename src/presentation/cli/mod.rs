pub mod library;
pub mod sessions;
pub mod users;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use library::{BookCommands, ProfileCommands, ReaderCommands};
use sessions::AuthCommands;
use users::UserCommands;

#[derive(Debug, Parser)]
#[command(author, version, about = "Manage user accounts, sessions and a small library", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "USERDESK_URL",
        default_value = "http://localhost:3000"
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Load accounts and library records from a JSON file
    Seed(SeedCommand),

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Sign up, log in and manage tokens
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Browse author profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Browse books
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },

    /// Browse readers
    Reader {
        #[command(subcommand)]
        command: ReaderCommands,
    },
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[arg(
        long,
        env = "USERDESK_DATABASE_URL",
        default_value = "sqlite://userdesk.db"
    )]
    pub database_url: String,

    #[arg(long, env = "USERDESK_BIND_ADDRESS", default_value = "127.0.0.1:3000")]
    pub bind_address: SocketAddr,

    /// Directory uploaded pictures are written under
    #[arg(long, env = "USERDESK_MEDIA_ROOT", default_value = "media")]
    pub media_root: PathBuf,

    /// Token signing secret; a random one is generated when absent
    #[arg(long, env = "USERDESK_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Access token lifetime, at most one week
    #[arg(
        long,
        env = "USERDESK_ACCESS_TOKEN_MINUTES",
        default_value_t = 5,
        value_parser = clap::value_parser!(i64).range(1..=10_080)
    )]
    pub access_token_minutes: i64,

    /// Refresh token lifetime, at most one year
    #[arg(
        long,
        env = "USERDESK_REFRESH_TOKEN_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(i64).range(1..=8_760)
    )]
    pub refresh_token_hours: i64,

    #[arg(
        long,
        env = "USERDESK_BCRYPT_COST",
        default_value_t = 12,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    pub bcrypt_cost: u32,
}

#[derive(Debug, Args)]
pub struct SeedCommand {
    #[arg(
        long,
        env = "USERDESK_DATABASE_URL",
        default_value = "sqlite://userdesk.db"
    )]
    pub database_url: String,

    /// Seed document (JSON)
    #[arg(long)]
    pub file: PathBuf,

    #[arg(long, env = "USERDESK_MEDIA_ROOT", default_value = "media")]
    pub media_root: PathBuf,

    #[arg(
        long,
        env = "USERDESK_BCRYPT_COST",
        default_value_t = 12,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    pub bcrypt_cost: u32,
}

pub(crate) fn print_json<T>(value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
