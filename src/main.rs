use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use userdesk::application::services::seed::{SeedConfig, seed_database};
use userdesk::application::{ServerConfig, serve};
use userdesk::infrastructure::client::UserdeskClient;
use userdesk::presentation::cli::{
    Cli, Commands, SeedCommand, ServeCommand, library, sessions, users,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(cmd) => run_server(cmd).await,
        Commands::Seed(cmd) => run_seed(cmd).await,
        Commands::User { command } => {
            let client = UserdeskClient::from_base_url(&cli.api_url)?;
            users::run(&client, command).await
        }
        Commands::Auth { command } => {
            let client = UserdeskClient::from_base_url(&cli.api_url)?;
            sessions::run(&client, command).await
        }
        Commands::Profile { command } => {
            let client = UserdeskClient::from_base_url(&cli.api_url)?;
            library::run_profiles(&client, command).await
        }
        Commands::Book { command } => {
            let client = UserdeskClient::from_base_url(&cli.api_url)?;
            library::run_books(&client, command).await
        }
        Commands::Reader { command } => {
            let client = UserdeskClient::from_base_url(&cli.api_url)?;
            library::run_readers(&client, command).await
        }
    }
}

async fn run_server(command: ServeCommand) -> Result<()> {
    let config = ServerConfig {
        bind_address: command.bind_address,
        database_url: command.database_url,
        media_root: command.media_root,
        jwt_secret: command.jwt_secret,
        access_token_minutes: command.access_token_minutes,
        refresh_token_hours: command.refresh_token_hours,
        bcrypt_cost: command.bcrypt_cost,
    };

    serve(config).await
}

async fn run_seed(command: SeedCommand) -> Result<()> {
    let report = seed_database(SeedConfig {
        database_url: command.database_url,
        file: command.file,
        media_root: command.media_root,
        bcrypt_cost: command.bcrypt_cost,
    })
    .await?;

    info!(?report, "seed complete");
    eprintln!(
        "Seed complete: {} accounts, {} author profiles, {} books, {} readers.",
        report.accounts, report.author_profiles, report.books, report.readers
    );
    Ok(())
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if logging cannot be initialized
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
