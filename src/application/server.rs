use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::TimeDelta;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::application::routes::app_router;
use crate::application::services::sessions::revoked_token_purge_task;
use crate::application::state::{AppState, AppStateConfig};
use crate::infrastructure::auth::{TokenCodec, generate_secret};
use crate::infrastructure::database::Database;

const PURGE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(3600);

/// Cost range the bcrypt crate accepts.
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub media_root: PathBuf,
    pub jwt_secret: Option<String>,
    pub access_token_minutes: i64,
    pub refresh_token_hours: i64,
    pub bcrypt_cost: u32,
}

impl ServerConfig {
    fn token_codec(&self) -> anyhow::Result<TokenCodec> {
        anyhow::ensure!(
            self.access_token_minutes > 0,
            "access token lifetime must be positive, got {} minutes",
            self.access_token_minutes
        );
        anyhow::ensure!(
            self.refresh_token_hours > 0,
            "refresh token lifetime must be positive, got {} hours",
            self.refresh_token_hours
        );
        let access_ttl = TimeDelta::try_minutes(self.access_token_minutes)
            .context("access token lifetime is out of range")?;
        let refresh_ttl = TimeDelta::try_hours(self.refresh_token_hours)
            .context("refresh token lifetime is out of range")?;

        let secret = match &self.jwt_secret {
            Some(secret) if !secret.is_empty() => secret.clone(),
            _ => {
                warn!(
                    "USERDESK_JWT_SECRET is not set; using a random secret, tokens will not survive a restart"
                );
                generate_secret()
            }
        };

        Ok(TokenCodec::new(secret.as_bytes(), access_ttl, refresh_ttl))
    }
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    anyhow::ensure!(
        BCRYPT_COST_RANGE.contains(&config.bcrypt_cost),
        "bcrypt cost must be within {}..={}, got {}",
        BCRYPT_COST_RANGE.start(),
        BCRYPT_COST_RANGE.end(),
        config.bcrypt_cost
    );
    let tokens = config.token_codec()?;

    let database = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    tokio::fs::create_dir_all(&config.media_root)
        .await
        .with_context(|| format!("failed to create media root {}", config.media_root.display()))?;

    let state = AppState::from_database(
        &database,
        AppStateConfig {
            tokens,
            media_root: config.media_root.clone(),
            bcrypt_cost: config.bcrypt_cost,
        },
    );

    // First tick fires immediately, so this also cleans up on startup.
    tokio::spawn(revoked_token_purge_task(
        Arc::clone(&state.revoked_token_repo),
        PURGE_INTERVAL,
    ));

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_address))?;

    let app = app_router(state);

    info!(
        address = %config.bind_address,
        database = %config.database_url,
        media_root = %config.media_root.display(),
        "starting HTTP server"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server terminated unexpectedly")?;

    info!("server shutdown complete");

    Ok(())
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if signal handlers fail
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
