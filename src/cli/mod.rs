use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use crate::app::{router, AppState};
use crate::auth::{issue_token, Claims};
use crate::config::{AppConfig, StorageBackend};
use crate::database::{DatabaseManager, MemoryCatalog, PgCatalog};

#[derive(Parser)]
#[command(name = "store-admin-api")]
#[command(about = "Store admin API - multi-store catalog backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on; overrides STORE_ADMIN_PORT")]
        port: Option<u16>,
    },

    #[command(about = "Mint a bearer token for local development")]
    Token {
        #[arg(long, help = "Identity to place in the token subject")]
        user: String,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Token { user } => {
            let claims = Claims::new(
                user,
                config.security.jwt_issuer.clone(),
                config.security.jwt_expiry_hours,
            );
            let token = issue_token(&claims, &config.security.jwt_secret)?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.api.port);

    let state = match config.database.backend {
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            DatabaseManager::health_check(&pool)
                .await
                .context("database health check failed")?;
            AppState::new(config, Arc::new(PgCatalog::new(pool)))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on exit");
            AppState::new(config, Arc::new(MemoryCatalog::new()))
        }
    };

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Store admin API listening on http://{}", bind_addr);
    axum::serve(listener, router(state)).await.context("server error")?;
    Ok(())
}
