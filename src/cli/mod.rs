use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};
use crate::services::SeedService;

#[derive(Parser)]
#[command(name = "study-tracker")]
#[command(about = "Study tracker API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API (default)")]
    Serve {
        #[arg(long, help = "Listen port (overrides PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Keep all data in process memory instead of Postgres")]
        in_memory: bool,
    },

    #[command(about = "Seed the default catalog and admin account, then exit")]
    Seed,
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    check_security(&config)?;

    match cli.command.unwrap_or(Commands::Serve { port: None, in_memory: false }) {
        Commands::Serve { port, in_memory } => serve(config, port, in_memory).await,
        Commands::Seed => {
            let store = connect(&config).await?;
            SeedService::new(store, &config.seed, config.security.bcrypt_cost)
                .run()
                .await?;
            Ok(())
        }
    }
}

async fn serve(mut config: AppConfig, port: Option<u16>, in_memory: bool) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let store: Arc<dyn Store> = if in_memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        connect(&config).await?
    };

    if config.seed.enabled {
        SeedService::new(store.clone(), &config.seed, config.security.bcrypt_cost)
            .run()
            .await
            .context("seeding failed")?;
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Study tracker listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::new(store, config))).await?;
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    Ok(Arc::new(PgStore::new(pool)))
}

/// Warn about insecure defaults; refuse to run production with the built-in JWT secret.
fn check_security(config: &AppConfig) -> anyhow::Result<()> {
    for warning in config.insecure_defaults() {
        tracing::warn!("Insecure configuration: {}", warning);
    }
    if config.is_production() && config.security.jwt_secret == crate::config::INSECURE_JWT_SECRET {
        bail!("JWT_SECRET must be set in production");
    }
    Ok(())
}
