use clap::Parser;
use tracing_subscriber::EnvFilter;

use study_tracker::cli::{self, Cli};
use study_tracker::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET etc. can live there
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("study_tracker=info,tower_http=info")),
        )
        .init();

    let config = config::config().clone();
    tracing::info!("Starting study tracker in {:?} mode", config.environment);

    cli::run(Cli::parse(), config).await
}
