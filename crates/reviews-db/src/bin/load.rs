//! reviews-load: run the review schema (or any SQL script) against the store.
//!
//! Connection settings come from the same environment variables as the API
//! server (`DATABASE_URL` or `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_NAME`),
//! with `.env` support.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use reviews_db::{run_script_file, Database, DbConfig};

#[derive(Parser)]
#[command(name = "reviews-load")]
#[command(author, version, about = "Load the review schema or a SQL data script")]
struct Cli {
    /// SQL script to execute instead of the bundled schema
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reviews_db=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => {
            info!("Data loaded successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Error loading data");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = DbConfig::from_env()?;
    info!(target_db = %config.display_target(), "Connecting to database");
    let db = Database::connect_with_config(&config).await?;

    match cli.file {
        Some(path) => run_script_file(db.pool(), &path).await?,
        None => db.bootstrap().await?,
    }
    Ok(())
}
