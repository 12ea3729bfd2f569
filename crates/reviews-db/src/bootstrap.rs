//! Data bootstrap: run a SQL script against the review store.
//!
//! The bundled script creates the four review tables and their indexes and
//! is idempotent. Operators can point the loader at their own script (for
//! example one that `COPY`s a CSV export) instead.

use std::path::Path;
use std::time::Instant;

use sqlx::PgPool;
use tracing::info;

use reviews_core::{Error, Result};

/// Schema bundled with the crate.
pub const SCHEMA_SQL: &str = include_str!("../sql/reviews.sql");

/// Execute a multi-statement SQL script in a single round trip.
pub async fn run_script(pool: &PgPool, script: &str) -> Result<()> {
    if script.trim().is_empty() {
        return Err(Error::InvalidInput("SQL script is empty".to_string()));
    }

    let start = Instant::now();
    sqlx::raw_sql(script)
        .execute(pool)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "bootstrap",
        op = "run_script",
        script_len = script.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "SQL script executed"
    );
    Ok(())
}

/// Read a script from disk and execute it.
pub async fn run_script_file(pool: &PgPool, path: &Path) -> Result<()> {
    let script = tokio::fs::read_to_string(path).await?;
    info!(
        subsystem = "database",
        component = "bootstrap",
        path = %path.display(),
        "Loaded SQL script"
    );
    run_script(pool, &script).await
}

/// Create the review tables and indexes if they are missing.
pub async fn bootstrap_schema(pool: &PgPool) -> Result<()> {
    run_script(pool, SCHEMA_SQL).await
}
