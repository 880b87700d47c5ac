//! Init-db command handler.

use std::path::Path;

use anyhow::Result;
use chatkeep_db::setup_database;

/// Create the database file and schema at `path`.
pub async fn execute(path: &Path) -> Result<()> {
    let pool = setup_database(path).await?;
    pool.close().await;
    tracing::info!(path = %path.display(), "Database initialized");
    Ok(())
}
