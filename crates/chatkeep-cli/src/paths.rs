//! Default file locations.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Use `database` if given, else `<data dir>/chatkeep/chatkeep.db`.
pub fn resolve_database_path(database: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = database {
        return Ok(path);
    }
    let data_dir = dirs::data_local_dir().context("no data directory for the current user")?;
    Ok(data_dir.join("chatkeep").join("chatkeep.db"))
}
