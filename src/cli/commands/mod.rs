pub mod analyze;
pub mod config;
pub mod delete;
pub mod history;
pub mod show;

use std::sync::Arc;

use crate::config::Config;
use crate::storage::{Database, SharedDatabase};
use crate::types::Result;

/// Open the audit history database at the configured path.
pub(crate) fn open_database(config: &Config) -> Result<SharedDatabase> {
    let path = config.storage.resolve_db_path()?;
    let db = Database::open(&path)?;
    db.initialize()?;
    Ok(Arc::new(db))
}
