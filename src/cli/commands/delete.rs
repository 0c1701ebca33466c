//! Delete Command

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{Result, VetError};

pub fn run(id: &str) -> Result<()> {
    let config = ConfigLoader::load()?;
    let db = super::open_database(&config)?;
    let out = Output::new();

    let full_id = db
        .resolve_id(id)?
        .ok_or_else(|| VetError::NotFound(format!("Analysis not found: {}", id)))?;

    if db.delete(&full_id)? {
        out.success(&format!("Deleted audit {}", full_id));
    } else {
        out.warning(&format!("Nothing to delete for {}", full_id));
    }
    Ok(())
}
