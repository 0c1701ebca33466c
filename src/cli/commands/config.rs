//! Config Command
//!
//! Inspect and initialize configuration.

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

pub fn show(as_json: bool) -> Result<()> {
    ConfigLoader::show_config(as_json)
}

pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let out = Output::new();
    let path = ConfigLoader::init_global(force)?;
    out.success(&format!("Config ready at {}", path.display()));
    Ok(())
}
