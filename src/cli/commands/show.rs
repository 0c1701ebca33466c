//! Show Command
//!
//! Render one stored audit by id (a unique prefix is enough).

use console::style;

use crate::cli::ui::{Output, report};
use crate::config::ConfigLoader;
use crate::storage::AnalysisStatus;
use crate::types::{Result, VetError};

pub fn run(id: &str, json: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let db = super::open_database(&config)?;

    let full_id = db
        .resolve_id(id)?
        .ok_or_else(|| VetError::NotFound(format!("Analysis not found: {}", id)))?;
    let record = db
        .get(&full_id)?
        .ok_or_else(|| VetError::NotFound(format!("Analysis not found: {}", id)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let out = Output::new();
    out.header(&format!("Audit {}", record.id));
    out.field("Repository", &record.repo_url);
    out.field("Status", record.status.as_str());
    out.field("Created", &record.created_at.to_rfc3339());

    match record.status {
        AnalysisStatus::Completed => {
            if let Some(summary) = &record.summary {
                println!("\n{}", style(summary).italic());
            }
            if let Some(result) = &record.result {
                report::render(&out, result);
            }
        }
        AnalysisStatus::Failed => {
            if let Some(message) = &record.error_message {
                out.error(message);
            }
        }
        AnalysisStatus::Pending | AnalysisStatus::Running => {
            out.warning("This audit never finished.");
        }
    }

    Ok(())
}
