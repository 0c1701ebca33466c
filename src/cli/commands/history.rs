//! History Command
//!
//! List stored audits, newest first.

use console::style;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::storage::AnalysisStatus;
use crate::types::Result;

pub fn run(limit: usize, json: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let db = super::open_database(&config)?;
    let records = db.list(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let out = Output::new();
    if records.is_empty() {
        out.info("No audits yet. Run: repovet analyze <github-url>");
        return Ok(());
    }

    out.header("Audit History");
    for record in &records {
        let status = match record.status {
            AnalysisStatus::Completed => style("completed").green(),
            AnalysisStatus::Failed => style("failed").red(),
            AnalysisStatus::Running => style("running").yellow(),
            AnalysisStatus::Pending => style("pending").dim(),
        };
        println!(
            "  {}  {}  {}  {}",
            style(&record.id[..8]).cyan(),
            record.created_at.format("%Y-%m-%d %H:%M"),
            status,
            record.repo_url
        );
        if let Some(summary) = &record.summary {
            println!("            {}", style(summary).dim());
        }
    }
    println!();
    out.info(&format!(
        "{} audit(s). Use 'repovet show <id>' for a full report.",
        records.len()
    ));
    Ok(())
}
