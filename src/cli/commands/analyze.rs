//! Analyze Command
//!
//! Run one audit against a public GitHub repository and render the report.

use console::style;

use crate::ai::create_provider;
use crate::analysis::AnalysisRunner;
use crate::cli::ui::{Output, report};
use crate::config::ConfigLoader;
use crate::github::GithubClient;
use crate::types::Result;

pub struct AnalyzeOptions {
    pub repo_url: String,
    /// Model override for this run
    pub model: Option<String>,
    /// Emit the raw report as JSON instead of the rendered view
    pub json: bool,
}

pub async fn run(options: AnalyzeOptions) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(model) = options.model {
        config.llm.model = model;
    }

    let out = Output::new();
    let provider = create_provider(&config.llm)?;
    let github = GithubClient::new(&config.github)?;
    let db = super::open_database(&config)?;

    out.info(&format!("Auditing {}", options.repo_url));
    let runner = AnalysisRunner::new(provider, github, db);
    let outcome = runner.run(&options.repo_url).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome.result)?);
        return Ok(());
    }

    let repo = &outcome.repo;
    out.header(&format!("Audit: {}", repo.slug()));
    println!("{}", style(&outcome.summary).italic());

    report::render(&out, &outcome.result);

    println!();
    out.success(&format!(
        "Saved as {} ({} tokens, {:.1}s, {})",
        outcome.id,
        outcome.usage.total(),
        outcome.elapsed.as_secs_f64(),
        outcome.model
    ));
    Ok(())
}
