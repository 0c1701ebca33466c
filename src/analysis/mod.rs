//! Audit Pipeline
//!
//! Drives one audit end to end: parse the repository URL, record a
//! pending run, fetch metadata from GitHub, ask the model for a report,
//! normalize the response, and persist the outcome. Every failure path
//! marks the stored record as failed before the error propagates.

use std::time::Duration;

use tracing::{info, warn};

use crate::ai::{build_audit_prompt, normalize_response, system_instruction};
use crate::ai::{SharedProvider, TokenUsage};
use crate::github::{GithubClient, RepoUrl};
use crate::storage::SharedDatabase;
use crate::types::{AnalysisResult, RepoMetadata, Result};

/// Completed audit with its provenance.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    /// Stored record id
    pub id: String,
    /// Repository metadata the report was built from
    pub repo: RepoMetadata,
    /// Normalized report
    pub result: AnalysisResult,
    /// One-line summary persisted with the record
    pub summary: String,
    /// Token usage for the completion
    pub usage: TokenUsage,
    /// Wall-clock time for the completion request
    pub elapsed: Duration,
    /// Model that produced the report
    pub model: String,
}

/// Orchestrates the fetch, completion, and normalization steps.
pub struct AnalysisRunner {
    provider: SharedProvider,
    github: GithubClient,
    db: SharedDatabase,
}

impl AnalysisRunner {
    pub fn new(provider: SharedProvider, github: GithubClient, db: SharedDatabase) -> Self {
        Self {
            provider,
            github,
            db,
        }
    }

    /// Run one audit for a public GitHub repository URL.
    pub async fn run(&self, repo_url: &str) -> Result<AuditOutcome> {
        let repo = RepoUrl::parse(repo_url)?;
        let record = self.db.insert_pending(repo_url)?;
        self.db.set_running(&record.id)?;

        match self.execute(&record.id, &repo).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                if let Err(store_err) = self.db.fail(&record.id, &e.to_string()) {
                    warn!("Failed to record audit failure: {}", store_err);
                }
                Err(e)
            }
        }
    }

    async fn execute(&self, id: &str, repo: &RepoUrl) -> Result<AuditOutcome> {
        info!(repo = %repo, "Fetching repository metadata");
        let metadata = self.github.fetch(repo).await?;
        self.audit(id, metadata).await
    }

    async fn audit(&self, id: &str, metadata: RepoMetadata) -> Result<AuditOutcome> {
        let prompt = build_audit_prompt(&metadata);
        let system = system_instruction();

        info!(
            model = self.provider.model(),
            paths = metadata.tree.len(),
            "Requesting audit"
        );
        let completion = self.provider.complete(&system, &prompt).await?;

        let result = normalize_response(&completion.text)?;
        let summary = result.summary();

        self.db.complete(id, &summary, &result)?;
        info!(id = %id, elapsed_ms = completion.elapsed.as_millis() as u64, "Audit completed");

        Ok(AuditOutcome {
            id: id.to_string(),
            repo: metadata,
            result,
            summary,
            usage: completion.usage,
            elapsed: completion.elapsed,
            model: completion.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Completion, LlmProvider};
    use crate::github::GithubConfig;
    use crate::storage::{AnalysisStatus, Database};
    use crate::types::VetError;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct CannedProvider {
        text: String,
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<Completion> {
            Ok(Completion {
                text: self.text.clone(),
                usage: TokenUsage::default(),
                elapsed: Duration::from_millis(1),
                model: "canned".to_string(),
                provider: "test".to_string(),
            })
        }

        fn name(&self) -> &str {
            "test"
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    fn runner_with(text: &str) -> (AnalysisRunner, SharedDatabase) {
        let db: SharedDatabase = Arc::new(Database::open_in_memory().unwrap());
        db.initialize().unwrap();
        let runner = AnalysisRunner::new(
            Arc::new(CannedProvider {
                text: text.to_string(),
            }),
            GithubClient::new(&GithubConfig::default()).unwrap(),
            Arc::clone(&db),
        );
        (runner, db)
    }

    fn sample_metadata() -> RepoMetadata {
        RepoMetadata {
            name: "demo".to_string(),
            owner: "acme".to_string(),
            description: "A demo repository".to_string(),
            language: "Rust".to_string(),
            tree: vec!["src/main.rs".to_string(), "Cargo.toml".to_string()],
            readme: "# demo".to_string(),
            manifest_text: String::new(),
        }
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_any_record() {
        let (runner, db) = runner_with("{}");
        let err = runner
            .run("https://example.com/not/github")
            .await
            .unwrap_err();
        assert!(matches!(err, VetError::InvalidRepoUrl(_)));
        assert!(db.list(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_audit_completes_the_stored_record() {
        let (runner, db) = runner_with("{}");
        let record = db.insert_pending("https://github.com/acme/demo").unwrap();
        db.set_running(&record.id).unwrap();

        let outcome = runner.audit(&record.id, sample_metadata()).await.unwrap();
        assert_eq!(outcome.model, "canned");
        // An empty model response degrades every field, summary included.
        assert_eq!(outcome.summary, "Not specified");

        let stored = db.get(&record.id).unwrap().unwrap();
        assert_eq!(stored.status, AnalysisStatus::Completed);
        assert_eq!(stored.result.as_ref(), Some(&outcome.result));
    }

    #[tokio::test]
    async fn test_malformed_response_leaves_record_unfinished() {
        let (runner, db) = runner_with("the model rambled instead of emitting JSON");
        let record = db.insert_pending("https://github.com/acme/demo").unwrap();
        db.set_running(&record.id).unwrap();

        let err = runner
            .audit(&record.id, sample_metadata())
            .await
            .unwrap_err();
        assert!(matches!(err, VetError::MalformedResponse(_)));

        // run() owns the failure bookkeeping; audit() must not touch it.
        let stored = db.get(&record.id).unwrap().unwrap();
        assert_eq!(stored.status, AnalysisStatus::Running);
    }
}
