//! repovet - LLM-Backed Repository Audit
//!
//! Audits a public GitHub repository before you adopt it: fetches the
//! repository's metadata, file tree, README, and manifest, asks a language
//! model for a structured engineering assessment, and normalizes whatever
//! comes back into a strictly-typed report.
//!
//! ## Core Guarantee
//!
//! Model output is treated as untrusted text. The normalizer coerces every
//! field into its declared shape: enums always land on a member of their
//! value set, scores always land in [1, 10], strings are always scalar,
//! and lists are always present. Only unparseable JSON fails an audit.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use repovet::{AnalysisRunner, Database, GithubClient, GithubConfig};
//! use repovet::ai::{ProviderConfig, create_provider};
//!
//! let provider = create_provider(&ProviderConfig::default())?;
//! let github = GithubClient::new(&GithubConfig::default())?;
//! let db = Arc::new(Database::open("audits.db")?);
//! db.initialize()?;
//!
//! let runner = AnalysisRunner::new(provider, github, db);
//! let outcome = runner.run("https://github.com/acme/demo").await?;
//! println!("{}", outcome.summary);
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: prompt construction, LLM providers, response normalization
//! - [`github`]: repository metadata fetch
//! - [`analysis`]: the audit pipeline
//! - [`storage`]: SQLite audit history with connection pooling
//! - [`config`]: layered configuration

pub mod ai;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod constants;
pub mod github;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, StorageConfig};

// Error Types
pub use types::error::{Result, ResultExt, VetError};

// Pipeline
pub use analysis::{AnalysisRunner, AuditOutcome};

// GitHub
pub use github::{GithubClient, GithubConfig, RepoUrl};

// Storage
pub use storage::database::PoolConfig;
pub use storage::{AnalysisRecord, AnalysisStatus, Database, SharedDatabase};

// Report Schema
pub use types::{AnalysisResult, RepoMetadata};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    Completion,
    LlmProvider,
    OpenAiProvider,
    ProviderConfig,
    SharedProvider,
    TokenUsage,
    build_audit_prompt,
    create_provider,
    normalize_response,
    system_instruction,
};
