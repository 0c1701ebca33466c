//! Repository Metadata
//!
//! The input record the audit pipeline consumes. Produced by the GitHub
//! fetch collaborator; the prompt builder and normalizer only ever read it.

use serde::{Deserialize, Serialize};

/// Metadata describing the repository under audit.
///
/// Sizes are capped at fetch time (see `constants`): the file tree at
/// `MAX_TREE_PATHS` entries, the README at `MAX_README_CHARS`. Missing
/// README or manifest degrade to empty strings rather than failing the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub name: String,
    pub owner: String,
    pub description: String,
    /// Primary language as reported by the hosting API ("Rust", "TypeScript", ...)
    pub language: String,
    /// File paths from the default branch's recursive tree, truncated.
    pub tree: Vec<String>,
    /// README content, truncated.
    pub readme: String,
    /// Raw manifest text (package.json, Cargo.toml, ...), truncated.
    pub manifest_text: String,
}

impl RepoMetadata {
    /// `owner/name` slug used in logs and prompts.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}
