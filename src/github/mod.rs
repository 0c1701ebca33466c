//! GitHub Metadata Fetch
//!
//! Repository-hosting collaborator: turns a public repository URL into the
//! `RepoMetadata` record the audit pipeline consumes.

mod client;

pub use client::{GithubClient, GithubConfig, RepoUrl};
