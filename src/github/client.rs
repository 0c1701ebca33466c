//! GitHub API Client
//!
//! Fetches repository metadata, the recursive file tree of the default
//! branch, the README, and the dependency manifest. Everything forwarded
//! to the prompt is size-capped (see `constants::github`). A missing
//! README or manifest degrades to an empty string; only the repository
//! and tree requests are load-bearing.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::constants::github::{
    MANIFEST_CANDIDATES, MAX_MANIFEST_CHARS, MAX_README_CHARS, MAX_TREE_PATHS,
};
use crate::types::{RepoMetadata, Result, VetError};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("repovet/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Repository URL
// =============================================================================

/// Owner/name pair parsed from a public GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    pub owner: String,
    pub name: String,
}

impl RepoUrl {
    /// Parse `https://github.com/{owner}/{repo}` (an optional `.git`
    /// suffix and trailing path segments are tolerated and ignored).
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim())
            .map_err(|e| VetError::InvalidRepoUrl(format!("{}: {}", input, e)))?;

        let host = url.host_str().unwrap_or_default();
        if host != "github.com" && host != "www.github.com" {
            return Err(VetError::InvalidRepoUrl(format!(
                "expected a github.com URL, got host '{}'",
                host
            )));
        }

        let mut segments = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()))
            .ok_or_else(|| VetError::InvalidRepoUrl(input.to_string()))?;

        let owner = segments
            .next()
            .ok_or_else(|| VetError::InvalidRepoUrl(format!("{}: missing owner", input)))?;
        let name = segments
            .next()
            .ok_or_else(|| VetError::InvalidRepoUrl(format!("{}: missing repository", input)))?;

        Ok(Self {
            owner: owner.to_string(),
            name: name.trim_end_matches(".git").to_string(),
        })
    }
}

impl std::fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// GitHub API settings. The token is optional (public repositories work
/// unauthenticated, at a lower rate limit) and never serialized.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
        }
    }
}

// =============================================================================
// Client
// =============================================================================

pub struct GithubClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<SecretString>,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .map(SecretString::from);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VetError::GitHub(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Fetch everything the audit needs about one repository.
    pub async fn fetch(&self, repo: &RepoUrl) -> Result<RepoMetadata> {
        let info = self
            .get_json(&format!("/repos/{}/{}", repo.owner, repo.name))
            .await?;

        let default_branch = info
            .get("default_branch")
            .and_then(Value::as_str)
            .unwrap_or("main")
            .to_string();

        let tree = self.fetch_tree(repo, &default_branch).await?;
        let readme = self.fetch_readme(repo).await;
        let manifest_text = self.fetch_manifest(repo).await;

        Ok(RepoMetadata {
            name: json_str(&info, "name").unwrap_or_else(|| repo.name.clone()),
            owner: info
                .get("owner")
                .and_then(|o| o.get("login"))
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| repo.owner.clone()),
            description: json_str(&info, "description").unwrap_or_default(),
            language: json_str(&info, "language").unwrap_or_default(),
            tree,
            readme,
            manifest_text,
        })
    }

    async fn fetch_tree(&self, repo: &RepoUrl, branch: &str) -> Result<Vec<String>> {
        let body = self
            .get_json(&format!(
                "/repos/{}/{}/git/trees/{}?recursive=1",
                repo.owner, repo.name, branch
            ))
            .await?;

        let paths: Vec<String> = body
            .get("tree")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| e.get("path").and_then(Value::as_str))
                    .take(MAX_TREE_PATHS)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        debug!(count = paths.len(), "Fetched file tree");
        Ok(paths)
    }

    async fn fetch_readme(&self, repo: &RepoUrl) -> String {
        match self
            .get_raw(&format!("/repos/{}/{}/readme", repo.owner, repo.name))
            .await
        {
            Ok(Some(text)) => truncate_chars(&text, MAX_README_CHARS),
            Ok(None) => String::new(),
            Err(e) => {
                warn!("README fetch failed, continuing without it: {}", e);
                String::new()
            }
        }
    }

    async fn fetch_manifest(&self, repo: &RepoUrl) -> String {
        for candidate in MANIFEST_CANDIDATES {
            match self
                .get_raw(&format!(
                    "/repos/{}/{}/contents/{}",
                    repo.owner, repo.name, candidate
                ))
                .await
            {
                Ok(Some(text)) => return truncate_chars(&text, MAX_MANIFEST_CHARS),
                Ok(None) => continue,
                Err(e) => {
                    warn!("Manifest fetch failed for {}: {}", candidate, e);
                    continue;
                }
            }
        }
        String::new()
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let response = self
            .request(path, "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|e| VetError::GitHub(format!("Request failed for {}: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(VetError::GitHub(format!("{} returned {}", path, status)));
        }

        response
            .json()
            .await
            .map_err(|e| VetError::GitHub(format!("Invalid JSON from {}: {}", path, e)))
    }

    /// Fetch file content via the raw media type, avoiding base64 bodies.
    /// Returns `None` on 404.
    async fn get_raw(&self, path: &str) -> Result<Option<String>> {
        let response = self
            .request(path, "application/vnd.github.raw+json")
            .send()
            .await
            .map_err(|e| VetError::GitHub(format!("Request failed for {}: {}", path, e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(VetError::GitHub(format!("{} returned {}", path, status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| VetError::GitHub(format!("Failed to read body from {}: {}", path, e)))?;
        Ok(Some(text))
    }

    fn request(&self, path: &str, accept: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .get(format!("{}{}", self.api_base, path))
            .header("Accept", accept);
        if let Some(token) = &self.token {
            builder = builder.header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            );
        }
        builder
    }
}

fn json_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_url() {
        let repo = RepoUrl::parse("https://github.com/acme/demo").unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "demo");
    }

    #[test]
    fn test_parse_tolerates_git_suffix_and_extra_segments() {
        let repo = RepoUrl::parse("https://github.com/acme/demo.git").unwrap();
        assert_eq!(repo.name, "demo");

        let repo = RepoUrl::parse("https://github.com/acme/demo/tree/main/src").unwrap();
        assert_eq!(repo.to_string(), "acme/demo");
    }

    #[test]
    fn test_parse_rejects_other_hosts() {
        assert!(RepoUrl::parse("https://gitlab.com/acme/demo").is_err());
    }

    #[test]
    fn test_parse_rejects_incomplete_paths() {
        assert!(RepoUrl::parse("https://github.com/acme").is_err());
        assert!(RepoUrl::parse("https://github.com/").is_err());
        assert!(RepoUrl::parse("not a url").is_err());
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }

    #[test]
    fn test_github_config_debug_redacts_token() {
        let config = GithubConfig {
            token: Some("ghp_secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("ghp_secret"));
    }
}
