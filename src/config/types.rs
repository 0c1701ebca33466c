//! Configuration Types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::ProviderConfig;
use crate::github::GithubConfig;
use crate::types::{Result, VetError};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Config format version
    pub version: String,
    /// LLM provider settings
    pub llm: ProviderConfig,
    /// GitHub API settings
    pub github: GithubConfig,
    /// Audit history storage settings
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: ProviderConfig::default(),
            github: GithubConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(VetError::Config(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.llm.timeout_secs == 0 {
            return Err(VetError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.llm.max_tokens == 0 {
            return Err(VetError::Config(
                "llm.max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.github.timeout_secs == 0 {
            return Err(VetError::Config(
                "github.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Audit history storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path; empty means the platform data directory
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: String::new(),
        }
    }
}

impl StorageConfig {
    /// Resolve the database path, falling back to the platform data dir
    /// (e.g. ~/.local/share/repovet/audits.db on Linux).
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        if !self.db_path.is_empty() {
            return Ok(PathBuf::from(&self.db_path));
        }

        directories::ProjectDirs::from("", "", "repovet")
            .map(|dirs| dirs.data_dir().join("audits.db"))
            .ok_or_else(|| {
                VetError::Config("Cannot determine platform data directory".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_temperature_out_of_range_rejected() {
        let mut config = Config::default();
        config.llm.temperature = 3.5;
        assert!(matches!(config.validate(), Err(VetError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_db_path_wins() {
        let storage = StorageConfig {
            db_path: "/tmp/custom.db".to_string(),
        };
        assert_eq!(
            storage.resolve_db_path().unwrap(),
            PathBuf::from("/tmp/custom.db")
        );
    }
}
