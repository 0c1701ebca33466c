//! Audit History Records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::AnalysisResult;

/// Lifecycle state of one audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnalysisStatus {
    type Err = std::io::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Unknown analysis status: {}", other),
            )),
        }
    }
}

/// One stored audit: its lifecycle state plus, once finished, either the
/// normalized report or the failure message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub repo_url: String,
    pub status: AnalysisStatus,
    pub summary: Option<String>,
    pub result: Option<AnalysisResult>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Fresh pending record with a new id.
    pub fn pending(repo_url: &str) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            repo_url: repo_url.to_string(),
            status: AnalysisStatus::Pending,
            summary: None,
            result: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            AnalysisStatus::Pending,
            AnalysisStatus::Running,
            AnalysisStatus::Completed,
            AnalysisStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<AnalysisStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<AnalysisStatus>().is_err());
    }

    #[test]
    fn test_pending_record_has_unique_ids() {
        let a = AnalysisRecord::pending("https://github.com/acme/demo");
        let b = AnalysisRecord::pending("https://github.com/acme/demo");
        assert_ne!(a.id, b.id);
        assert_eq!(a.status, AnalysisStatus::Pending);
    }
}
