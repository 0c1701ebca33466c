//! Unified Error Type System
//!
//! Single error enum (`VetError`) for the entire application.
//!
//! The normalization layer has exactly one hard failure mode:
//! `MalformedResponse`, raised when the completion text is not valid JSON.
//! Every other irregularity in a model response is absorbed field-by-field
//! into documented fallback values and never surfaces as an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VetError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Normalization
    // -------------------------------------------------------------------------
    /// The completion text could not be parsed as JSON at all.
    /// Not recoverable locally; the caller records the analysis as failed.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    // -------------------------------------------------------------------------
    // Upstream Collaborators
    // -------------------------------------------------------------------------
    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    // -------------------------------------------------------------------------
    // Application Shell
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, VetError>;

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| VetError::Storage(format!("{}: {}", context.into(), e)))
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| VetError::Storage(format!("{}: {}", f().into(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_response_display() {
        let err = VetError::MalformedResponse("expected value at line 1".to_string());
        assert!(err.to_string().contains("Malformed model response"));
    }

    #[test]
    fn test_with_context() {
        let inner: std::result::Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = inner.with_context("opening database").unwrap_err();
        assert!(err.to_string().contains("opening database"));
        assert!(err.to_string().contains("boom"));
    }
}
