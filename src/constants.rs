//! Global Constants
//!
//! Centralized constants for fetch caps and normalization tuning.

/// GitHub fetch limits
pub mod github {
    /// Maximum file paths forwarded from the recursive tree listing.
    /// Keeps the prompt within a predictable context budget.
    pub const MAX_TREE_PATHS: usize = 300;

    /// Maximum README characters forwarded to the prompt.
    pub const MAX_README_CHARS: usize = 8_000;

    /// Maximum manifest characters forwarded to the prompt.
    pub const MAX_MANIFEST_CHARS: usize = 4_000;

    /// Manifest files probed in order; first hit wins.
    pub const MANIFEST_CANDIDATES: &[&str] =
        &["package.json", "Cargo.toml", "pyproject.toml", "go.mod"];
}

/// Normalization tuning
pub mod normalize {
    /// Score substituted when the input is not numeric at all.
    pub const SCORE_FALLBACK: u8 = 5;

    /// Inclusive score bounds.
    pub const SCORE_MIN: u8 = 1;
    pub const SCORE_MAX: u8 = 10;

    /// Text substituted for absent or unusable string fields.
    pub const NOT_SPECIFIED: &str = "Not specified";

    /// Separator used when a string field arrives as an array.
    pub const LIST_JOIN: &str = ". ";

    /// Record summary truncation length.
    pub const SUMMARY_MAX_CHARS: usize = 150;
}
