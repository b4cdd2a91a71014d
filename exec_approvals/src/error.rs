//! Error types for the exec approvals library.

use thiserror::Error;

/// Errors that can occur when compiling patterns or parsing allowlists.
#[derive(Error, Debug)]
pub enum ApprovalsError {
    /// A glob pattern did not translate to a valid matcher.
    #[error("invalid allow pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An allowlist document was not a valid JSON array of entries.
    #[error("malformed allowlist JSON: {0}")]
    MalformedAllowlist(#[from] serde_json::Error),
}

/// Result type alias for approval operations.
pub type Result<T> = std::result::Result<T, ApprovalsError>;
