//! Error types for execution log analysis.

use thiserror::Error;

/// Errors that abort an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A statement carried several parameter batches. How their values
    /// should be compared is undefined, so the run stops instead of guessing.
    #[error(
        "statement executed with {batches} parameter batches, only a single batch is supported: {statement}"
    )]
    UnsupportedBatchConfiguration {
        /// SQL text of the offending statement.
        statement: String,
        /// Number of parameter batches it carried.
        batches: usize,
    },
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
