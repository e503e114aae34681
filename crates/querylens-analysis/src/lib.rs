//! # querylens-analysis: divergent SELECT parameter detection
//!
//! Inspects the statements a test run executed and reports whether the same
//! SELECT text ran more than once with different bound parameters, a sign
//! of lookups that should have been batched or cached.
//!
//! ## Pipeline
//!
//! ```text
//! ExecutionLog ──▶ classify ──▶ extract_parameters ──▶ ExecutionHistory ──▶ bool
//!                 (SELECT?)     (one batch only)       (lookup / record)
//! ```
//!
//! The pass is single-threaded, follows capture order and stops at the
//! first divergent execution.
//!
//! ## Usage
//!
//! ```
//! use querylens_analysis::detect;
//! use querylens_types::{ExecutionLog, StatementExecution};
//!
//! let sql = "SELECT * FROM users WHERE id = ?";
//! let log = ExecutionLog::from_statements([
//!     StatementExecution::new(sql).with_batch([1_i64, 2]),
//!     StatementExecution::new(sql).with_batch([1_i64, 2]),
//! ]);
//!
//! // Same text, same parameters: not a divergence.
//! assert!(!detect(&log)?);
//! # Ok::<(), querylens_analysis::AnalysisError>(())
//! ```

mod detector;
mod error;
mod extract;
mod history;


pub use detector::{Divergence, DivergentParamsDetector, SequenceDisplay, detect};
pub use error::{AnalysisError, Result};
pub use extract::{BoundParameterSequence, extract_parameters};
pub use history::{ExecutionHistory, HistoryPolicy};
