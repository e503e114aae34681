//! # querylens-classify: SQL verb classification
//!
//! The duplicate detector only looks at SELECT statements, so it needs to
//! know the verb of every captured statement. This crate provides the
//! [`StatementClassifier`] seam and two implementations:
//!
//! - [`KeywordClassifier`]: reads the first keyword of the SQL text. Cheap
//!   and dialect-agnostic.
//! - [`ParserClassifier`]: parses the text with `sqlparser` so that CTEs
//!   wrapping DML are labelled correctly, falling back to the keyword scan
//!   for text the generic dialect cannot parse.
//!
//! ```
//! use querylens_classify::{KeywordClassifier, StatementClassifier};
//! use querylens_types::{StatementExecution, StatementKind};
//!
//! let stmt = StatementExecution::new("/* hint */ select * from users");
//! assert_eq!(KeywordClassifier.classify(&stmt), StatementKind::Select);
//! ```

use querylens_types::{StatementExecution, StatementKind};
use serde::{Deserialize, Serialize};

mod keyword;
mod parser;

pub use keyword::KeywordClassifier;
pub use parser::ParserClassifier;

/// Labels a captured statement with its SQL verb.
///
/// Implementations must be total: unrecognized text is [`StatementKind::Other`].
pub trait StatementClassifier {
    fn classify(&self, execution: &StatementExecution) -> StatementKind;
}

impl<C: StatementClassifier + ?Sized> StatementClassifier for &C {
    fn classify(&self, execution: &StatementExecution) -> StatementKind {
        (**self).classify(execution)
    }
}

impl<C: StatementClassifier + ?Sized> StatementClassifier for Box<C> {
    fn classify(&self, execution: &StatementExecution) -> StatementKind {
        (**self).classify(execution)
    }
}

/// Selects a classifier implementation from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierKind {
    Keyword,
    #[default]
    Parser,
}

impl ClassifierKind {
    /// Builds the classifier this kind names.
    pub fn build(self) -> Box<dyn StatementClassifier + Send + Sync> {
        match self {
            ClassifierKind::Keyword => Box::new(KeywordClassifier),
            ClassifierKind::Parser => Box::new(ParserClassifier::new()),
        }
    }
}

impl std::str::FromStr for ClassifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keyword" => Ok(ClassifierKind::Keyword),
            "parser" => Ok(ClassifierKind::Parser),
            other => Err(format!(
                "unknown classifier '{other}' (expected 'keyword' or 'parser')"
            )),
        }
    }
}

impl std::fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifierKind::Keyword => f.write_str("keyword"),
            ClassifierKind::Parser => f.write_str("parser"),
        }
    }
}
