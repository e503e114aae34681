//! Per-run record of the parameter sequences seen for each statement text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::extract::BoundParameterSequence;

/// How repeated identical sequences are stored.
///
/// The detection verdict is the same under both policies; only memory use
/// and the `previous` list of a reported divergence differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryPolicy {
    /// Append every observed sequence, duplicates included.
    #[default]
    RetainAll,
    /// Store each distinct sequence once per statement text.
    Deduplicate,
}

impl std::fmt::Display for HistoryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryPolicy::RetainAll => f.write_str("retain-all"),
            HistoryPolicy::Deduplicate => f.write_str("deduplicate"),
        }
    }
}

/// Maps statement text to the parameter sequences it was executed with.
///
/// Built empty at the start of an analysis run and dropped at its end.
/// Entries only grow; there is no removal.
#[derive(Debug, Default)]
pub struct ExecutionHistory {
    policy: HistoryPolicy,
    entries: HashMap<String, Vec<BoundParameterSequence>>,
}

impl ExecutionHistory {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
        }
    }

    /// Returns the sequences previously recorded for `statement_text`, in
    /// record order, or `None` if the text has never been recorded.
    pub fn lookup(&self, statement_text: &str) -> Option<&[BoundParameterSequence]> {
        self.entries.get(statement_text).map(Vec::as_slice)
    }

    /// Returns true if `sequence` was recorded for `statement_text`.
    pub fn contains(&self, statement_text: &str, sequence: &[querylens_types::Value]) -> bool {
        self.lookup(statement_text)
            .is_some_and(|seen| seen.iter().any(|s| s.as_slice() == sequence))
    }

    /// Appends `sequence` to the list for `statement_text`, creating it if absent.
    pub fn record(&mut self, statement_text: &str, sequence: BoundParameterSequence) {
        if let Some(seen) = self.entries.get_mut(statement_text) {
            if self.policy == HistoryPolicy::Deduplicate && seen.contains(&sequence) {
                return;
            }
            seen.push(sequence);
        } else {
            self.entries.insert(statement_text.to_owned(), vec![sequence]);
        }
    }

    /// Number of distinct statement texts recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
