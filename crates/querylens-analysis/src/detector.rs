//! Detection of SELECT statements re-executed with divergent parameters.

use std::fmt::{self, Display};

use querylens_classify::{ParserClassifier, StatementClassifier};
use querylens_types::{ExecutionLog, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::extract::{BoundParameterSequence, extract_parameters};
use crate::history::{ExecutionHistory, HistoryPolicy};

/// The first SELECT found executing with parameters its earlier executions
/// never used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divergence {
    /// SQL text shared by the executions.
    pub statement_text: String,
    /// 0-based capture index of the divergent execution in the log.
    pub index: usize,
    /// Parameters of the divergent execution.
    pub parameters: BoundParameterSequence,
    /// Sequences recorded for the same text before it, in capture order.
    pub previous: Vec<BoundParameterSequence>,
}

impl Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} executed with parameters {} (statement #{}); previously seen: ",
            self.statement_text,
            SequenceDisplay(&self.parameters),
            self.index + 1
        )?;
        for (i, seq) in self.previous.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", SequenceDisplay(seq))?;
        }
        Ok(())
    }
}

/// Renders a parameter sequence as `[a, b, c]`.
#[derive(Debug, Clone, Copy)]
pub struct SequenceDisplay<'a>(pub &'a [Value]);

impl Display for SequenceDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

/// Flags a log in which the same SELECT text ran with parameter values that
/// match none of its earlier executions.
///
/// Such logs usually point at lookups that should have been batched into a
/// single `IN (...)` query or served from a cache.
///
/// The detector is stateless: every call builds its own
/// [`ExecutionHistory`], so one value can be shared freely across threads
/// and test cases.
///
/// # Example
///
/// ```
/// use querylens_analysis::DivergentParamsDetector;
/// use querylens_types::{ExecutionLog, StatementExecution};
///
/// let sql = "SELECT * FROM x WHERE id = ?";
/// let log = ExecutionLog::from_statements([
///     StatementExecution::new(sql).with_batch([1_i32]),
///     StatementExecution::new(sql).with_batch([2_i32]),
/// ]);
///
/// assert!(DivergentParamsDetector::new().detect(&log).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DivergentParamsDetector<C = ParserClassifier> {
    classifier: C,
    policy: HistoryPolicy,
}

impl DivergentParamsDetector {
    /// Creates a detector using [`ParserClassifier`] and retaining all
    /// observed sequences.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: StatementClassifier> DivergentParamsDetector<C> {
    /// Replaces the statement classifier.
    pub fn with_classifier<D: StatementClassifier>(
        self,
        classifier: D,
    ) -> DivergentParamsDetector<D> {
        DivergentParamsDetector {
            classifier,
            policy: self.policy,
        }
    }

    /// Sets how repeated sequences are stored during a run.
    pub fn with_history_policy(mut self, policy: HistoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn history_policy(&self) -> HistoryPolicy {
        self.policy
    }

    /// Returns true if some SELECT text executed with a parameter sequence
    /// none of its earlier executions used.
    ///
    /// Stops at the first such execution; later statements are never
    /// examined.
    pub fn detect(&self, log: &ExecutionLog) -> Result<bool> {
        self.find_divergence(log).map(|found| found.is_some())
    }

    /// Runs the same pass as [`detect`](Self::detect) and describes the
    /// first divergence found.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::UnsupportedBatchConfiguration`](crate::AnalysisError)
    /// if a SELECT reached before any divergence carries more than one
    /// parameter batch.
    pub fn find_divergence(&self, log: &ExecutionLog) -> Result<Option<Divergence>> {
        let mut history = ExecutionHistory::new(self.policy);
        let mut selects = 0_usize;

        for (index, execution) in log.statements().enumerate() {
            let kind = self.classifier.classify(execution);
            if !kind.is_select() {
                debug!(index, %kind, "skipping non-SELECT statement");
                continue;
            }
            selects += 1;

            let parameters = extract_parameters(execution).inspect_err(|e| {
                warn!(index, error = %e, "aborting analysis");
            })?;
            let sql = execution.statement_text.as_str();

            match history.lookup(sql) {
                Some(previous) if !previous.contains(&parameters) => {
                    let divergence = Divergence {
                        statement_text: sql.to_owned(),
                        index,
                        parameters,
                        previous: previous.to_vec(),
                    };
                    info!(
                        index,
                        statement = sql,
                        "SELECT re-executed with different parameters"
                    );
                    return Ok(Some(divergence));
                }
                Some(_) => debug!(index, statement = sql, "SELECT repeated with same parameters"),
                None => debug!(index, statement = sql, "first execution of SELECT"),
            }

            history.record(sql, parameters);
        }

        debug!(
            statements = log.len(),
            selects,
            distinct_selects = history.len(),
            "no divergent SELECT parameters found"
        );
        Ok(None)
    }
}

/// Runs the default [`DivergentParamsDetector`] over `log`.
pub fn detect(log: &ExecutionLog) -> Result<bool> {
    DivergentParamsDetector::new().detect(log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divergence_display_lists_previous_sequences() {
        let divergence = Divergence {
            statement_text: "SELECT * FROM x WHERE id = ?".to_string(),
            index: 2,
            parameters: vec![Value::Integer(3)],
            previous: vec![vec![Value::Integer(1)], vec![Value::Integer(2)]],
        };

        assert_eq!(
            divergence.to_string(),
            "SELECT * FROM x WHERE id = ? executed with parameters [3] (statement #3); \
             previously seen: [1], [2]"
        );
    }

    #[test]
    fn sequence_display_separates_values() {
        let seq = vec![Value::from("a"), Value::Null, Value::BigInt(4)];
        assert_eq!(SequenceDisplay(&seq).to_string(), "['a', NULL, 4]");
        assert_eq!(SequenceDisplay(&[]).to_string(), "[]");
    }
}
