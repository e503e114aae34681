//! Bound parameter extraction.

use querylens_types::{StatementExecution, Value};

use crate::error::{AnalysisError, Result};

/// The values bound to a statement's placeholders, in bind order.
pub type BoundParameterSequence = Vec<Value>;

/// Extracts the values bound to a single statement execution.
///
/// - No batch: the statement had no placeholders, the sequence is empty.
/// - One batch: the value of each bind call, in the order the calls were
///   recorded. Positions are assumed monotonic and are not re-sorted.
/// - More than one batch: [`AnalysisError::UnsupportedBatchConfiguration`].
pub fn extract_parameters(execution: &StatementExecution) -> Result<BoundParameterSequence> {
    match execution.parameter_batches.as_slice() {
        [] => Ok(Vec::new()),
        [batch] => Ok(batch.iter().map(|op| op.value.clone()).collect()),
        batches => Err(AnalysisError::UnsupportedBatchConfiguration {
            statement: execution.statement_text.clone(),
            batches: batches.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use querylens_types::ParameterSetOperation;

    use super::*;

    #[test]
    fn no_batches_yields_empty_sequence() {
        let stmt = StatementExecution::new("SELECT now()");
        assert_eq!(extract_parameters(&stmt).unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn empty_batch_yields_empty_sequence() {
        let stmt = StatementExecution::new("SELECT now()").with_operations(Vec::new());
        assert!(extract_parameters(&stmt).unwrap().is_empty());
    }

    #[test]
    fn single_batch_keeps_bind_order() {
        let stmt = StatementExecution::new("SELECT * FROM t WHERE a = ? AND b = ?")
            .with_operations(vec![
                ParameterSetOperation::new(2, "second"),
                ParameterSetOperation::new(1, 10_i32),
            ]);

        assert_eq!(
            extract_parameters(&stmt).unwrap(),
            vec![Value::from("second"), Value::Integer(10)]
        );
    }

    #[test]
    fn null_binds_are_kept() {
        let stmt = StatementExecution::new("SELECT * FROM t WHERE a = ?")
            .with_batch([Value::Null]);
        assert_eq!(extract_parameters(&stmt).unwrap(), vec![Value::Null]);
    }

    #[test]
    fn several_batches_are_rejected() {
        let stmt = StatementExecution::new("SELECT * FROM t WHERE a = ?")
            .with_batch([1_i32])
            .with_batch([2_i32]);

        let err = extract_parameters(&stmt).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::UnsupportedBatchConfiguration {
                statement: "SELECT * FROM t WHERE a = ?".to_string(),
                batches: 2,
            }
        );
        assert!(err.to_string().contains("2 parameter batches"));
    }
}
