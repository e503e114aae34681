//! Property-based tests using proptest.
//!
//! Random logs over a small pool of statement texts and parameter values,
//! so repeats and collisions are frequent.

use proptest::prelude::*;
use querylens_types::{ExecutionLog, SqlExecution, StatementExecution};

use crate::{DivergentParamsDetector, HistoryPolicy, detect};

const TEXTS: &[&str] = &[
    "SELECT * FROM users WHERE id = ?",
    "SELECT name FROM users WHERE org = ? AND active = ?",
    "UPDATE users SET name = ? WHERE id = ?",
    "INSERT INTO audit (user_id) VALUES (?)",
];

const WRITE_TEXTS: &[&str] = &[
    "UPDATE users SET name = ? WHERE id = ?",
    "INSERT INTO audit (user_id) VALUES (?)",
    "DELETE FROM sessions WHERE user_id = ?",
];

const SELECT_TEXTS: &[&str] = &[
    "SELECT * FROM a WHERE id = ?",
    "SELECT * FROM b WHERE id = ?",
    "SELECT * FROM c WHERE id = ?",
    "SELECT * FROM d WHERE id = ?",
];

fn statement_from(texts: &'static [&'static str]) -> impl Strategy<Value = StatementExecution> {
    (
        prop::sample::select(texts),
        prop::collection::vec(0_i32..3, 0..3),
    )
        .prop_map(|(sql, params)| StatementExecution::new(sql).with_batch(params))
}

fn log_from(texts: &'static [&'static str]) -> impl Strategy<Value = ExecutionLog> {
    prop::collection::vec(prop::collection::vec(statement_from(texts), 1..4), 0..8).prop_map(
        |batches| ExecutionLog::from(batches.into_iter().map(SqlExecution::new).collect::<Vec<_>>()),
    )
}

/// Reference verdict: some SELECT has earlier executions of the same text,
/// and none of them used its parameters.
fn reference_verdict(log: &ExecutionLog) -> bool {
    let selects: Vec<&StatementExecution> = log
        .statements()
        .filter(|s| s.statement_text.starts_with("SELECT"))
        .collect();

    selects.iter().enumerate().any(|(i, current)| {
        let mut earlier = selects[..i]
            .iter()
            .filter(|e| e.statement_text == current.statement_text)
            .peekable();
        earlier.peek().is_some()
            && !earlier.any(|e| e.parameter_batches == current.parameter_batches)
    })
}

proptest! {
    /// The single forward pass agrees with the brute-force definition.
    #[test]
    fn matches_reference_verdict(log in log_from(TEXTS)) {
        prop_assert_eq!(detect(&log).unwrap(), reference_verdict(&log));
    }

    /// Logs with only writes are always clean.
    #[test]
    fn writes_never_trigger(log in log_from(WRITE_TEXTS)) {
        prop_assert!(!detect(&log).unwrap());
    }

    /// SELECT texts seen at most once are always clean.
    #[test]
    fn unique_select_texts_never_trigger(
        params in prop::collection::vec(prop::collection::vec(0_i32..100, 0..4), 0..4)
    ) {
        let log = ExecutionLog::from_statements(
            SELECT_TEXTS.iter().zip(params).map(|(sql, p)| StatementExecution::new(*sql).with_batch(p)),
        );
        prop_assert!(!detect(&log).unwrap());
    }

    /// Deduplicating stored sequences never changes where a divergence is found.
    #[test]
    fn history_policies_agree(log in log_from(TEXTS)) {
        let retained = DivergentParamsDetector::new()
            .find_divergence(&log)
            .unwrap()
            .map(|d| d.index);
        let deduped = DivergentParamsDetector::new()
            .with_history_policy(HistoryPolicy::Deduplicate)
            .find_divergence(&log)
            .unwrap()
            .map(|d| d.index);
        prop_assert_eq!(retained, deduped);
    }

    /// Repeating a clean log's statements verbatim keeps it clean.
    #[test]
    fn replaying_a_clean_log_stays_clean(log in log_from(TEXTS)) {
        prop_assume!(!detect(&log).unwrap());
        let mut replayed = log.clone();
        replayed.executions.extend(log.executions.iter().cloned());
        prop_assert!(!detect(&replayed).unwrap());
    }
}
