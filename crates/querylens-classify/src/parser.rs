//! Classification backed by `sqlparser`.

use querylens_types::{StatementExecution, StatementKind};
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use crate::{KeywordClassifier, StatementClassifier};

/// Classifies a statement by parsing it.
///
/// A query is a SELECT unless its body is DML (`WITH .. INSERT`). Text that
/// does not parse as exactly one statement under the generic dialect is
/// handed to [`KeywordClassifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserClassifier;

impl ParserClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classifies raw SQL text.
    pub fn classify_sql(&self, sql: &str) -> StatementKind {
        let statements = match Parser::parse_sql(&GenericDialect {}, sql) {
            Ok(statements) => statements,
            Err(e) => {
                debug!(error = %e, "unparseable statement, using keyword scan");
                return KeywordClassifier::classify_sql(sql);
            }
        };

        match statements.as_slice() {
            [statement] => classify_statement(statement),
            _ => {
                debug!(
                    count = statements.len(),
                    "expected exactly 1 statement, using keyword scan"
                );
                KeywordClassifier::classify_sql(sql)
            }
        }
    }
}

impl StatementClassifier for ParserClassifier {
    fn classify(&self, execution: &StatementExecution) -> StatementKind {
        self.classify_sql(&execution.statement_text)
    }
}

fn classify_statement(statement: &Statement) -> StatementKind {
    match statement {
        // The rendered body starts with its verb once the CTE list is gone
        Statement::Query(query) => {
            match KeywordClassifier::classify_sql(&query.body.to_string()) {
                // VALUES and TABLE bodies read rows like a SELECT
                StatementKind::Other => StatementKind::Select,
                kind => kind,
            }
        }
        Statement::Insert { .. } => StatementKind::Insert,
        Statement::Update { .. } => StatementKind::Update,
        Statement::Delete { .. } => StatementKind::Delete,
        _ => StatementKind::Other,
    }
}
