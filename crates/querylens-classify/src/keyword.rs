//! First-keyword classification.

use querylens_types::{StatementExecution, StatementKind};

use crate::StatementClassifier;

/// Classifies a statement by its leading keyword.
///
/// Leading whitespace, `--` line comments, `/* */` block comments and
/// opening parentheses are skipped before the keyword is read. Matching is
/// case-insensitive. A `WITH` prefix is reported as [`StatementKind::Other`]
/// because the verb follows the CTE list; use
/// [`ParserClassifier`](crate::ParserClassifier) when CTEs matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Classifies raw SQL text.
    pub fn classify_sql(sql: &str) -> StatementKind {
        let keyword = leading_keyword(sql);

        if keyword.eq_ignore_ascii_case("select") {
            StatementKind::Select
        } else if keyword.eq_ignore_ascii_case("insert") {
            StatementKind::Insert
        } else if keyword.eq_ignore_ascii_case("update") {
            StatementKind::Update
        } else if keyword.eq_ignore_ascii_case("delete") {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }
}

impl StatementClassifier for KeywordClassifier {
    fn classify(&self, execution: &StatementExecution) -> StatementKind {
        Self::classify_sql(&execution.statement_text)
    }
}

/// Returns the first keyword of `sql`, or an empty string if there is none.
fn leading_keyword(sql: &str) -> &str {
    let rest = skip_trivia(sql);
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Skips whitespace, comments and opening parentheses.
fn skip_trivia(mut sql: &str) -> &str {
    loop {
        let trimmed = sql.trim_start_matches(|c: char| c.is_whitespace() || c == '(');

        if let Some(after) = trimmed.strip_prefix("--") {
            sql = after.find('\n').map_or("", |nl| &after[nl + 1..]);
        } else if let Some(after) = trimmed.strip_prefix("/*") {
            // Unterminated block comment swallows the rest
            sql = after.find("*/").map_or("", |end| &after[end + 2..]);
        } else {
            return trimmed;
        }
    }
}
