//! # querylens-types: Execution log types for `querylens`
//!
//! This crate contains the data captured by a query execution recorder
//! during a test run:
//! - Bound parameter values ([`Value`])
//! - Individual bind calls ([`ParameterSetOperation`])
//! - Executed statements ([`StatementExecution`]) grouped into batches
//!   ([`SqlExecution`]) and ordered into an [`ExecutionLog`]
//! - SQL verb labels ([`StatementKind`])
//!
//! All types are plain data: immutable once captured and serializable so a
//! recorder in another process can hand a log over as JSON.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

mod value;

pub use value::Value;

// ============================================================================
// Statement Kinds
// ============================================================================

/// The SQL verb of an executed statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    /// DDL, transaction control, vendor commands and anything unrecognized.
    Other,
}

impl StatementKind {
    pub fn is_select(self) -> bool {
        self == StatementKind::Select
    }
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Other => "OTHER",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Captured Statements
// ============================================================================

/// One bind call made on a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSetOperation {
    /// 1-based placeholder index the value was bound to.
    pub position: u32,
    /// The bound value.
    pub value: Value,
}

impl ParameterSetOperation {
    pub fn new(position: u32, value: impl Into<Value>) -> Self {
        Self {
            position,
            value: value.into(),
        }
    }
}

/// A batch of bind calls, in the order the driver received them.
pub type ParameterBatch = Vec<ParameterSetOperation>;

/// One executed SQL statement instance.
///
/// A plain prepared statement carries a single parameter batch; a statement
/// without placeholders carries none. JDBC-style `addBatch` executions carry
/// one batch per `addBatch` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementExecution {
    /// The raw SQL text as sent to the driver.
    #[serde(rename = "sql", alias = "statement_text")]
    pub statement_text: String,
    /// Parameter batches in capture order.
    #[serde(default)]
    pub parameter_batches: Vec<ParameterBatch>,
}

impl StatementExecution {
    /// Creates a statement execution with no bound parameters.
    pub fn new(statement_text: impl Into<String>) -> Self {
        Self {
            statement_text: statement_text.into(),
            parameter_batches: Vec::new(),
        }
    }

    /// Appends a parameter batch, numbering placeholders from 1 in order.
    pub fn with_batch<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let batch = values
            .into_iter()
            .zip(1..)
            .map(|(value, position)| ParameterSetOperation::new(position, value))
            .collect();
        self.parameter_batches.push(batch);
        self
    }

    /// Appends an already-built parameter batch.
    pub fn with_operations(mut self, batch: ParameterBatch) -> Self {
        self.parameter_batches.push(batch);
        self
    }
}

/// A group of statements sent to the database by one execute call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlExecution {
    pub statements: Vec<StatementExecution>,
}

impl SqlExecution {
    pub fn new(statements: Vec<StatementExecution>) -> Self {
        Self { statements }
    }
}

impl From<StatementExecution> for SqlExecution {
    fn from(statement: StatementExecution) -> Self {
        Self::new(vec![statement])
    }
}

// ============================================================================
// Execution Log
// ============================================================================

/// The ordered record of every statement executed during a test run.
///
/// Capture order is the order of [`SqlExecution`]s, and within each, the
/// order of their statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLog {
    #[serde(default)]
    pub executions: Vec<SqlExecution>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log where every statement was its own execute call.
    pub fn from_statements(statements: impl IntoIterator<Item = StatementExecution>) -> Self {
        Self {
            executions: statements.into_iter().map(SqlExecution::from).collect(),
        }
    }

    /// Iterates over every statement in capture order, across batches.
    pub fn statements(&self) -> impl Iterator<Item = &StatementExecution> {
        self.executions.iter().flat_map(|e| e.statements.iter())
    }

    /// Returns the total number of captured statements.
    pub fn len(&self) -> usize {
        self.executions.iter().map(|e| e.statements.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<SqlExecution>> for ExecutionLog {
    fn from(executions: Vec<SqlExecution>) -> Self {
        Self { executions }
    }
}
