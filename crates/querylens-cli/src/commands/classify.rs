//! Classify command - print the statement kind of a SQL string.

use querylens_classify::{ClassifierKind, StatementClassifier};
use querylens_config::QuerylensConfig;
use querylens_types::StatementExecution;

pub fn run(config: &QuerylensConfig, sql: &str, classifier: Option<ClassifierKind>) {
    let kind = classifier.unwrap_or(config.analysis.classifier);
    let statement = StatementExecution::new(sql);
    println!("{}", kind.build().classify(&statement));
}
