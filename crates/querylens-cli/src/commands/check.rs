//! Check command - analyze an execution log.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use querylens_analysis::{Divergence, DivergentParamsDetector, HistoryPolicy};
use querylens_classify::ClassifierKind;
use querylens_config::QuerylensConfig;
use querylens_types::ExecutionLog;
use serde::Serialize;
use tracing::info;

use crate::ReportFormat;
use crate::style::{print_divergence_table, print_error, print_hint, print_success};

/// Exit status when a divergence is found.
const DIVERGENCE_EXIT: u8 = 1;

/// JSON shape of a check verdict.
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    detected: bool,
    statements: usize,
    classifier: ClassifierKind,
    divergence: Option<&'a Divergence>,
}

pub fn run(
    config: &QuerylensConfig,
    log_path: &Path,
    classifier: Option<ClassifierKind>,
    dedupe: bool,
    format: ReportFormat,
) -> Result<ExitCode> {
    let log = read_log(log_path)?;

    let classifier = classifier.unwrap_or(config.analysis.classifier);
    let policy = if dedupe {
        HistoryPolicy::Deduplicate
    } else {
        config.analysis.history
    };

    info!(
        log = %log_path.display(),
        statements = log.len(),
        %classifier,
        "analyzing execution log"
    );

    let detector = DivergentParamsDetector::new()
        .with_classifier(classifier.build())
        .with_history_policy(policy);
    let divergence = detector
        .find_divergence(&log)
        .with_context(|| format!("Failed to analyze {}", log_path.display()))?;

    match format {
        ReportFormat::Json => {
            let report = CheckReport {
                detected: divergence.is_some(),
                statements: log.len(),
                classifier,
                divergence: divergence.as_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportFormat::Text => match &divergence {
            Some(d) => {
                print_error("Same SELECT executed with different parameters");
                print_divergence_table(d);
                print_hint("Batch these lookups into one query or cache the result.");
            }
            None => print_success(&format!(
                "No SELECT re-executed with different parameters ({} statements analyzed)",
                log.len()
            )),
        },
    }

    Ok(if divergence.is_some() {
        ExitCode::from(DIVERGENCE_EXIT)
    } else {
        ExitCode::SUCCESS
    })
}

/// Reads and parses a JSON execution log.
pub fn read_log(path: &Path) -> Result<ExecutionLog> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read execution log {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse execution log {}", path.display()))
}
