//! querylens CLI.
//!
//! Flags SELECT statements that a test run executed more than once with
//! different bound parameters.
//!
//! # Quick Start
//!
//! ```bash
//! # Analyze an execution log written by a recorder
//! querylens check target/queries.json
//!
//! # Machine-readable verdict for CI
//! querylens check target/queries.json --format json
//!
//! # How would a statement be classified?
//! querylens classify "WITH c AS (SELECT 1) SELECT * FROM c"
//! ```
//!
//! Exit status of `check`: 0 when clean, 1 when a divergence is found,
//! 2 on any error.

mod commands;
mod style;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use querylens_classify::ClassifierKind;
use querylens_config::{ConfigLoader, QuerylensConfig};

/// querylens - find SELECTs re-executed with different parameters.
#[derive(Parser)]
#[command(name = "querylens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory holding querylens.toml.
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Extra config file layered above the project config.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Analyze an execution log for divergent SELECT parameters.
    Check {
        /// Path to the JSON execution log.
        log: PathBuf,

        /// Statement classifier (keyword, parser). Overrides config.
        #[arg(long)]
        classifier: Option<ClassifierKind>,

        /// Store each distinct parameter sequence once.
        #[arg(long)]
        dedupe: bool,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Print the statement kind of a SQL string.
    Classify {
        /// SQL text.
        sql: String,

        /// Statement classifier (keyword, parser). Overrides config.
        #[arg(long)]
        classifier: Option<ClassifierKind>,
    },

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Text)]
        format: ConfigFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Text,
    Json,
    Toml,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    style::set_no_color(cli.no_color);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            style::print_error(&format!("{e:#}"));
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            log,
            classifier,
            dedupe,
            format,
        } => {
            let config = setup(&cli)?;
            commands::check::run(&config, log, *classifier, *dedupe, *format)
        }
        Commands::Classify { sql, classifier } => {
            let config = setup(&cli)?;
            commands::classify::run(&config, sql, *classifier);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(ConfigCommands::Show { format }) => {
            let config = setup(&cli)?;
            commands::config::show(&config, *format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Loads configuration and starts logging; every command but `version` needs both.
fn setup(cli: &Cli) -> Result<QuerylensConfig> {
    let config = load_config(cli)?;
    init_tracing(&config);
    Ok(config)
}

fn load_config(cli: &Cli) -> Result<QuerylensConfig> {
    let mut loader = ConfigLoader::new().with_project_dir(&cli.project);
    if let Some(file) = &cli.config {
        loader = loader.with_config_file(file);
    }
    loader.load().context("Failed to load configuration")
}

fn init_tracing(config: &QuerylensConfig) {
    // RUST_LOG wins over the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
