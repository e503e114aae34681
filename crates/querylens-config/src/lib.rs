//! Configuration management for querylens
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence, applied by the caller)
//! 2. Environment variables (QUERYLENS_* prefix)
//! 3. An explicit config file (`--config`)
//! 4. querylens.local.toml (gitignored, local overrides)
//! 5. querylens.toml (git-tracked, project config)
//! 6. ~/.config/querylens/config.toml (user defaults)
//! 7. Built-in defaults (lowest precedence)

use serde::{Deserialize, Serialize};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

pub use querylens_analysis::HistoryPolicy;
pub use querylens_classify::ClassifierKind;

/// Log levels accepted by `log.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Main querylens configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerylensConfig {
    pub analysis: AnalysisConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Which classifier decides whether a statement is a SELECT.
    pub classifier: ClassifierKind,
    /// How repeated parameter sequences are stored during a run.
    pub history: HistoryPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default tracing level; `RUST_LOG` still takes precedence.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl QuerylensConfig {
    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.log.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log.level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuerylensConfig::default();
        assert_eq!(config.analysis.classifier, ClassifierKind::Parser);
        assert_eq!(config.analysis.history, HistoryPolicy::RetainAll);
        assert_eq!(config.log.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_level() {
        let mut config = QuerylensConfig::default();
        config.log.level = "loud".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_validate_accepts_uppercase_level() {
        let mut config = QuerylensConfig::default();
        config.log.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip_uses_kebab_case() {
        let config = QuerylensConfig {
            analysis: AnalysisConfig {
                classifier: ClassifierKind::Keyword,
                history: HistoryPolicy::Deduplicate,
            },
            ..Default::default()
        };

        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("classifier = \"keyword\""));
        assert!(text.contains("history = \"deduplicate\""));

        let parsed: QuerylensConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.analysis.classifier, ClassifierKind::Keyword);
        assert_eq!(parsed.analysis.history, HistoryPolicy::Deduplicate);
    }
}
