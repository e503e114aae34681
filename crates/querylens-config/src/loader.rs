//! Configuration loader with multi-source merging

use crate::{ConfigError, Paths, QuerylensConfig};
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of environment overrides, e.g. `QUERYLENS_LOG_LEVEL`.
const ENV_PREFIX: &str = "QUERYLENS";

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    config_file: Option<PathBuf>,
    include_user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            include_user_config: true,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Layer an explicit config file above the project files. Unlike the
    /// discovered files it must exist.
    pub fn with_config_file(mut self, file: impl AsRef<Path>) -> Self {
        self.config_file = Some(file.as_ref().to_path_buf());
        self
    }

    /// Skip ~/.config/querylens/config.toml
    pub fn without_user_config(mut self) -> Self {
        self.include_user_config = false;
        self
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<QuerylensConfig> {
        let mut builder = config::Config::builder();

        // 1. Start with built-in defaults
        let defaults = QuerylensConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. User config (~/.config/querylens/config.toml)
        if self.include_user_config {
            if let Ok(user_config_file) = Paths::new().user_config_file() {
                if user_config_file.exists() {
                    builder = builder.add_source(
                        config::File::from(user_config_file)
                            .required(false)
                            .format(config::FileFormat::Toml),
                    );
                }
            }
        }

        // 3. Project config (querylens.toml)
        let project_config_file = Paths::project_config_file(&self.project_dir);
        if project_config_file.exists() {
            builder = builder.add_source(
                config::File::from(project_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 4. Local config (querylens.local.toml, gitignored)
        let local_config_file = Paths::local_config_file(&self.project_dir);
        if local_config_file.exists() {
            builder = builder.add_source(
                config::File::from(local_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 5. Explicit config file
        if let Some(path) = &self.config_file {
            let contents = read_toml_file(path)?;
            builder = builder.add_source(config::File::from_str(
                &contents,
                config::FileFormat::Toml,
            ));
        }

        // 6. Environment variables (QUERYLENS_*)
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("_")
                .try_parsing(true),
        );

        // Build and deserialize
        let config = builder.build().context("Failed to build configuration")?;

        let querylens_config: QuerylensConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        querylens_config.validate()?;

        Ok(querylens_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a TOML file, checking its syntax so errors name the file.
fn read_toml_file(path: &Path) -> Result<String, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<toml::Table>(&contents).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassifierKind, HistoryPolicy};
    use tempfile::tempdir;

    fn loader(project_dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(project_dir)
            .without_user_config()
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path())
            .load()
            .expect("Failed to load config");

        assert_eq!(config.analysis.classifier, ClassifierKind::Parser);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_load_project_config() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let config_content = r#"
[analysis]
classifier = "keyword"
history = "deduplicate"

[log]
level = "debug"
"#;
        fs::write(project_dir.join("querylens.toml"), config_content)
            .expect("Failed to write config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert_eq!(config.analysis.classifier, ClassifierKind::Keyword);
        assert_eq!(config.analysis.history, HistoryPolicy::Deduplicate);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_local_overrides() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("querylens.toml"),
            r#"
[analysis]
classifier = "keyword"
"#,
        )
        .expect("Failed to write project config");

        fs::write(
            project_dir.join("querylens.local.toml"),
            r#"
[analysis]
classifier = "parser"
"#,
        )
        .expect("Failed to write local config");

        let config = loader(project_dir).load().expect("Failed to load config");

        // Local config should override project config
        assert_eq!(config.analysis.classifier, ClassifierKind::Parser);
    }

    #[test]
    fn test_explicit_file_overrides_local() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("querylens.local.toml"),
            "[log]\nlevel = \"info\"\n",
        )
        .expect("Failed to write local config");
        let explicit = project_dir.join("ci.toml");
        fs::write(&explicit, "[log]\nlevel = \"error\"\n").expect("Failed to write ci config");

        let config = loader(project_dir)
            .with_config_file(&explicit)
            .load()
            .expect("Failed to load config");

        assert_eq!(config.log.level, "error");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nope.toml");

        let err = loader(temp_dir.path())
            .with_config_file(&missing)
            .load()
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn test_malformed_explicit_file_names_the_path() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let broken = temp_dir.path().join("broken.toml");
        fs::write(&broken, "[analysis\nclassifier = ").expect("Failed to write config");

        let err = loader(temp_dir.path())
            .with_config_file(&broken)
            .load()
            .unwrap_err();

        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_malformed_project_config_is_an_error() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("querylens.toml"), "[analysis\n")
            .expect("Failed to write config");

        assert!(loader(temp_dir.path()).load().is_err());
    }

    #[test]
    fn test_invalid_level_fails_validation() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        fs::write(
            temp_dir.path().join("querylens.toml"),
            "[log]\nlevel = \"chatty\"\n",
        )
        .expect("Failed to write config");

        let err = loader(temp_dir.path()).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unknown_classifier_is_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        fs::write(
            temp_dir.path().join("querylens.toml"),
            "[analysis]\nclassifier = \"regex\"\n",
        )
        .expect("Failed to write config");

        assert!(loader(temp_dir.path()).load().is_err());
    }

    // Environment variable overrides (QUERYLENS_ANALYSIS_CLASSIFIER=keyword,
    // QUERYLENS_LOG_LEVEL=debug) are not exercised here: setting process
    // environment is unsafe under edition 2024 and races other tests.
}
