//! Configuration management commands.

use anyhow::Result;
use querylens_config::QuerylensConfig;

use crate::ConfigFormat;
use crate::style::print_labeled;

/// Show current configuration.
pub fn show(config: &QuerylensConfig, format: ConfigFormat) -> Result<()> {
    match format {
        ConfigFormat::Json => {
            let json = serde_json::to_string_pretty(config)?;
            println!("{json}");
        }
        ConfigFormat::Toml => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{toml_str}");
        }
        ConfigFormat::Text => {
            println!("querylens configuration");
            println!("=======================\n");

            println!("Analysis:");
            print_labeled("Classifier", &config.analysis.classifier.to_string());
            print_labeled("History", &config.analysis.history.to_string());
            println!();

            println!("Log:");
            print_labeled("Level", &config.log.level);
        }
    }

    Ok(())
}
