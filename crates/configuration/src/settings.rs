use crate::error::ConfigError;
use core_types::AggregationRule;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing values take the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ranking: RankingSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

/// Parameters for the ranking engine.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankingSettings {
    /// How per-race speeds are combined into a team's adjusted speed.
    pub aggregation: AggregationRule,
}

/// Where compliance exports are written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { output_dir: PathBuf::from("exports") }
    }
}

/// Logging verbosity used when `RUST_LOG` is not set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Checks the values serde alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "export.output_dir must not be empty".to_string(),
            ));
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.logging.level
            )));
        }

        Ok(())
    }
}
