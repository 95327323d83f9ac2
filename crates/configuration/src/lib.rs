use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, ExportSettings, LoggingSettings, RankingSettings};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "crewrank.toml";

/// Prefix for environment overrides, e.g. `CREWRANK__RANKING__AGGREGATION=distance_weighted`.
pub const ENV_PREFIX: &str = "CREWRANK";

/// Loads the application configuration from `crewrank.toml` and the environment.
///
/// The file is optional. Environment variables override file values.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE), false)
}

/// Loads configuration from an explicit file path.
///
/// When `required` is true a missing file is an error; otherwise defaults apply.
pub fn load_config_from(path: &Path, required: bool) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), ?config, "Loaded configuration.");
    Ok(config)
}

/// Command-line overrides for the loaded configuration.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Path to a configuration file (defaults to ./crewrank.toml if present).
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Override the speed aggregation rule (arithmetic_mean | distance_weighted).
    #[arg(long, global = true)]
    pub aggregation: Option<core_types::AggregationRule>,
}

#[cfg(feature = "clap")]
impl ConfigArgs {
    /// Loads the configuration file named on the command line and applies the overrides.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path, true)?,
            None => load_config()?,
        };
        if let Some(rule) = self.aggregation {
            config.ranking.aggregation = rule;
        }
        Ok(config)
    }
}
