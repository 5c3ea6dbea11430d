//! Configuration management for the slush fund detector
//!
//! Only operational settings live here. Detection thresholds are fixed in
//! each detector and are not configurable.

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Detector execution settings
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Run detectors as concurrent blocking tasks
    #[serde(default)]
    pub parallel: bool,
    /// Per-detector time budget in milliseconds (concurrent mode)
    #[serde(default = "default_detector_timeout_ms")]
    pub detector_timeout_ms: u64,
}

fn default_detector_timeout_ms() -> u64 {
    5_000
}

impl AnalysisConfig {
    pub fn detector_timeout(&self) -> Duration {
        Duration::from_millis(self.detector_timeout_ms)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            detector_timeout_ms: default_detector_timeout_ms(),
        }
    }
}

/// Where the transaction history comes from
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// JSON file of transaction records; sample data is generated when unset
    #[serde(default)]
    pub transactions_path: Option<String>,
    /// JSON object of account metadata
    #[serde(default)]
    pub account_path: Option<String>,
    /// Account id used when no metadata file is given
    #[serde(default)]
    pub account_id: Option<String>,
    /// Seed for generated sample data
    #[serde(default = "default_sample_seed")]
    pub sample_seed: u64,
}

fn default_sample_seed() -> u64 {
    42
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            transactions_path: None,
            account_path: None,
            account_id: None,
            sample_seed: default_sample_seed(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Also print the ordered alerts as JSON
    #[serde(default)]
    pub emit_json: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(!config.analysis.parallel);
        assert_eq!(config.analysis.detector_timeout(), Duration::from_secs(5));
        assert_eq!(config.input.sample_seed, 42);
        assert!(config.input.transactions_path.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[analysis]
parallel = true
detector_timeout_ms = 250

[input]
account_id = "ACC-777"

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert!(config.analysis.parallel);
        assert_eq!(config.analysis.detector_timeout_ms, 250);
        assert_eq!(config.input.account_id.as_deref(), Some("ACC-777"));
        assert_eq!(config.input.sample_seed, 42);
        assert!(!config.output.emit_json);
        assert_eq!(config.logging.format, "json");
    }
}
