//! Configuration management for logdeck

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::messages::CapacityPolicy;
use crate::severity::SeverityLevel;

/// Message log settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLogConfig {
    /// Route DEBUG events into the message log as well as INFO and above
    #[serde(default)]
    pub debug: bool,

    /// Retention policy: `{ bounded = N }` or `"unbounded"` (default: bounded 5000)
    #[serde(default)]
    pub capacity: CapacityPolicy,
}

impl MessageLogConfig {
    /// Most verbose level the message log ingests from the process's own logging
    pub fn ingest_level(&self) -> SeverityLevel {
        if self.debug {
            SeverityLevel::Debug
        } else {
            SeverityLevel::Info
        }
    }
}

impl Default for MessageLogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            capacity: CapacityPolicy::default(),
        }
    }
}

/// Diagnostic logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Also write diagnostics to a timestamped file under the logs directory
    #[serde(default = "default_log_to_file")]
    pub file: bool,
}

fn default_log_filter() -> String {
    "logdeck=info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: default_log_to_file(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub message_log: MessageLogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location, or return defaults if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `path`, or return defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

/// Get the base configuration directory (~/.logdeck)
/// Falls back to ./.logdeck if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".logdeck")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".logdeck"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Ensure all required directories exist
pub fn ensure_directories() -> Result<()> {
    std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
    std::fs::create_dir_all(logs_dir()).context("Failed to create logs directory")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.message_log.capacity, CapacityPolicy::Bounded(5000));
        assert!(!config.message_log.debug);
        assert_eq!(config.logging.filter, "logdeck=info");
        assert!(config.logging.file);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_unbounded_capacity_from_toml() {
        let parsed: Config = toml::from_str(
            r#"
            [message_log]
            capacity = "unbounded"
            debug = true
            "#,
        )
        .unwrap();

        assert_eq!(parsed.message_log.capacity, CapacityPolicy::Unbounded);
        assert_eq!(parsed.message_log.ingest_level(), SeverityLevel::Debug);
        assert_eq!(parsed.logging, LoggingConfig::default());
    }

    #[test]
    fn test_bounded_capacity_from_toml() {
        let parsed: Config = toml::from_str(
            r#"
            [message_log]
            capacity = { bounded = 250 }
            "#,
        )
        .unwrap();

        assert_eq!(parsed.message_log.capacity, CapacityPolicy::Bounded(250));
        assert_eq!(parsed.message_log.ingest_level(), SeverityLevel::Info);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.message_log.capacity = CapacityPolicy::Bounded(42);
        config.logging.file = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_load_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "message_log = 12").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_dir_does_not_panic() {
        let dir = config_dir();
        assert!(dir.ends_with(".logdeck"));
    }
}
