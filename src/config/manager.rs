//! Configuration manager for loading and saving detector configuration
//!
//! The configuration lives in `$HANGBOARD_GESTURE_HOME/config.json`. Writes go through a
//! temporary file in the same directory and an atomic rename, so a crash mid-save never
//! leaves a truncated file behind.

use crate::config::models::DetectorConfig;
use crate::error::{GestureError, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Environment variable naming the application data directory
pub const HOME_ENV_VAR: &str = "HANGBOARD_GESTURE_HOME";

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Application data directory
    ///
    /// Returns `$HANGBOARD_GESTURE_HOME`, or `./hangboard-gesture` when unset.
    pub fn get_home_dir() -> PathBuf {
        std::env::var_os(HOME_ENV_VAR)
            .map_or_else(|| PathBuf::from(".").join("hangboard-gesture"), PathBuf::from)
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        Self::get_home_dir().join("config.json")
    }

    /// Ensure the application data directory exists
    pub fn ensure_home_dir() -> Result<PathBuf> {
        let home = Self::get_home_dir();
        std::fs::create_dir_all(&home)?;
        Ok(home)
    }

    /// Load configuration from disk
    ///
    /// A missing or unparsable file yields the default configuration. A file that parses
    /// but carries out-of-range values is rejected.
    pub fn load() -> Result<DetectorConfig> {
        let config_path = Self::get_config_path();

        if !config_path.exists() {
            info!("Configuration file not found, using defaults");
            return Ok(DetectorConfig::default());
        }

        let json = std::fs::read_to_string(&config_path)?;

        let config = match serde_json::from_str::<DetectorConfig>(&json) {
            Ok(config) => {
                info!("Configuration loaded from {}", config_path.display());
                config
            }
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                DetectorConfig::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk with an atomic write
    pub fn save(config: &DetectorConfig) -> Result<()> {
        config.validate()?;

        let home = Self::ensure_home_dir()?;
        let json = serde_json::to_string_pretty(config)?;

        let mut temp = tempfile::NamedTempFile::new_in(&home)?;
        temp.write_all(json.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(Self::get_config_path())
            .map_err(|e| GestureError::ConfigError(Box::new(e)))?;

        info!("Configuration saved successfully");
        Ok(())
    }
}
