//! Configuration management module
//!
//! This module handles loading, saving and validating the detector configuration.
//! Configuration is stored in `$HANGBOARD_GESTURE_HOME/config.json` with atomic writes
//! to prevent corruption.

pub mod manager;
pub mod models;

pub use manager::ConfigManager;
pub use models::{
    CameraPreferences, DetectorConfig, GestureThresholds, LoggingPreferences, ModelOptions,
};
