//! Configuration data models
//!
//! Every section defaults field-by-field, so a config file only needs the values it
//! overrides.

use crate::error::{GestureError, Result};
use crate::gesture::{DEFAULT_EMA_ALPHA, DEFAULT_MARGIN_Y};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default minimum keypoint visibility for a frame to be classified
pub const DEFAULT_CONF_MIN: f32 = 0.5;

/// Default pose model bundled with the application
pub const DEFAULT_MODEL_ASSET: &str = "pose_landmarker_lite.task";

/// Top-level detector configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Classification thresholds
    pub gesture: GestureThresholds,
    /// Pose model options
    pub model: ModelOptions,
    /// Camera selection
    pub camera: CameraPreferences,
    /// Log output settings
    pub logging: LoggingPreferences,
}

/// Thresholds used by the per-frame core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Dead zone around the shoulder line (normalized units)
    pub margin_y: f32,
    /// Minimum visibility across the tracked keypoints
    pub conf_min: f32,
    /// EMA weight of the newest sample
    pub ema_alpha: f32,
}

/// Options passed to the pose model loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Model asset path, resolved by the loader
    pub asset_path: PathBuf,
    /// Number of poses to detect (single-person only)
    pub num_poses: u32,
    /// Minimum score for the initial person detection
    pub min_pose_detection_confidence: f32,
    /// Minimum score that a pose is present
    pub min_pose_presence_confidence: f32,
    /// Minimum score for frame-to-frame tracking
    pub min_tracking_confidence: f32,
}

/// Camera selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPreferences {
    /// Use the front (selfie) camera when the caller does not say otherwise
    pub front_camera: bool,
    /// Frame rate of the replay camera
    pub replay_fps: u32,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Number of previous session logs to keep
    pub max_log_files: u8,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            margin_y: DEFAULT_MARGIN_Y,
            conf_min: DEFAULT_CONF_MIN,
            ema_alpha: DEFAULT_EMA_ALPHA,
        }
    }
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            asset_path: PathBuf::from(DEFAULT_MODEL_ASSET),
            num_poses: 1,
            min_pose_detection_confidence: DEFAULT_CONF_MIN,
            min_pose_presence_confidence: DEFAULT_CONF_MIN,
            min_tracking_confidence: DEFAULT_CONF_MIN,
        }
    }
}

impl Default for CameraPreferences {
    fn default() -> Self {
        Self {
            front_camera: true,
            replay_fps: 30,
        }
    }
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            max_log_files: 9,
        }
    }
}

fn check_unit_interval(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GestureError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

impl DetectorConfig {
    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let gesture = &self.gesture;
        if !(gesture.ema_alpha > 0.0 && gesture.ema_alpha <= 1.0) {
            return Err(GestureError::InvalidConfig(format!(
                "gesture.ema_alpha must be within (0, 1], got {}",
                gesture.ema_alpha
            )));
        }
        if !gesture.margin_y.is_finite() || gesture.margin_y < 0.0 {
            return Err(GestureError::InvalidConfig(format!(
                "gesture.margin_y must be a non-negative number, got {}",
                gesture.margin_y
            )));
        }
        check_unit_interval("gesture.conf_min", gesture.conf_min)?;

        let model = &self.model;
        if model.num_poses != 1 {
            return Err(GestureError::InvalidConfig(format!(
                "model.num_poses must be 1 (single-person tracking), got {}",
                model.num_poses
            )));
        }
        check_unit_interval(
            "model.min_pose_detection_confidence",
            model.min_pose_detection_confidence,
        )?;
        check_unit_interval(
            "model.min_pose_presence_confidence",
            model.min_pose_presence_confidence,
        )?;
        check_unit_interval("model.min_tracking_confidence", model.min_tracking_confidence)?;

        if self.camera.replay_fps == 0 {
            return Err(GestureError::InvalidConfig(
                "camera.replay_fps must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
