//! Error types for the gesture pipeline
//!
//! Only setup-time failures ([`SetupError`]) cross the pipeline boundary as reported
//! errors. Per-frame failures are wrapped in [`GestureError::FrameProcessing`], logged by
//! the worker and absorbed so the gesture stream stays alive.
//!
//! Error variants use `#[source]` to preserve error chains for observability.

use crate::source::CameraFacing;
use std::path::PathBuf;
use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Failures that prevent a session from starting
///
/// Returned synchronously from `Pipeline::start`; the pipeline stays stopped.
#[derive(Debug, Error)]
pub enum SetupError {
    /// No camera with the requested facing exists
    #[error("No {0} camera available")]
    CameraUnavailable(CameraFacing),

    /// The camera exists but could not be opened or bound
    #[error("Failed to start camera: {0}")]
    CameraInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The pose model asset could not be found
    #[error("Pose model asset not found: {}", .0.display())]
    ModelAssetMissing(PathBuf),

    /// The pose model was found but failed to initialize
    #[error("Failed to initialize pose model: {0}")]
    ModelInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum GestureError {
    /// Session setup failed
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// Processing of a single admitted frame failed
    #[error("Frame processing failed: {0}")]
    FrameProcessing(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration could not be loaded, saved or applied
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A landmark script line could not be parsed
    #[error("Invalid landmark script at line {line}: {source}")]
    ScriptError {
        /// 1-based line number
        line: usize,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },
}

impl GestureError {
    /// Wrap an ad-hoc message as a frame processing failure
    pub fn frame(msg: impl Into<String>) -> Self {
        Self::FrameProcessing(StringError::new(msg))
    }

    /// Whether this error was raised while setting up a session
    pub fn is_setup_error(&self) -> bool {
        matches!(self, Self::Setup(_))
    }
}

/// Result type alias for gesture pipeline operations
pub type Result<T> = std::result::Result<T, GestureError>;

/// Convert an error to a message suitable for showing to the climber
pub fn get_user_friendly_error(error: &GestureError) -> String {
    match error {
        GestureError::Setup(SetupError::CameraUnavailable(facing)) => {
            format!(
                "No {facing} camera was found.\n\n\
                 Try switching to the other camera, or check that no other\n\
                 application is using it."
            )
        }
        GestureError::Setup(SetupError::CameraInitFailed(_)) => "Unable to start the camera.\n\n\
             Please ensure:\n\
             - Camera permission has been granted\n\
             - No other application is using the camera"
            .to_string(),
        GestureError::Setup(SetupError::ModelAssetMissing(path)) => {
            format!(
                "The pose detection model is missing:\n\n{}\n\n\
                 Reinstall the application to restore it.",
                path.display()
            )
        }
        GestureError::Setup(SetupError::ModelInitFailed(_)) => {
            "The pose detection model could not be loaded.\n\n\
             Gesture control is unavailable; the timer can still be started manually."
                .to_string()
        }
        GestureError::FrameProcessing(_) => "A camera frame could not be analysed.\n\n\
             Gesture detection continues with the next frame."
            .to_string(),
        GestureError::ConfigError(_) | GestureError::InvalidConfig(_) => {
            "Failed to load or save gesture settings.\n\n\
             Default thresholds will be used."
                .to_string()
        }
        GestureError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        GestureError::ScriptError { line, .. } => {
            format!(
                "The landmark script could not be read (line {line}).\n\n\
                 Each line must be a landmark array, null, or {{\"error\": \"...\"}}."
            )
        }
        GestureError::JsonError(e) => {
            format!(
                "Settings or script file is corrupted:\n\n{e}\n\n\
                 The application will use default settings."
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_display() {
        let error = GestureError::from(SetupError::CameraUnavailable(CameraFacing::Front));
        assert_eq!(error.to_string(), "No front camera available");
        assert!(error.is_setup_error());
    }

    #[test]
    fn test_model_asset_missing_display() {
        let error = SetupError::ModelAssetMissing(PathBuf::from("pose_landmarker_lite.task"));
        assert_eq!(
            error.to_string(),
            "Pose model asset not found: pose_landmarker_lite.task"
        );
    }

    #[test]
    fn test_frame_error_is_not_setup_error() {
        let error = GestureError::frame("decode failed");
        assert!(!error.is_setup_error());
        assert_eq!(error.to_string(), "Frame processing failed: decode failed");
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: GestureError = io_error.into();
        assert!(matches!(error, GestureError::IoError(_)));
    }

    #[test]
    fn test_source_chain_preserved() {
        use std::error::Error as _;

        let error = GestureError::from(SetupError::ModelInitFailed(StringError::new(
            "delegate unavailable",
        )));
        let source = error.source().expect("setup error should expose its source");
        assert_eq!(source.to_string(), "delegate unavailable");
    }

    #[test]
    fn test_user_friendly_camera_message() {
        let error = GestureError::from(SetupError::CameraUnavailable(CameraFacing::Back));
        let message = get_user_friendly_error(&error);
        assert!(message.contains("No back camera"));
        assert!(message.contains("other camera"));
    }

    #[test]
    fn test_user_friendly_model_message() {
        let error = GestureError::from(SetupError::ModelInitFailed(StringError::new("x")));
        let message = get_user_friendly_error(&error);
        assert!(message.contains("started manually"));
    }
}
