//! External collaborators: camera frames and pose inference
//!
//! The pipeline never talks to a camera API or a neural network directly. Platform
//! adapters implement these traits; the `replay` module provides a scripted pair used by
//! the demo binary, the tests and the benchmarks.
//!
//! # Frame flow
//!
//! ```text
//! CameraProvider::open(facing, FrameSink) ──► CameraSession (own thread / callback)
//!                                                   │ FrameSink::deliver(Frame)
//!                                                   ▼
//!                                  FrameGate admits ──► worker ──► PoseEstimator::detect
//!                                         │ rejects
//!                                         ▼
//!                                  Frame dropped (release hook runs)
//! ```

pub mod replay;

use crate::config::ModelOptions;
use crate::error::{Result, SetupError};
use crate::gesture::PoseLandmarks;
use crate::pipeline::FrameSink;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use replay::{LandmarkScript, ReplayCamera, ReplayModelLoader, ScriptStep};

/// Which physical camera to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    /// Selfie camera, facing the climber
    Front,
    /// Rear camera
    Back,
}

impl CameraFacing {
    /// Map the host's `frontCamera` flag
    pub fn from_front_flag(front_camera: bool) -> Self {
        if front_camera { Self::Front } else { Self::Back }
    }
}

impl fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Front => "front",
            Self::Back => "back",
        })
    }
}

/// One camera image
///
/// Dropping the frame signals the camera that its buffer may be reused: the release hook
/// attached with [`Frame::with_release`] runs exactly once, whether the frame was
/// processed, rejected by the gate, or abandoned after an error.
pub struct Frame {
    sequence: u64,
    width: u32,
    height: u32,
    data: Vec<u8>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Frame {
    /// Create a frame from raw pixel bytes
    pub fn new(sequence: u64, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            sequence,
            width,
            height,
            data,
            release: None,
        }
    }

    /// Attach a hook that runs when the frame is dropped
    #[must_use]
    pub fn with_release(mut self, release: impl FnOnce() + Send + 'static) -> Self {
        self.release = Some(Box::new(release));
        self
    }

    /// Position of the frame in the camera's output stream
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes, layout defined by the camera adapter
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("sequence", &self.sequence)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Opens camera sessions
pub trait CameraProvider: Send {
    /// Start acquiring frames from the camera with the given facing and push each one
    /// into `frames`.
    fn open(
        &mut self,
        facing: CameraFacing,
        frames: FrameSink,
    ) -> std::result::Result<Box<dyn CameraSession>, SetupError>;
}

/// A running camera
pub trait CameraSession: Send {
    /// Stop acquisition. Must not return while a frame delivery is still in progress.
    fn stop(&mut self);
}

/// Loads the pose model
pub trait PoseModelLoader: Send {
    /// Initialize a single-person pose estimator
    fn load(
        &mut self,
        options: &ModelOptions,
    ) -> std::result::Result<Box<dyn PoseEstimator>, SetupError>;
}

/// Pose inference on one frame
pub trait PoseEstimator: Send {
    /// Detect at most one person. `Ok(None)` means nobody is in frame; `Err` is a
    /// per-frame failure (decode error, inference failure).
    fn detect(&mut self, frame: &Frame) -> Result<Option<PoseLandmarks>>;
}
