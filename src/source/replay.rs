//! Scripted camera and pose estimator
//!
//! A [`LandmarkScript`] holds one [`ScriptStep`] per camera frame. [`ReplayCamera`] emits
//! numbered frames on its own thread at a fixed rate and [`ReplayEstimator`] answers each
//! frame with the step at the frame's sequence number, so a script replays identically no
//! matter which frames the gate drops.
//!
//! Script format, one JSON value per line:
//!
//! ```text
//! # comment
//! [{"x":0.5,"y":0.4,"visibility":0.9}, ...]   landmarks for one person
//! null                                         nobody in frame
//! {"error":"decode failed"}                    inference failure
//! ```

use super::{CameraFacing, CameraProvider, CameraSession, Frame, PoseEstimator, PoseModelLoader};
use crate::config::ModelOptions;
use crate::error::{GestureError, Result, SetupError};
use crate::gesture::PoseLandmarks;
use crate::pipeline::FrameSink;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Poll interval while waiting for a frame buffer to come back
const RELEASE_POLL: Duration = Duration::from_millis(50);

/// Outcome scripted for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// One detected person
    Pose(PoseLandmarks),
    /// Inference fails with this message
    Failure {
        /// Error message reported by the estimator
        error: String,
    },
    /// Nobody in frame (`null`)
    NoPerson,
}

/// Ordered per-frame outcomes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkScript {
    steps: Vec<ScriptStep>,
}

impl LandmarkScript {
    /// Build a script from steps
    pub fn from_steps(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    /// Parse JSON-lines text. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut steps = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let step = serde_json::from_str(line).map_err(|source| GestureError::ScriptError {
                line: index + 1,
                source,
            })?;
            steps.push(step);
        }
        debug!("Parsed landmark script with {} frames", steps.len());
        Ok(Self { steps })
    }

    /// Read and parse a script file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Step for the given frame number
    pub fn get(&self, index: usize) -> Option<&ScriptStep> {
        self.steps.get(index)
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script has no frames
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// All steps in order
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }
}

/// Camera that emits a fixed number of empty numbered frames
#[derive(Debug, Clone)]
pub struct ReplayCamera {
    frame_count: u64,
    interval: Duration,
    facings: Vec<CameraFacing>,
    lockstep: bool,
}

impl ReplayCamera {
    /// Emit `frame_count` frames at `fps`, with both facings available
    pub fn new(frame_count: u64, fps: u32) -> Self {
        Self {
            frame_count,
            interval: Duration::from_secs(1) / fps.max(1),
            facings: vec![CameraFacing::Front, CameraFacing::Back],
            lockstep: false,
        }
    }

    /// One frame per script step
    pub fn for_script(script: &LandmarkScript, fps: u32) -> Self {
        Self::new(script.len() as u64, fps)
    }

    /// Restrict the facings this camera reports as present
    #[must_use]
    pub fn with_facings(mut self, facings: &[CameraFacing]) -> Self {
        self.facings = facings.to_vec();
        self
    }

    /// Hold back each frame until the previous one has been released, like a camera with
    /// a single buffer. Combined with an idle worker this delivers every frame.
    #[must_use]
    pub fn lockstep(mut self) -> Self {
        self.lockstep = true;
        self
    }
}

impl CameraProvider for ReplayCamera {
    fn open(
        &mut self,
        facing: CameraFacing,
        frames: FrameSink,
    ) -> std::result::Result<Box<dyn CameraSession>, SetupError> {
        if !self.facings.contains(&facing) {
            return Err(SetupError::CameraUnavailable(facing));
        }

        let running = Arc::new(AtomicBool::new(true));
        let feed = ReplayFeed {
            frame_count: self.frame_count,
            interval: self.interval,
            lockstep: self.lockstep,
            running: Arc::clone(&running),
            frames,
        };

        let handle = thread::Builder::new()
            .name("replay-camera".to_string())
            .spawn(move || feed.run())
            .map_err(|e| SetupError::CameraInitFailed(Box::new(e)))?;

        debug!("Replay camera opened ({facing})");
        Ok(Box::new(ReplaySession {
            running,
            handle: Some(handle),
        }))
    }
}

struct ReplayFeed {
    frame_count: u64,
    interval: Duration,
    lockstep: bool,
    running: Arc<AtomicBool>,
    frames: FrameSink,
}

impl ReplayFeed {
    fn run(self) {
        let (released_tx, released_rx) = mpsc::channel();

        for sequence in 0..self.frame_count {
            if !self.running.load(Ordering::Acquire) {
                break;
            }

            let released = released_tx.clone();
            let frame = Frame::new(sequence, 1, 1, Vec::new()).with_release(move || {
                let _ = released.send(());
            });
            let admitted = self.frames.deliver(frame);
            trace!("Replay frame {sequence} admitted: {admitted}");

            if self.lockstep {
                self.wait_for_release(&released_rx);
            } else {
                // Drain release notices so the channel does not grow
                while released_rx.try_recv().is_ok() {}
            }
            thread::sleep(self.interval);
        }
        debug!("Replay camera finished");
    }

    fn wait_for_release(&self, released: &mpsc::Receiver<()>) {
        loop {
            match released.recv_timeout(RELEASE_POLL) {
                Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => return,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if !self.running.load(Ordering::Acquire) {
                        return;
                    }
                }
            }
        }
    }
}

struct ReplaySession {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CameraSession for ReplaySession {
    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("Replay camera thread panicked");
        }
    }
}

impl Drop for ReplaySession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Loader handing out estimators over a shared script
#[derive(Debug, Clone)]
pub struct ReplayModelLoader {
    script: Arc<LandmarkScript>,
    check_asset: bool,
}

impl ReplayModelLoader {
    /// Create a loader for the script
    pub fn new(script: Arc<LandmarkScript>) -> Self {
        Self {
            script,
            check_asset: false,
        }
    }

    /// Fail loading unless the configured model asset exists on disk
    #[must_use]
    pub fn with_asset_check(mut self) -> Self {
        self.check_asset = true;
        self
    }
}

impl PoseModelLoader for ReplayModelLoader {
    fn load(
        &mut self,
        options: &ModelOptions,
    ) -> std::result::Result<Box<dyn PoseEstimator>, SetupError> {
        if self.check_asset && !options.asset_path.is_file() {
            return Err(SetupError::ModelAssetMissing(options.asset_path.clone()));
        }
        Ok(Box::new(ReplayEstimator {
            script: Arc::clone(&self.script),
        }))
    }
}

/// Estimator answering each frame from the script
#[derive(Debug, Clone)]
pub struct ReplayEstimator {
    script: Arc<LandmarkScript>,
}

impl PoseEstimator for ReplayEstimator {
    fn detect(&mut self, frame: &Frame) -> Result<Option<PoseLandmarks>> {
        let step = usize::try_from(frame.sequence())
            .ok()
            .and_then(|index| self.script.get(index));

        match step {
            Some(ScriptStep::Pose(landmarks)) => Ok(Some(landmarks.clone())),
            Some(ScriptStep::Failure { error }) => Err(GestureError::frame(error.clone())),
            Some(ScriptStep::NoPerson) | None => Ok(None),
        }
    }
}
