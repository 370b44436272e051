//! Per-frame gesture core
//!
//! Turns one frame's landmark set (or the absence of one) into a [`GestureEvent`]. This
//! is the piece platform adapters call when they already run their own camera and model
//! loop; the threaded [`Pipeline`](super::Pipeline) drives it from its worker.

use crate::config::GestureThresholds;
use crate::gesture::{
    GestureClassifier, GestureEvent, Landmark, SignalSmoother, SmoothingState, TrackedKeypoints,
};
use tracing::trace;

/// Confidence gate, smoother and classifier for one session
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    conf_min: f32,
    smoother: SignalSmoother,
    classifier: GestureClassifier,
}

impl FrameProcessor {
    /// Create a processor with empty smoothing state
    pub fn new(thresholds: &GestureThresholds) -> Self {
        Self {
            conf_min: thresholds.conf_min,
            smoother: SignalSmoother::new(thresholds.ema_alpha),
            classifier: GestureClassifier::new(thresholds.margin_y),
        }
    }

    /// Classify one frame.
    ///
    /// - No person, or a landmark set missing a tracked index: `UNKNOWN` without
    ///   confidence. The event is still produced so the consumer can tell "no signal"
    ///   apart from "arms down".
    /// - Minimum keypoint visibility below `conf_min`: `UNKNOWN` without confidence and
    ///   the smoother is left untouched.
    /// - Otherwise the raw Y values are smoothed and classified, with the minimum
    ///   visibility reported as confidence.
    pub fn process(&mut self, landmarks: Option<&[Landmark]>, timestamp_ms: u64) -> GestureEvent {
        let Some(keypoints) = landmarks.and_then(TrackedKeypoints::from_landmarks) else {
            trace!("No person detected");
            return GestureEvent::unknown(timestamp_ms);
        };

        let min_visibility = keypoints.min_visibility();
        if min_visibility < self.conf_min {
            trace!("Keypoint visibility {min_visibility:.3} below gate");
            return GestureEvent::unknown(timestamp_ms);
        }

        let smoothed = self.smoother.update(keypoints.ys());
        let gesture = self.classifier.classify(&smoothed);
        trace!("Classified {gesture} at visibility {min_visibility:.3}");

        GestureEvent::classified(timestamp_ms, gesture, min_visibility)
    }

    /// Clear smoothing state
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    /// Snapshot of the smoothing state
    pub fn smoothing_state(&self) -> SmoothingState {
        self.smoother.state()
    }
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self::new(&GestureThresholds::default())
    }
}
