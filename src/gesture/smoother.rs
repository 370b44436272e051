//! Exponential moving average over the tracked keypoint Y coordinates
//!
//! Each keypoint is smoothed independently. The first sample after a reset is taken as-is
//! so the classifier sees no start-up lag.

use super::landmarks::KeypointYs;

/// Default EMA weight given to the newest sample
pub const DEFAULT_EMA_ALPHA: f32 = 0.3;

/// One EMA step.
///
/// Returns `current` when there is no previous value, otherwise
/// `alpha * current + (1 - alpha) * previous`.
pub fn ema(previous: Option<f32>, current: f32, alpha: f32) -> f32 {
    match previous {
        None => current,
        Some(prev) => alpha * current + (1.0 - alpha) * prev,
    }
}

/// Last smoothed value per keypoint, `None` until the first valid frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothingState {
    /// Smoothed left shoulder Y
    pub left_shoulder_y: Option<f32>,
    /// Smoothed right shoulder Y
    pub right_shoulder_y: Option<f32>,
    /// Smoothed left wrist Y
    pub left_wrist_y: Option<f32>,
    /// Smoothed right wrist Y
    pub right_wrist_y: Option<f32>,
}

impl SmoothingState {
    /// Whether no sample has been observed since the last reset
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Stateful smoother for the four keypoint Y values
#[derive(Debug, Clone)]
pub struct SignalSmoother {
    alpha: f32,
    state: SmoothingState,
}

impl SignalSmoother {
    /// Create a smoother with the given EMA weight
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            state: SmoothingState::default(),
        }
    }

    /// Feed one frame of raw Y values and return the smoothed values
    pub fn update(&mut self, raw: KeypointYs) -> KeypointYs {
        let smoothed = KeypointYs {
            left_shoulder: ema(self.state.left_shoulder_y, raw.left_shoulder, self.alpha),
            right_shoulder: ema(self.state.right_shoulder_y, raw.right_shoulder, self.alpha),
            left_wrist: ema(self.state.left_wrist_y, raw.left_wrist, self.alpha),
            right_wrist: ema(self.state.right_wrist_y, raw.right_wrist, self.alpha),
        };

        self.state = SmoothingState {
            left_shoulder_y: Some(smoothed.left_shoulder),
            right_shoulder_y: Some(smoothed.right_shoulder),
            left_wrist_y: Some(smoothed.left_wrist),
            right_wrist_y: Some(smoothed.right_wrist),
        };

        smoothed
    }

    /// Forget all smoothed values
    pub fn reset(&mut self) {
        self.state = SmoothingState::default();
    }

    /// Snapshot of the current smoothing state
    pub fn state(&self) -> SmoothingState {
        self.state
    }

    /// EMA weight in use
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Default for SignalSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_EMA_ALPHA)
    }
}
