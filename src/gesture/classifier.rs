//! Threshold classifier for the arms-up / arms-down gesture
//!
//! Both wrists have to clear their shoulder by more than the margin, in the same
//! direction, before a gesture is reported. A single raised arm is `Unknown`, so
//! one-handed adjustments on the hangboard never trigger the timer.

use super::landmarks::KeypointYs;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default dead zone around the shoulder line, in normalized image units
pub const DEFAULT_MARGIN_Y: f32 = 0.05;

/// Gesture label for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gesture {
    /// Both wrists above their shoulders
    ArmsUp,
    /// Both wrists below their shoulders
    ArmsDown,
    /// Ambiguous pose, low confidence or nobody in frame
    Unknown,
}

impl Gesture {
    /// Wire name of the gesture
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArmsUp => "ARMS_UP",
            Self::ArmsDown => "ARMS_DOWN",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless gesture classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureClassifier {
    margin: f32,
}

impl GestureClassifier {
    /// Create a classifier with the given margin
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    /// Classify smoothed keypoint positions
    pub fn classify(&self, ys: &KeypointYs) -> Gesture {
        let arms_up = ys.left_wrist < ys.left_shoulder - self.margin
            && ys.right_wrist < ys.right_shoulder - self.margin;

        let arms_down = ys.left_wrist > ys.left_shoulder + self.margin
            && ys.right_wrist > ys.right_shoulder + self.margin;

        if arms_up {
            Gesture::ArmsUp
        } else if arms_down {
            Gesture::ArmsDown
        } else {
            Gesture::Unknown
        }
    }

    /// Margin in use
    pub fn margin(&self) -> f32 {
        self.margin
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN_Y)
    }
}
