//! Pose landmarks and the four keypoints the classifier tracks
//!
//! Landmark indices follow the 33-point single-person pose model: 11/12 are the left and
//! right shoulders, 15/16 the left and right wrists. Coordinates are normalized to the
//! image, with smaller Y meaning higher in the frame.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Left shoulder landmark index
pub const LEFT_SHOULDER: usize = 11;
/// Right shoulder landmark index
pub const RIGHT_SHOULDER: usize = 12;
/// Left wrist landmark index
pub const LEFT_WRIST: usize = 15;
/// Right wrist landmark index
pub const RIGHT_WRIST: usize = 16;

/// Number of landmarks produced by the full-body pose model
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Landmark set for one detected person, inline for the full 33-point model
pub type PoseLandmarks = SmallVec<[Landmark; POSE_LANDMARK_COUNT]>;

/// A single body keypoint as reported by the pose model
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized horizontal position
    pub x: f32,
    /// Normalized vertical position (0 = top of frame)
    pub y: f32,
    /// Relative depth
    #[serde(default)]
    pub z: f32,
    /// Confidence that the keypoint is visible, in `[0, 1]`.
    /// Models that omit it are treated as zero visibility.
    #[serde(default)]
    pub visibility: f32,
}

impl Landmark {
    /// Create a landmark at `(x, y)` with zero depth
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility,
        }
    }
}

/// Vertical positions of the four tracked keypoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeypointYs {
    /// Left shoulder Y
    pub left_shoulder: f32,
    /// Right shoulder Y
    pub right_shoulder: f32,
    /// Left wrist Y
    pub left_wrist: f32,
    /// Right wrist Y
    pub right_wrist: f32,
}

impl KeypointYs {
    /// Swap left and right sides
    pub fn mirrored(self) -> Self {
        Self {
            left_shoulder: self.right_shoulder,
            right_shoulder: self.left_shoulder,
            left_wrist: self.right_wrist,
            right_wrist: self.left_wrist,
        }
    }
}

/// Shoulders and wrists extracted from a full landmark set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedKeypoints {
    /// Landmark 11
    pub left_shoulder: Landmark,
    /// Landmark 12
    pub right_shoulder: Landmark,
    /// Landmark 15
    pub left_wrist: Landmark,
    /// Landmark 16
    pub right_wrist: Landmark,
}

impl TrackedKeypoints {
    /// Pick the tracked keypoints out of a landmark set.
    ///
    /// Returns `None` when the set is too short to contain every tracked index, which the
    /// pipeline treats the same as "no person detected".
    pub fn from_landmarks(landmarks: &[Landmark]) -> Option<Self> {
        Some(Self {
            left_shoulder: *landmarks.get(LEFT_SHOULDER)?,
            right_shoulder: *landmarks.get(RIGHT_SHOULDER)?,
            left_wrist: *landmarks.get(LEFT_WRIST)?,
            right_wrist: *landmarks.get(RIGHT_WRIST)?,
        })
    }

    /// Lowest visibility across the four keypoints. A non-finite visibility counts as
    /// 0.0, the same as an absent one.
    pub fn min_visibility(&self) -> f32 {
        [
            self.left_shoulder,
            self.right_shoulder,
            self.left_wrist,
            self.right_wrist,
        ]
        .iter()
        .map(|landmark| {
            if landmark.visibility.is_finite() {
                landmark.visibility
            } else {
                0.0
            }
        })
        .fold(f32::INFINITY, f32::min)
    }

    /// Raw Y coordinates of the four keypoints
    pub fn ys(&self) -> KeypointYs {
        KeypointYs {
            left_shoulder: self.left_shoulder.y,
            right_shoulder: self.right_shoulder.y,
            left_wrist: self.left_wrist.y,
            right_wrist: self.right_wrist.y,
        }
    }
}
