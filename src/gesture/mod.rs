//! Gesture recognition core
//!
//! Pure building blocks shared by every platform adapter:
//!
//! - `landmarks`: pose landmark types and extraction of the four tracked keypoints
//! - `smoother`: per-keypoint exponential moving average
//! - `classifier`: margin-based arms-up / arms-down classification
//! - `event`: the [`GestureEvent`] record pushed to the application
//!
//! # Algorithm
//!
//! ```text
//! landmarks ──► TrackedKeypoints ──► min visibility < conf_min? ──► UNKNOWN
//!                                         │ no
//!                                         ▼
//!                               SignalSmoother (EMA, α = 0.3)
//!                                         │
//!                                         ▼
//!                          GestureClassifier (margin = 0.05)
//! ```
//!
//! Image coordinates grow downwards, so "above the shoulder" means a smaller Y.

pub mod classifier;
pub mod event;
pub mod landmarks;
pub mod smoother;

pub use classifier::{DEFAULT_MARGIN_Y, Gesture, GestureClassifier};
pub use event::GestureEvent;
pub use landmarks::{KeypointYs, Landmark, PoseLandmarks, TrackedKeypoints};
pub use smoother::{DEFAULT_EMA_ALPHA, SignalSmoother, SmoothingState};
