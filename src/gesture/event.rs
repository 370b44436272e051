//! Gesture events pushed to the application layer

use super::classifier::Gesture;
use serde::{Deserialize, Serialize};

/// One classified frame, delivered to the event sink and then discarded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureEvent {
    /// Milliseconds on the pipeline's monotonic clock
    #[serde(alias = "tMs")]
    pub timestamp_ms: u64,
    /// Gesture label for the frame
    pub gesture: Gesture,
    /// Minimum visibility of the tracked keypoints; absent when no classification
    /// was attempted (nobody in frame or keypoints below the confidence gate)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl GestureEvent {
    /// Event for a frame that could not be classified
    pub fn unknown(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            gesture: Gesture::Unknown,
            confidence: None,
        }
    }

    /// Event for a classified frame
    pub fn classified(timestamp_ms: u64, gesture: Gesture, confidence: f32) -> Self {
        Self {
            timestamp_ms,
            gesture,
            confidence: Some(confidence),
        }
    }

    /// Whether the frame carried a usable signal
    pub fn has_signal(&self) -> bool {
        self.confidence.is_some()
    }
}
