//! Channel endpoints at the pipeline boundary
//!
//! - [`FrameSink`]: handed to the camera; pushes admitted frames to the worker
//! - [`EventSink`]: receives gesture events from the worker

use super::frame_gate::{FrameGate, FramePermit};
use crate::gesture::GestureEvent;
use crate::source::Frame;
use std::sync::{Arc, mpsc};
use tracing::{trace, warn};

/// Message consumed by the frame worker
pub(crate) enum WorkerMessage {
    /// Admitted frame together with its gate permit
    Frame(Frame, FramePermit),
    /// Finish and drop the pose estimator
    Shutdown,
}

/// Entry point for camera callbacks
///
/// Cloneable and callable from any thread. Each call runs the gate's admission check;
/// rejected frames are dropped immediately, which runs their release hook.
#[derive(Clone)]
pub struct FrameSink {
    gate: Arc<FrameGate>,
    frames: mpsc::SyncSender<WorkerMessage>,
}

impl FrameSink {
    pub(crate) fn new(gate: Arc<FrameGate>, frames: mpsc::SyncSender<WorkerMessage>) -> Self {
        Self { gate, frames }
    }

    /// Offer a frame to the pipeline. Returns whether it was admitted.
    pub fn deliver(&self, frame: Frame) -> bool {
        let Some(permit) = self.gate.admit() else {
            return false;
        };

        trace!("Admitted frame {}", frame.sequence());
        // Single-flight admission keeps at most one frame in the channel, so a full
        // channel only happens if the worker has already gone away.
        match self.frames.try_send(WorkerMessage::Frame(frame, permit)) {
            Ok(()) => true,
            Err(mpsc::TrySendError::Full(_) | mpsc::TrySendError::Disconnected(_)) => {
                warn!("Frame worker unavailable, dropping admitted frame");
                false
            }
        }
    }
}

/// Consumer of gesture events
pub trait EventSink: Send + 'static {
    /// Deliver one event. Returns `false` once the consumer has gone away.
    fn send_event(&self, event: GestureEvent) -> bool;
}

impl EventSink for mpsc::Sender<GestureEvent> {
    fn send_event(&self, event: GestureEvent) -> bool {
        self.send(event).is_ok()
    }
}

impl EventSink for mpsc::SyncSender<GestureEvent> {
    /// Never blocks the worker: a full channel drops the event.
    fn send_event(&self, event: GestureEvent) -> bool {
        match self.try_send(event) {
            Ok(()) => true,
            Err(mpsc::TrySendError::Full(event)) => {
                warn!(
                    "Event channel full, dropping {} event at {}ms",
                    event.gesture, event.timestamp_ms
                );
                true
            }
            Err(mpsc::TrySendError::Disconnected(_)) => false,
        }
    }
}
