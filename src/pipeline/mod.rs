//! Session orchestration
//!
//! This module wires the camera, the pose estimator and the gesture core into a running
//! session:
//! - [`FrameGate`]: single-flight admission, gated on the session state
//! - [`FrameProcessor`]: confidence gate, smoothing and classification for one frame
//! - [`Pipeline`]: lifecycle (`start`/`pause`/`resume`/`stop`) and the frame worker
//!
//! Camera callbacks may arrive on any thread. Inference and classification happen on a
//! dedicated `gesture-worker` thread, so at most one frame is being processed at a time
//! and events come out in frame order.

mod controller;
pub mod frame_gate;
pub mod processor;
pub mod sink;

pub use controller::{Pipeline, PipelineStats};
pub use frame_gate::{FrameGate, FramePermit, GateStats, SessionState};
pub use processor::FrameProcessor;
pub use sink::{EventSink, FrameSink};
