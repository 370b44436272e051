//! `hangboard-gesture` - Arms-up / arms-down detection for a hangboard timer
//!
//! Turns a live camera feed into a stream of gesture events: the climber raises both
//! wrists above the shoulders to start the timer and lowers them to stop it. Pose
//! inference is delegated to a platform model behind the [`source`] traits; this crate
//! owns everything around it.
//!
//! - [`gesture`]: keypoint extraction, EMA smoothing and the arms-up/arms-down classifier
//! - [`pipeline`]: frame admission, the frame worker and the session lifecycle
//! - [`control`]: method-channel dispatch and host lifecycle hooks
//! - [`config`]: thresholds and model options, persisted as JSON
//!
//! # Example
//!
//! ```no_run
//! use hangboard_gesture::config::DetectorConfig;
//! use hangboard_gesture::pipeline::Pipeline;
//! use hangboard_gesture::source::{LandmarkScript, ReplayCamera, ReplayModelLoader};
//! use std::sync::{Arc, mpsc};
//!
//! # fn main() -> hangboard_gesture::Result<()> {
//! let script = Arc::new(LandmarkScript::load("session.jsonl".as_ref())?);
//! let camera = ReplayCamera::for_script(&script, 30);
//! let loader = ReplayModelLoader::new(Arc::clone(&script));
//!
//! let mut pipeline = Pipeline::new(DetectorConfig::default(), Box::new(camera), Box::new(loader))?;
//! let (events_tx, events) = mpsc::channel();
//! pipeline.start(true, events_tx)?;
//! for event in events.iter().take(10) {
//!     println!("{} {}", event.timestamp_ms, event.gesture);
//! }
//! pipeline.stop();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod gesture;
pub mod pipeline;
pub mod source;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use error::{GestureError, Result};
