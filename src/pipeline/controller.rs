//! Pipeline implementation
//!
//! Owns the session lifecycle, the camera and model handles, and the frame worker thread.

use super::frame_gate::{FrameGate, GateStats, SessionState};
use super::processor::FrameProcessor;
use super::sink::{EventSink, FrameSink, WorkerMessage};
use crate::config::DetectorConfig;
use crate::error::{GestureError, Result, StringError};
use crate::gesture::{GestureEvent, SmoothingState};
use crate::source::{CameraFacing, CameraProvider, CameraSession, Frame, PoseEstimator, PoseModelLoader};
use parking_lot::Mutex;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

/// Millisecond clock anchored at pipeline construction
#[derive(Debug, Clone, Copy)]
struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    fn now_ms(self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Worker-side counters
#[derive(Debug, Default)]
struct WorkerCounters {
    processed: AtomicU64,
    failed: AtomicU64,
}

/// Frame counters since the pipeline was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PipelineStats {
    /// Frames admitted by the gate
    pub admitted: u64,
    /// Frames dropped at the gate
    pub rejected: u64,
    /// Admitted frames that produced an event
    pub processed: u64,
    /// Admitted frames dropped because processing failed
    pub failed: u64,
}

/// Resources held while a session is running or paused
struct ActiveSession {
    id: Uuid,
    camera: Box<dyn CameraSession>,
    worker: JoinHandle<()>,
    worker_tx: mpsc::SyncSender<WorkerMessage>,
}

/// Gesture recognition pipeline
///
/// ```text
/// camera thread ──► FrameSink ──► FrameGate ──► gesture-worker ──► EventSink
///                                    │              │
///                               reject/drop    PoseEstimator + FrameProcessor
/// ```
///
/// State machine: `Stopped → Running ⇄ Paused → Stopped`. A stopped pipeline can be
/// started again. Dropping the pipeline stops it.
pub struct Pipeline {
    config: DetectorConfig,
    camera: Box<dyn CameraProvider>,
    model_loader: Box<dyn PoseModelLoader>,
    gate: Arc<FrameGate>,
    processor: Arc<Mutex<FrameProcessor>>,
    counters: Arc<WorkerCounters>,
    clock: MonotonicClock,
    session: Option<ActiveSession>,
}

impl Pipeline {
    /// Create a stopped pipeline around the given collaborators
    pub fn new(
        config: DetectorConfig,
        camera: Box<dyn CameraProvider>,
        model_loader: Box<dyn PoseModelLoader>,
    ) -> Result<Self> {
        config.validate()?;
        let processor = FrameProcessor::new(&config.gesture);

        Ok(Self {
            config,
            camera,
            model_loader,
            gate: FrameGate::new(),
            processor: Arc::new(Mutex::new(processor)),
            counters: Arc::new(WorkerCounters::default()),
            clock: MonotonicClock::new(),
            session: None,
        })
    }

    /// Start a session.
    ///
    /// Loads the pose model, opens the camera with the requested facing and begins
    /// emitting events into `events`. On failure everything acquired so far is released
    /// and the pipeline stays stopped. Calling `start` on a session that is already
    /// running or paused does nothing.
    pub fn start(&mut self, front_camera: bool, events: impl EventSink) -> Result<()> {
        if let Some(session) = &self.session {
            warn!(
                "start() called while session {} is {}; ignored",
                session.id,
                self.state()
            );
            return Ok(());
        }

        let facing = CameraFacing::from_front_flag(front_camera);
        let session_id = Uuid::new_v4();
        let span = info_span!("gesture_session", %session_id);
        let _enter = span.enter();
        info!("Starting gesture session with {} camera", facing);

        self.processor.lock().reset();

        let estimator = self.model_loader.load(&self.config.model).map_err(|e| {
            error!("Pose model initialization failed: {e}");
            GestureError::Setup(e)
        })?;
        debug!("Pose model loaded from {}", self.config.model.asset_path.display());

        let (worker_tx, worker_rx) = mpsc::sync_channel(1);
        let worker = self.spawn_worker(session_id, estimator, worker_rx, Box::new(events))?;

        // Cameras may push frames from inside open(), so admission starts first
        self.gate.open();
        let frames = FrameSink::new(Arc::clone(&self.gate), worker_tx.clone());
        let camera = match self.camera.open(facing, frames) {
            Ok(camera) => camera,
            Err(e) => {
                error!("Camera setup failed: {e}");
                self.gate.close();
                shutdown_worker(&worker_tx, worker);
                self.processor.lock().reset();
                return Err(GestureError::Setup(e));
            }
        };

        self.session = Some(ActiveSession {
            id: session_id,
            camera,
            worker,
            worker_tx,
        });
        info!("Gesture session running");
        Ok(())
    }

    fn spawn_worker(
        &self,
        session_id: Uuid,
        estimator: Box<dyn PoseEstimator>,
        frames: mpsc::Receiver<WorkerMessage>,
        events: Box<dyn EventSink>,
    ) -> Result<JoinHandle<()>> {
        let worker = FrameWorker {
            estimator,
            processor: Arc::clone(&self.processor),
            counters: Arc::clone(&self.counters),
            clock: self.clock,
            events,
        };

        let handle = thread::Builder::new()
            .name("gesture-worker".to_string())
            .spawn(move || {
                let span = info_span!("gesture_session", %session_id);
                let _enter = span.enter();
                worker.run(&frames);
            })?;
        Ok(handle)
    }

    /// Stop admitting frames until [`resume`](Self::resume). The frame in flight, if
    /// any, still completes. No-op unless running.
    pub fn pause(&mut self) {
        if self.gate.pause() {
            info!("Gesture session paused");
        } else {
            debug!("pause() ignored while {}", self.state());
        }
    }

    /// Resume admitting frames. Smoothing continues from the last values seen before the
    /// pause. No-op unless paused.
    pub fn resume(&mut self) {
        if self.gate.resume() {
            info!("Gesture session resumed");
        } else {
            debug!("resume() ignored while {}", self.state());
        }
    }

    /// End the session.
    ///
    /// New frames are refused immediately. The camera is stopped, the in-flight frame (if
    /// any) is allowed to finish, then the pose model is released and smoothing state is
    /// cleared. No-op when already stopped.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            debug!("stop() ignored, pipeline already stopped");
            return;
        };

        let span = info_span!("gesture_session", session_id = %session.id);
        let _enter = span.enter();

        self.gate.close();

        let ActiveSession {
            mut camera,
            worker,
            worker_tx,
            ..
        } = session;
        camera.stop();
        drop(camera);
        shutdown_worker(&worker_tx, worker);

        self.processor.lock().reset();
        info!("Gesture session stopped");
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.gate.session_state()
    }

    /// Identifier of the current session, if one is active
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Snapshot of the smoothing state
    pub fn smoothing_state(&self) -> SmoothingState {
        self.processor.lock().smoothing_state()
    }

    /// Frame counters
    pub fn stats(&self) -> PipelineStats {
        let GateStats { admitted, rejected } = self.gate.stats();
        PipelineStats {
            admitted,
            rejected,
            processed: self.counters.processed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Configuration the pipeline was built with
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ask the worker to exit and wait for it; the estimator is dropped on the worker thread
fn shutdown_worker(worker_tx: &mpsc::SyncSender<WorkerMessage>, worker: JoinHandle<()>) {
    // Blocks only while an admitted frame is still queued; fails if the worker is gone
    if worker_tx.send(WorkerMessage::Shutdown).is_err() {
        debug!("Frame worker already exited");
    }
    if worker.join().is_err() {
        error!("Frame worker thread panicked");
    }
}

/// State moved onto the worker thread
struct FrameWorker {
    estimator: Box<dyn PoseEstimator>,
    processor: Arc<Mutex<FrameProcessor>>,
    counters: Arc<WorkerCounters>,
    clock: MonotonicClock,
    events: Box<dyn EventSink>,
}

impl FrameWorker {
    fn run(mut self, frames: &mpsc::Receiver<WorkerMessage>) {
        debug!("Frame worker started");
        while let Ok(message) = frames.recv() {
            let (frame, permit) = match message {
                WorkerMessage::Frame(frame, permit) => (frame, permit),
                WorkerMessage::Shutdown => break,
            };

            match self.process(&frame) {
                Ok(event) => {
                    self.counters.processed.fetch_add(1, Ordering::Relaxed);
                    if !self.events.send_event(event) {
                        warn!("Event consumer disconnected, dropping {} event", event.gesture);
                    }
                }
                Err(e) => {
                    self.counters.failed.fetch_add(1, Ordering::Relaxed);
                    error!("Dropping frame {}: {e}", frame.sequence());
                }
            }

            // Gate first: a camera waiting on the buffer may deliver again right away
            drop(permit);
            drop(frame);
        }
        debug!("Frame worker exiting, releasing pose model");
    }

    fn process(&mut self, frame: &Frame) -> Result<GestureEvent> {
        let estimator = &mut self.estimator;
        let detection = panic::catch_unwind(AssertUnwindSafe(|| estimator.detect(frame)))
            .map_err(|_| {
                GestureError::FrameProcessing(StringError::new("pose estimator panicked"))
            })?
            .map_err(|e| match e {
                e @ GestureError::FrameProcessing(_) => e,
                other => GestureError::FrameProcessing(Box::new(other)),
            })?;

        let timestamp_ms = self.clock.now_ms();
        Ok(self
            .processor
            .lock()
            .process(detection.as_deref(), timestamp_ms))
    }
}
