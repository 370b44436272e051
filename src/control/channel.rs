//! Method dispatch and event stream for a host application

use super::{CAMERA_ERROR, INVALID_CALL, MethodCall, MethodResponse};
use crate::gesture::GestureEvent;
use crate::pipeline::{EventSink, Pipeline};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Event channel endpoint
///
/// The pipeline always sends into the stream; events are forwarded to the current
/// listener and silently dropped while nobody listens. Clones share the listener slot.
#[derive(Clone, Default)]
pub struct EventStream {
    listener: Arc<Mutex<Option<Box<dyn EventSink>>>>,
}

impl EventStream {
    /// Create a stream with no listener
    pub fn new() -> Self {
        Self::default()
    }

    /// Route events to `listener`, replacing any previous one
    pub fn listen(&self, listener: impl EventSink) {
        *self.listener.lock() = Some(Box::new(listener));
        debug!("Event stream listener attached");
    }

    /// Detach the current listener
    pub fn cancel(&self) {
        if self.listener.lock().take().is_some() {
            debug!("Event stream listener cancelled");
        }
    }

    /// Whether a listener is attached
    pub fn has_listener(&self) -> bool {
        self.listener.lock().is_some()
    }
}

impl EventSink for EventStream {
    fn send_event(&self, event: GestureEvent) -> bool {
        let mut listener = self.listener.lock();
        if let Some(sink) = listener.as_ref()
            && !sink.send_event(event)
        {
            debug!("Event stream listener went away");
            *listener = None;
        }
        // The stream outlives its listeners
        true
    }
}

/// Dispatcher for the pose method channel
pub struct PoseChannel {
    pipeline: Pipeline,
    events: EventStream,
}

impl PoseChannel {
    /// Serve calls for `pipeline`
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            events: EventStream::new(),
        }
    }

    /// The event channel endpoint
    pub fn events(&self) -> &EventStream {
        &self.events
    }

    /// The controlled pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Dispatch one call
    pub fn handle(&mut self, call: &MethodCall) -> MethodResponse {
        debug!("Method call: {}", call.method);
        match call.method.as_str() {
            "start" => match self.pipeline.start(call.front_camera(), self.events.clone()) {
                Ok(()) => MethodResponse::Success,
                Err(e) => {
                    warn!("start failed: {e}");
                    MethodResponse::error(CAMERA_ERROR, e.to_string())
                }
            },
            "stop" => {
                self.pipeline.stop();
                MethodResponse::Success
            }
            "pause" => {
                self.pipeline.pause();
                MethodResponse::Success
            }
            "resume" => {
                self.pipeline.resume();
                MethodResponse::Success
            }
            other => {
                debug!("Method {other} not implemented");
                MethodResponse::NotImplemented
            }
        }
    }

    /// Decode a JSON method call and dispatch it
    pub fn handle_json(&mut self, payload: &str) -> MethodResponse {
        match serde_json::from_str::<MethodCall>(payload) {
            Ok(call) => self.handle(&call),
            Err(e) => {
                warn!("Rejected malformed method call: {e}");
                MethodResponse::error(INVALID_CALL, e.to_string())
            }
        }
    }

    /// The host app went to the background
    pub fn on_host_pause(&mut self) {
        info!("Host paused");
        self.pipeline.pause();
    }

    /// The host app came back to the foreground
    pub fn on_host_resume(&mut self) {
        info!("Host resumed");
        self.pipeline.resume();
    }

    /// The host is being torn down
    pub fn on_host_destroy(&mut self) {
        info!("Host destroyed");
        self.pipeline.stop();
        self.events.cancel();
    }
}
