//! Single-flight admission control for camera frames
//!
//! The gate accepts a frame only while the session is running and no other frame is in
//! flight. Everything else is dropped on the spot: for a live gesture signal the newest
//! frame is worth more than a backlog.
//!
//! Acceptance hands out a [`FramePermit`]. The gate stays busy until the permit is
//! dropped, so the release happens exactly once on every exit path, including errors
//! and unwinding.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Lifecycle state of a gesture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionState {
    /// No session; camera and model released
    Stopped,
    /// Frames are admitted and classified
    Running,
    /// Session alive but every frame is rejected
    Paused,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Paused => "paused",
        })
    }
}

/// Admission counters since the gate was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GateStats {
    /// Frames handed a permit
    pub admitted: u64,
    /// Frames dropped at the gate
    pub rejected: u64,
}

#[derive(Debug)]
struct GateState {
    session: SessionState,
    busy: bool,
}

/// Admission controller shared between the camera callback and the frame worker
#[derive(Debug)]
pub struct FrameGate {
    /// Session state and busy flag, checked and set under one lock
    state: Mutex<GateState>,
    admitted: AtomicU64,
    rejected: AtomicU64,
}

impl FrameGate {
    /// Create a gate for a stopped session
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(GateState {
                session: SessionState::Stopped,
                busy: false,
            }),
            admitted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        })
    }

    /// Try to admit a frame.
    ///
    /// Returns a permit when the session is running and nothing is in flight, `None`
    /// otherwise. The caller must hold on to the permit until processing of the frame
    /// has finished.
    pub fn admit(self: &Arc<Self>) -> Option<FramePermit> {
        let mut state = self.state.lock();
        if state.session == SessionState::Running && !state.busy {
            state.busy = true;
            drop(state);
            self.admitted.fetch_add(1, Ordering::Relaxed);
            Some(FramePermit {
                gate: Arc::clone(self),
            })
        } else {
            trace!(
                "Frame rejected (session {}, busy {})",
                state.session, state.busy
            );
            drop(state);
            self.rejected.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    fn release(&self) {
        let mut state = self.state.lock();
        debug_assert!(state.busy, "FramePermit released while gate idle");
        state.busy = false;
    }

    /// Current session state
    pub fn session_state(&self) -> SessionState {
        self.state.lock().session
    }

    /// Whether a frame is currently in flight
    pub fn is_busy(&self) -> bool {
        self.state.lock().busy
    }

    /// Admission counters
    pub fn stats(&self) -> GateStats {
        GateStats {
            admitted: self.admitted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    fn transition(&self, from: &[SessionState], to: SessionState) -> bool {
        let mut state = self.state.lock();
        if from.contains(&state.session) {
            debug!("Session state {} -> {}", state.session, to);
            state.session = to;
            true
        } else {
            false
        }
    }

    /// Stopped → Running. Returns `false` if the session was not stopped.
    pub fn open(&self) -> bool {
        self.transition(&[SessionState::Stopped], SessionState::Running)
    }

    /// Running → Paused. Returns `false` if the session was not running.
    pub fn pause(&self) -> bool {
        self.transition(&[SessionState::Running], SessionState::Paused)
    }

    /// Paused → Running. Returns `false` if the session was not paused.
    pub fn resume(&self) -> bool {
        self.transition(&[SessionState::Paused], SessionState::Running)
    }

    /// Running or Paused → Stopped. Returns `false` if already stopped.
    ///
    /// An in-flight frame keeps its permit; only new frames are refused.
    pub fn close(&self) -> bool {
        self.transition(
            &[SessionState::Running, SessionState::Paused],
            SessionState::Stopped,
        )
    }
}

/// Proof that a frame was admitted; dropping it frees the gate
#[derive(Debug)]
#[must_use = "dropping the permit immediately releases the gate"]
pub struct FramePermit {
    gate: Arc<FrameGate>,
}

impl Drop for FramePermit {
    fn drop(&mut self) {
        self.gate.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_new_gate_rejects() {
        let gate = FrameGate::new();
        assert_eq!(gate.session_state(), SessionState::Stopped);
        assert!(gate.admit().is_none());
        assert_eq!(gate.stats().rejected, 1);
    }

    #[test]
    fn test_single_flight() {
        let gate = FrameGate::new();
        assert!(gate.open());

        let permit = gate.admit().unwrap();
        assert!(gate.is_busy());
        assert!(gate.admit().is_none());
        assert!(gate.admit().is_none());

        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.admit().is_some());

        assert_eq!(
            gate.stats(),
            GateStats {
                admitted: 2,
                rejected: 2
            }
        );
    }

    #[test]
    fn test_pause_rejects_until_resume() {
        let gate = FrameGate::new();
        gate.open();
        assert!(gate.pause());

        for _ in 0..100 {
            assert!(gate.admit().is_none());
        }

        assert!(gate.resume());
        assert!(gate.admit().is_some());
    }

    #[test]
    fn test_transitions_are_idempotent() {
        let gate = FrameGate::new();
        assert!(!gate.pause(), "pause on stopped gate is a no-op");
        assert!(!gate.resume(), "resume on stopped gate is a no-op");
        assert!(!gate.close(), "close on stopped gate is a no-op");

        assert!(gate.open());
        assert!(!gate.open());
        assert!(!gate.resume(), "resume while running is a no-op");

        assert!(gate.pause());
        assert!(!gate.pause());
        assert_eq!(gate.session_state(), SessionState::Paused);

        assert!(gate.close());
        assert_eq!(gate.session_state(), SessionState::Stopped);
    }

    #[test]
    fn test_in_flight_permit_survives_pause() {
        let gate = FrameGate::new();
        gate.open();
        let permit = gate.admit().unwrap();

        gate.pause();
        assert!(gate.is_busy());
        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.admit().is_none());
    }

    #[test]
    fn test_permit_released_on_unwind() {
        let gate = FrameGate::new();
        gate.open();

        let worker_gate = Arc::clone(&gate);
        let result = thread::spawn(move || {
            let _permit = worker_gate.admit().unwrap();
            panic!("inference blew up");
        })
        .join();

        assert!(result.is_err());
        assert!(!gate.is_busy());
        assert!(gate.admit().is_some());
    }

    #[test]
    fn test_concurrent_admit_grants_one_permit() {
        const THREADS: usize = 8;

        let gate = FrameGate::new();
        gate.open();
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    gate.admit()
                })
            })
            .collect();

        let permits: Vec<FramePermit> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(permits.len(), 1);
        assert_eq!(gate.stats().rejected, (THREADS - 1) as u64);
    }

    // Property-based tests using proptest
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy)]
        enum Op {
            Admit,
            Release,
            Pause,
            Resume,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => Just(Op::Admit),
                3 => Just(Op::Release),
                1 => Just(Op::Pause),
                1 => Just(Op::Resume),
            ]
        }

        proptest! {
            /// Property: at most one permit is ever outstanding, and no permit is granted
            /// while paused
            #[test]
            fn at_most_one_outstanding_permit(ops in prop::collection::vec(op(), 1..200)) {
                let gate = FrameGate::new();
                gate.open();
                let mut outstanding: Vec<FramePermit> = Vec::new();

                for op in ops {
                    match op {
                        Op::Admit => {
                            let paused = gate.session_state() == SessionState::Paused;
                            if let Some(permit) = gate.admit() {
                                prop_assert!(!paused);
                                outstanding.push(permit);
                            }
                        }
                        Op::Release => {
                            outstanding.pop();
                        }
                        Op::Pause => {
                            gate.pause();
                        }
                        Op::Resume => {
                            gate.resume();
                        }
                    }
                    prop_assert!(outstanding.len() <= 1);
                    prop_assert_eq!(gate.is_busy(), !outstanding.is_empty());
                }
            }
        }
    }
}
