#![expect(
    clippy::unwrap_used,
    reason = "Test utilities use .unwrap() for brevity"
)]

//! Shared test utilities for unit tests.
//!
//! Only compiled during testing (`#[cfg(test)]`).

use crate::config::manager::HOME_ENV_VAR;
use crate::gesture::landmarks::{
    LEFT_SHOULDER, LEFT_WRIST, Landmark, POSE_LANDMARK_COUNT, PoseLandmarks, RIGHT_SHOULDER,
    RIGHT_WRIST,
};
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes tests that modify `HANGBOARD_GESTURE_HOME`.
static HOME_LOCK: Mutex<()> = Mutex::new(());

/// Create a temporary test directory that is removed when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// RAII guard that points `HANGBOARD_GESTURE_HOME` at a temp directory for one test and
/// restores the previous value when dropped.
///
/// The guard holds `HOME_LOCK` for its whole lifetime, so tests touching the variable run
/// one at a time even under the parallel test runner.
pub struct HomeDirGuard {
    original: Option<std::ffi::OsString>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only environment mutation, serialized through HOME_LOCK"
)]
impl HomeDirGuard {
    /// Set `HANGBOARD_GESTURE_HOME` to the given temp directory.
    pub fn new(temp_dir: &TempDir) -> Self {
        // A previous test panicking while holding the lock leaves nothing to clean up
        let lock = HOME_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let original = std::env::var_os(HOME_ENV_VAR);
        // SAFETY: every writer of this variable holds HOME_LOCK, and no test reads it
        // outside the guard's scope.
        unsafe {
            std::env::set_var(HOME_ENV_VAR, temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only environment mutation, serialized through HOME_LOCK"
)]
impl Drop for HomeDirGuard {
    fn drop(&mut self) {
        // SAFETY: the lock is still held; see `HomeDirGuard::new`.
        match self.original.take() {
            Some(original) => unsafe { std::env::set_var(HOME_ENV_VAR, original) },
            None => unsafe { std::env::remove_var(HOME_ENV_VAR) },
        }
    }
}

/// Full 33-point pose with shoulders at `shoulders.{0,1}` and wrists at `wrists.{0,1}`
/// (left, right), every landmark at the given visibility.
pub fn pose_with(shoulders: (f32, f32), wrists: (f32, f32), visibility: f32) -> PoseLandmarks {
    let mut landmarks: PoseLandmarks = (0..POSE_LANDMARK_COUNT)
        .map(|_| Landmark::new(0.5, 0.5, visibility))
        .collect();
    landmarks[LEFT_SHOULDER].y = shoulders.0;
    landmarks[RIGHT_SHOULDER].y = shoulders.1;
    landmarks[LEFT_WRIST].y = wrists.0;
    landmarks[RIGHT_WRIST].y = wrists.1;
    landmarks
}

/// Serialize a pose as one line of a landmark script.
pub fn script_line(landmarks: &[Landmark]) -> String {
    serde_json::to_string(landmarks).unwrap()
}
