//! Host control surface
//!
//! Hosts drive gesture detection through two named channels:
//! - [`METHOD_CHANNEL`]: request/response calls (`start`, `stop`, `pause`, `resume`)
//! - [`EVENT_CHANNEL`]: a stream of [`GestureEvent`](crate::gesture::GestureEvent)s that
//!   the host may listen to or cancel at any time
//!
//! [`PoseChannel`] dispatches [`MethodCall`]s to a [`Pipeline`](crate::pipeline::Pipeline)
//! and maps host lifecycle callbacks onto it.

pub mod channel;

use serde::{Deserialize, Serialize};

pub use channel::{EventStream, PoseChannel};

/// Name of the method channel
pub const METHOD_CHANNEL: &str = "com.hangboard.auto_timer/pose";

/// Name of the event channel
pub const EVENT_CHANNEL: &str = "com.hangboard.auto_timer/pose_events";

/// Error code returned when a session cannot be started
pub const CAMERA_ERROR: &str = "CAMERA_ERROR";

/// Error code returned for a payload that is not a method call
pub const INVALID_CALL: &str = "INVALID_CALL";

/// A method invocation from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Method name
    pub method: String,
    /// Method arguments, usually a JSON object
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub arguments: serde_json::Value,
}

impl MethodCall {
    /// Create a call without arguments
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: serde_json::Value::Null,
        }
    }

    /// Attach arguments
    #[must_use]
    pub fn with_arguments(mut self, arguments: serde_json::Value) -> Self {
        self.arguments = arguments;
        self
    }

    /// The `frontCamera` argument; `true` when missing or not a boolean
    pub fn front_camera(&self) -> bool {
        self.arguments
            .get("frontCamera")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true)
    }
}

/// Result of a method call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
    /// The call completed
    Success,
    /// The call failed
    Error {
        /// Machine-readable error code
        code: String,
        /// Human-readable description
        message: String,
    },
    /// The method is not handled by this channel
    NotImplemented,
}

impl MethodResponse {
    /// Build an error response
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Whether the call completed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_front_camera_defaults_to_true() {
        assert!(MethodCall::new("start").front_camera());
        assert!(
            MethodCall::new("start")
                .with_arguments(json!({"frontCamera": "no"}))
                .front_camera()
        );
        assert!(
            !MethodCall::new("start")
                .with_arguments(json!({"frontCamera": false}))
                .front_camera()
        );
    }

    #[test]
    fn test_method_call_without_arguments_deserializes() {
        let call: MethodCall = serde_json::from_str(r#"{"method":"stop"}"#).unwrap();
        assert_eq!(call, MethodCall::new("stop"));
        assert_eq!(serde_json::to_string(&call).unwrap(), r#"{"method":"stop"}"#);
    }

    #[test]
    fn test_response_wire_form() {
        assert_eq!(
            serde_json::to_value(MethodResponse::Success).unwrap(),
            json!({"status": "success"})
        );
        assert_eq!(
            serde_json::to_value(MethodResponse::NotImplemented).unwrap(),
            json!({"status": "notImplemented"})
        );
        assert_eq!(
            serde_json::to_value(MethodResponse::error(CAMERA_ERROR, "No back camera available"))
                .unwrap(),
            json!({"status": "error", "code": "CAMERA_ERROR", "message": "No back camera available"})
        );
    }
}
