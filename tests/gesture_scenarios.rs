//! Gesture scenarios through the per-frame core
//!
//! Feeds parsed landmark scripts straight into `FrameProcessor`, without threads, so the
//! exact event sequence of a climbing set can be asserted.

use hangboard_gesture::{
    config::GestureThresholds,
    gesture::{Gesture, GestureEvent, Landmark},
    pipeline::FrameProcessor,
    source::{LandmarkScript, ScriptStep},
};
use std::fmt::Write as _;

/// One script line with both shoulders at 0.40 and both wrists at `wrist_y`
fn line(wrist_y: f32, visibility: f32) -> String {
    let landmarks: Vec<Landmark> = (0..33)
        .map(|index| {
            let y = match index {
                11 | 12 => 0.40,
                15 | 16 => wrist_y,
                _ => 0.5,
            };
            Landmark::new(0.5, y, visibility)
        })
        .collect();
    serde_json::to_string(&landmarks).unwrap()
}

fn run(script: &LandmarkScript, thresholds: &GestureThresholds) -> Vec<GestureEvent> {
    let mut processor = FrameProcessor::new(thresholds);
    script
        .steps()
        .iter()
        .zip(0u64..)
        .filter_map(|(step, index)| {
            let timestamp_ms = index * 33;
            match step {
                ScriptStep::Pose(landmarks) => {
                    Some(processor.process(Some(landmarks.as_slice()), timestamp_ms))
                }
                ScriptStep::NoPerson => Some(processor.process(None, timestamp_ms)),
                // Failed frames never reach the processor
                ScriptStep::Failure { .. } => None,
            }
        })
        .collect()
}

/// Collapse consecutive duplicates
fn transitions(events: &[GestureEvent]) -> Vec<Gesture> {
    let mut out: Vec<Gesture> = Vec::new();
    for event in events {
        if out.last() != Some(&event.gesture) {
            out.push(event.gesture);
        }
    }
    out
}

/// Test a full hang: step in, raise arms, hold, drop off the board, walk away
#[test]
fn test_full_hang_set() {
    let mut text = String::from("# climber steps in\nnull\nnull\n");
    for _ in 0..5 {
        writeln!(text, "{}", line(0.70, 0.9)).unwrap();
    }
    text.push_str("# grabs the board\n");
    for _ in 0..15 {
        writeln!(text, "{}", line(0.10, 0.95)).unwrap();
    }
    text.push_str("# lets go\n");
    for _ in 0..10 {
        writeln!(text, "{}", line(0.75, 0.8)).unwrap();
    }
    text.push_str("null\n");

    let script = LandmarkScript::parse(&text).unwrap();
    let events = run(&script, &GestureThresholds::default());

    assert_eq!(events.len(), script.len());
    assert_eq!(
        transitions(&events),
        vec![
            Gesture::Unknown,
            Gesture::ArmsDown,
            Gesture::Unknown,
            Gesture::ArmsUp,
            Gesture::Unknown,
            Gesture::ArmsDown,
            Gesture::Unknown,
        ]
    );
    assert_eq!(events.last().unwrap().confidence, None);
}

/// Test that a burst of occluded frames does not break an ongoing hang
#[test]
fn test_occlusion_does_not_disturb_smoothing() {
    let mut text = String::new();
    for _ in 0..10 {
        writeln!(text, "{}", line(0.10, 0.9)).unwrap();
    }
    // Chalk bag in front of the camera: wrists reported low with poor visibility
    for _ in 0..5 {
        writeln!(text, "{}", line(0.90, 0.2)).unwrap();
    }
    writeln!(text, "{}", line(0.10, 0.9)).unwrap();

    let script = LandmarkScript::parse(&text).unwrap();
    let events = run(&script, &GestureThresholds::default());

    assert!(events[10..15].iter().all(|e| e.gesture == Gesture::Unknown && e.confidence.is_none()));
    assert_eq!(events[15].gesture, Gesture::ArmsUp);
}

/// Test that failed inference frames leave no trace in the event stream
#[test]
fn test_failed_frames_are_skipped() {
    let text = format!(
        "{}\n{{\"error\":\"timeout\"}}\n{}\n",
        line(0.10, 0.9),
        line(0.10, 0.9)
    );
    let script = LandmarkScript::parse(&text).unwrap();
    let events = run(&script, &GestureThresholds::default());

    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.gesture == Gesture::ArmsUp));
}

/// Test that a higher confidence gate turns a marginal detection into a heartbeat
#[test]
fn test_stricter_confidence_gate() {
    let script = LandmarkScript::parse(&line(0.10, 0.6)).unwrap();

    let default_events = run(&script, &GestureThresholds::default());
    assert_eq!(default_events[0].gesture, Gesture::ArmsUp);

    let strict = GestureThresholds {
        conf_min: 0.7,
        ..GestureThresholds::default()
    };
    let strict_events = run(&script, &strict);
    assert_eq!(strict_events[0], GestureEvent::unknown(0));
}
