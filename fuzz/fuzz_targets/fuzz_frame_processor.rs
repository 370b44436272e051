#![no_main]

use hangboard_gesture::gesture::{Gesture, Landmark};
use hangboard_gesture::pipeline::FrameProcessor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Each 12-byte chunk becomes one landmark (x, y, visibility); frames hold 17 landmarks
    let landmarks: Vec<Landmark> = data
        .chunks_exact(12)
        .map(|chunk| {
            let f = |i: usize| f32::from_le_bytes([chunk[i], chunk[i + 1], chunk[i + 2], chunk[i + 3]]);
            Landmark::new(f(0), f(4), f(8))
        })
        .collect();

    let mut processor = FrameProcessor::default();
    for (timestamp_ms, frame) in (0u64..).zip(landmarks.chunks(17)) {
        let event = processor.process(Some(frame), timestamp_ms);
        if event.confidence.is_none() {
            assert_eq!(event.gesture, Gesture::Unknown);
        }
    }
});
