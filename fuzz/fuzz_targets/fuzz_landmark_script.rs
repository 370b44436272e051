#![no_main]

use hangboard_gesture::pipeline::FrameProcessor;
use hangboard_gesture::source::{LandmarkScript, ScriptStep};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(script) = LandmarkScript::parse(text) else {
        return;
    };

    // Whatever parses must also run through the processor without panicking
    let mut processor = FrameProcessor::default();
    for (timestamp_ms, step) in (0u64..).zip(script.steps()) {
        match step {
            ScriptStep::Pose(landmarks) => {
                processor.process(Some(landmarks.as_slice()), timestamp_ms);
            }
            ScriptStep::NoPerson => {
                processor.process(None, timestamp_ms);
            }
            ScriptStep::Failure { .. } => {}
        }
    }
});
