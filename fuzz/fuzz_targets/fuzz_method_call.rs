#![no_main]

use hangboard_gesture::control::{MethodCall, MethodResponse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(call) = serde_json::from_str::<MethodCall>(s) {
            // Argument lookup tolerates any JSON shape
            let _ = call.front_camera();
        }
        let _ = serde_json::from_str::<MethodResponse>(s);
    }
});
