#![no_main]

use hangboard_gesture::config::DetectorConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Validation must not panic on any value serde accepts
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(config) = serde_json::from_str::<DetectorConfig>(s)
    {
        let _ = config.validate();
    }
});
