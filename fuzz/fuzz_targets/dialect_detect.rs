//! Fuzz target for dialect detection and table reading.
//!
//! Arbitrary bytes are sniffed; when a dialect is found the table is read
//! from the detected offset. The offset must always land inside the input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roicoloc::table::{detect_in_slice, table_from_str, DetectOptions};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let opts = DetectOptions::default();
    if let Ok(detection) = detect_in_slice(data, &opts) {
        assert!(detection.offset as usize <= data.len());
    }
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = table_from_str(text, &opts);
    }
});
