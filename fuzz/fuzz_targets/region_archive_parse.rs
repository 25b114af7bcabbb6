//! Fuzz target for region archive parsing.
//!
//! Parsed polygon and traced regions are also rasterized, so that arbitrary
//! vertex lists reach the scanline fill.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roicoloc::region::io_json::fuzz_parse_archive;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let _ = fuzz_parse_archive(data);
});
