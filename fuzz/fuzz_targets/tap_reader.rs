#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: tape image block splitting and header interpretation.
fuzz_target!(|data: &[u8]| {
    if let Ok(blocks) = fdd_tap::read_tap_blocks(data) {
        for block in blocks {
            let _ = block.is_valid();
            let _ = block.as_header();
        }
    }
});
