#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: frame header and archived raw frame parsing.
//
// Neither may panic on arbitrary input.
fuzz_target!(|data: &[u8]| {
    let _ = fdd_types::FrameHeader::read_from(data);
    let _ = fdd_types::CompletedFile::parse(data.to_vec());
});
