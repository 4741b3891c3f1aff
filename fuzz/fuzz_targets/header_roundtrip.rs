#![no_main]

use libfuzzer_sys::fuzz_target;
use fdd_types::{ProgramHeader, PROGRAM_HEADER_SIZE};

// Fuzz target: ProgramHeader write->read roundtrip.
//
// Takes 6 bytes of fuzz input as the three little-endian fields.
fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }

    let field = |i: usize| u16::from_le_bytes([data[i], data[i + 1]]);
    let header = ProgramHeader {
        auto_start_line: field(0),
        payload_len: field(2),
        program_len: field(4),
    };

    let mut buf = Vec::new();
    header.write_to(&mut buf);
    assert_eq!(buf.len(), PROGRAM_HEADER_SIZE);

    let parsed = ProgramHeader::read_from(&buf).unwrap();
    assert_eq!(parsed, header);
});
