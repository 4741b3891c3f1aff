#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use fdd_tap::{read_tap_blocks, TapWriter};
use fdd_types::ProgramHeader;

#[derive(Arbitrary, Debug)]
struct Input {
    auto_start_line: u16,
    program_len: u16,
    name: String,
    payload: Vec<u8>,
}

// Fuzz target: TapWriter output read back with read_tap_blocks.
//
// Both blocks must carry valid checksums and the header must describe
// the payload that was written.
fuzz_target!(|input: Input| {
    let Ok(payload_len) = u16::try_from(input.payload.len()) else {
        return;
    };
    let header = ProgramHeader {
        auto_start_line: input.auto_start_line,
        payload_len,
        program_len: input.program_len,
    };

    let Ok(writer) = TapWriter::new(header, &input.name, &input.payload) else {
        return;
    };
    let image = writer.encode();
    assert_eq!(image.len(), writer.encoded_len());

    let blocks = read_tap_blocks(&image).unwrap();
    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(|block| block.is_valid()));

    let tape_header = blocks[0].as_header().unwrap();
    assert_eq!(tape_header.data_len, payload_len);
    assert_eq!(tape_header.param1, input.auto_start_line);
    assert_eq!(tape_header.param2, input.program_len);
    assert_eq!(blocks[1].data, input.payload.as_slice());
});
