/// Configuration for the stream decoder.
///
/// The defaults reproduce the drive protocol exactly as it is observed:
/// no inbound checksum, no cross-field header validation. The two opt-in
/// checks only ever turn frames into diagnostics; they never make the
/// decoder stop.
///
/// ```text
/// ┌──────────────────────┬─────────┬─────────────────────────────────────────┐
/// │ Field                │ Default │ Effect                                  │
/// ├──────────────────────┼─────────┼─────────────────────────────────────────┤
/// │ strict_checksum      │ false   │ Last payload byte must equal the XOR of │
/// │                      │         │ the rest; mismatching frames are dropped│
/// │ check_program_length │ false   │ program_len > payload_len is skipped as │
/// │                      │         │ a malformed header                      │
/// │ read_chunk_size      │ 256     │ Bytes per read in `source::drain`       │
/// │ initial_capacity     │ 0x10000 │ Buffer capacity reserved up front       │
/// └──────────────────────┴─────────┴─────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    pub strict_checksum: bool,
    pub check_program_length: bool,
    pub read_chunk_size: usize,
    pub initial_capacity: usize,
}

impl Default for DecoderConfig {
    /// One full 16-bit payload plus header fits without reallocating.
    fn default() -> Self {
        Self {
            strict_checksum: false,
            check_program_length: false,
            read_chunk_size: 256,
            initial_capacity: 0x1_0000,
        }
    }
}
