use fdd_types::TypeError;

/// Errors that can occur while writing or reading tape images.
///
/// Encoding itself cannot fail for a decoded file: names that do not fit
/// the single-byte character set fall back to a placeholder silently.
/// What remains is payload sizing, I/O, and malformed images on the read
/// side.
///
/// ```text
///   TapError
///   ├── PayloadTooLarge   ← payload + flag + checksum overflows u16
///   ├── Truncated         ← image ends inside a block
///   ├── BlockTooShort     ← block without room for flag + checksum
///   ├── NotAHeader        ← block is not a 19-byte 0x00-flag header
///   ├── Type(TypeError)   ← header block carries an unknown type code
///   └── Io(std::io::Error)
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TapError {
    #[error("payload of {len} bytes does not fit a tape block (limit {limit})")]
    PayloadTooLarge { len: usize, limit: usize },

    #[error("tape image truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("tape block at offset {offset} is {len} bytes, need at least 2")]
    BlockTooShort { offset: usize, len: usize },

    #[error("block is not a tape header (flag {flag:#04X}, {len} bytes)")]
    NotAHeader { flag: u8, len: usize },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
