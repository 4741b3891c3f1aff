/// Errors raised while reading the fixed parts of the FDD wire format.
///
/// The stream decoder never surfaces these to its caller. It matches on
/// them to decide whether to wait or how many bytes to drop while
/// resynchronizing:
///
/// ```text
///   WireError
///   ├── UnexpectedEof   ← wait for more bytes, drop nothing
///   └── MissingMarker   ← drop 1 byte
/// ```
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    /// Input ended before the field at `offset` could be read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// The first byte of a candidate frame was not the marker.
    #[error("expected frame marker 0x00, got {found:#04X}")]
    MissingMarker { found: u8 },
}

