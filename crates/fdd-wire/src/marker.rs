use crate::error::WireError;

/// Leading byte of every frame the drive sends.
pub const FRAME_MARKER: u8 = 0x00;

/// Marker byte plus file type byte.
pub const PREFIX_SIZE: usize = 2;

/// Offset of the file type byte inside a frame.
pub const TYPE_OFFSET: usize = 1;

/// Peek at the two-byte frame prefix at the front of `buf`.
///
/// ```text
/// ┌────────┬────────┬──────────────────────────────┐
/// │ Offset │ Size   │ Description                  │
/// ├────────┼────────┼──────────────────────────────┤
/// │ 0x00   │ 1 byte │ Marker (always 0x00)         │
/// │ 0x01   │ 1 byte │ File type code               │
/// │ 0x02   │ ...    │ Type-specific header fields  │
/// └────────┴────────┴──────────────────────────────┘
/// ```
///
/// Returns the raw type code. Nothing is consumed. The marker is checked
/// before the length, so a lone non-marker byte is reported as
/// [`WireError::MissingMarker`] rather than as a short read.
///
/// # Errors
///
/// - [`WireError::UnexpectedEof`] with `offset` 0 or 1 if the prefix is not
///   fully buffered yet.
/// - [`WireError::MissingMarker`] if byte 0 is not [`FRAME_MARKER`].
pub fn peek_type_code(buf: &[u8]) -> Result<u8, WireError> {
    let first = *buf.first().ok_or(WireError::UnexpectedEof { offset: 0 })?;
    if first != FRAME_MARKER {
        return Err(WireError::MissingMarker { found: first });
    }

    buf.get(TYPE_OFFSET)
        .copied()
        .ok_or(WireError::UnexpectedEof { offset: TYPE_OFFSET })
}
