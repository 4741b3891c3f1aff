use fdd_wire::WireError;

use crate::file_type::FileType;

/// Errors that can occur when interpreting a frame header or raw frame.
///
/// These sit one level above [`WireError`]: the wire layer only knows about
/// the marker byte and byte counts, this layer knows what the type code
/// and the header fields mean.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                                   │
/// │   ├── wraps WireError for marker / short-buffer problems │
/// │   ├── UnknownFileType for codes outside 0..=3            │
/// │   ├── UnsupportedFileType for tags we cannot parse yet   │
/// │   ├── ProgramLengthExceedsPayload for bad Program fields │
/// │   └── FrameLengthMismatch for archived raw frames        │
/// └──────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
  /// The byte after the marker is not one of the four file type codes.
  #[error("unknown file type code {code:#04X}")]
  UnknownFileType { code: u8 },

  /// The file type is recognized but its header layout is not parsed.
  ///
  /// Only `Program` headers are decoded. Array and bytes frames are
  /// reported with this error so the decoder can skip them.
  #[error("unsupported file type: {file_type}")]
  UnsupportedFileType { file_type: FileType },

  /// A Program header declares more program bytes than payload bytes.
  #[error("program length {program_len} exceeds payload length {payload_len}")]
  ProgramLengthExceedsPayload { program_len: u16, payload_len: u16 },

  /// An archived raw frame is not exactly header + declared payload.
  #[error("raw frame is {actual} bytes, header declares {expected}")]
  FrameLengthMismatch { expected: usize, actual: usize },

  /// An underlying wire-level error (missing marker, short buffer).
  #[error(transparent)]
  Wire(#[from] WireError),
}
