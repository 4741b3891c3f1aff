use fdd_wire::le::{LittleEndian, read_u16_le};
use fdd_wire::marker::{FRAME_MARKER, peek_type_code};
use fdd_wire::WireError;

use crate::error::TypeError;
use crate::file_type::FileType;

/// Size of a Program frame header, marker and type byte included.
pub const PROGRAM_HEADER_SIZE: usize = 8;

const AUTO_START_OFFSET: usize = 2;
const PAYLOAD_LEN_OFFSET: usize = 4;
const PROGRAM_LEN_OFFSET: usize = 6;

/// Header of a BASIC program frame.
///
/// ```text
/// +----+----+----+----+----+----+----+----+
/// | 00 | 00 |  start  |  data   | program |
/// |    |    |  line   | length  | length  |
/// +----+----+----+----+----+----+----+----+
///   ^    ^
///   |    └── file type, 0x00 is Program
///   └─────── frame marker
/// ```
///
/// All three fields are little-endian `u16`. `payload_len` is the number
/// of payload bytes that follow the header. `program_len` is the part of
/// the payload holding the program itself; the rest is the variables area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramHeader {
  /// Line to start at after loading. 0 means "not set".
  pub auto_start_line: u16,
  pub payload_len: u16,
  pub program_len: u16,
}

impl ProgramHeader {
  /// Parse the header from the front of `buf`.
  ///
  /// The marker and type byte are checked too, so this can be called on
  /// an arbitrary buffer.
  ///
  /// # Errors
  ///
  /// - [`TypeError::Wire`] with [`WireError::UnexpectedEof`] if fewer than
  ///   [`PROGRAM_HEADER_SIZE`] bytes are available, or with
  ///   [`WireError::MissingMarker`] if byte 0 is not the marker.
  /// - [`TypeError::UnknownFileType`] / [`TypeError::UnsupportedFileType`]
  ///   if byte 1 is not the Program code.
  pub fn read_from(buf: &[u8]) -> Result<Self, TypeError> {
    match FileType::from_code(peek_type_code(buf)?)? {
      FileType::Program => {}
      other => return Err(TypeError::UnsupportedFileType { file_type: other }),
    }

    if buf.len() < PROGRAM_HEADER_SIZE {
      return Err(WireError::UnexpectedEof { offset: buf.len() }.into());
    }

    Ok(Self {
      auto_start_line: read_u16_le(buf, AUTO_START_OFFSET),
      payload_len: read_u16_le(buf, PAYLOAD_LEN_OFFSET),
      program_len: read_u16_le(buf, PROGRAM_LEN_OFFSET),
    })
  }

  /// Append the 8-byte frame header, exactly as the drive sends it.
  pub fn write_to(&self, out: &mut Vec<u8>) {
    out.push(FRAME_MARKER);
    out.push(FileType::Program.code());
    self.auto_start_line.write_le(out);
    self.payload_len.write_le(out);
    self.program_len.write_le(out);
  }

  /// The auto start line, or `None` when the program does not auto-run.
  #[must_use]
  pub fn auto_start(&self) -> Option<u16> {
    (self.auto_start_line != 0).then_some(self.auto_start_line)
  }

  /// Bytes of the payload after the program (the variables area).
  ///
  /// Saturates to 0 for malformed headers.
  #[must_use]
  pub fn variables_len(&self) -> u16 {
    self.payload_len.saturating_sub(self.program_len)
  }

  /// Check that the program fits inside the declared payload.
  ///
  /// # Errors
  ///
  /// Returns [`TypeError::ProgramLengthExceedsPayload`] if
  /// `program_len > payload_len`.
  pub fn validate(&self) -> Result<(), TypeError> {
    if self.program_len > self.payload_len {
      return Err(TypeError::ProgramLengthExceedsPayload {
        program_len: self.program_len,
        payload_len: self.payload_len,
      });
    }
    Ok(())
  }
}

/// A parsed frame header, one variant per [`FileType`].
///
/// Only `Program` has a known field layout. The other variants carry just
/// their declared payload length so they can flow through the tape writer
/// once their parsing is added; [`FrameHeader::read_from`] never builds
/// them today and reports [`TypeError::UnsupportedFileType`] instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameHeader {
  Program(ProgramHeader),
  NumericArray { payload_len: u16 },
  AlphanumericArray { payload_len: u16 },
  Bytes { payload_len: u16 },
}

impl FrameHeader {
  /// Parse whichever header starts at the front of `buf`.
  ///
  /// # Errors
  ///
  /// Same as [`ProgramHeader::read_from`]; any non-Program type yields
  /// [`TypeError::UnsupportedFileType`].
  pub fn read_from(buf: &[u8]) -> Result<Self, TypeError> {
    ProgramHeader::read_from(buf).map(Self::Program)
  }

  #[must_use]
  pub fn file_type(&self) -> FileType {
    match self {
      Self::Program(_) => FileType::Program,
      Self::NumericArray { .. } => FileType::NumericArray,
      Self::AlphanumericArray { .. } => FileType::AlphanumericArray,
      Self::Bytes { .. } => FileType::Bytes,
    }
  }

  /// Declared number of payload bytes following the header.
  #[must_use]
  pub fn payload_len(&self) -> u16 {
    match self {
      Self::Program(program) => program.payload_len,
      Self::NumericArray { payload_len }
      | Self::AlphanumericArray { payload_len }
      | Self::Bytes { payload_len } => *payload_len,
    }
  }

  #[must_use]
  pub fn header_size(&self) -> usize {
    self.file_type().header_size()
  }

  /// Total raw frame size: header plus declared payload.
  #[must_use]
  pub fn expected_frame_size(&self) -> usize {
    self.header_size() + usize::from(self.payload_len())
  }

  /// The Program fields, if this is a Program header.
  #[must_use]
  pub fn as_program(&self) -> Option<&ProgramHeader> {
    match self {
      Self::Program(program) => Some(program),
      _ => None,
    }
  }
}

impl From<ProgramHeader> for FrameHeader {
  fn from(program: ProgramHeader) -> Self {
    Self::Program(program)
  }
}
