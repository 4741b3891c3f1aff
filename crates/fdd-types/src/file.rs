use bytes::Bytes;

use crate::error::TypeError;
use crate::header::FrameHeader;

/// A fully received file.
///
/// Produced once per decoded frame. `raw_frame` holds the exact bytes
/// that came over the wire (header included) for lossless archival;
/// `payload` is a zero-copy view of the bytes after the header.
///
/// ```text
///   raw_frame: [ header (header_size) | payload (payload_len) ]
///                                     ^
///                                     payload starts here
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedFile {
  header: FrameHeader,
  payload: Bytes,
  raw_frame: Bytes,
}

impl CompletedFile {
  /// Wrap a raw frame whose length has already been checked against the
  /// header.
  ///
  /// # Panics
  ///
  /// Panics if `raw_frame` is shorter than the header size. Callers
  /// holding untrusted bytes should use [`CompletedFile::parse`].
  #[must_use]
  pub fn from_frame(header: FrameHeader, raw_frame: Bytes) -> Self {
    debug_assert_eq!(raw_frame.len(), header.expected_frame_size());
    let payload = raw_frame.slice(header.header_size()..);
    Self {
      header,
      payload,
      raw_frame,
    }
  }

  /// Rebuild a completed file from an archived raw frame.
  ///
  /// # Errors
  ///
  /// - Any header error from [`FrameHeader::read_from`].
  /// - [`TypeError::FrameLengthMismatch`] if the frame is not exactly
  ///   header + declared payload bytes long.
  pub fn parse(raw_frame: impl Into<Bytes>) -> Result<Self, TypeError> {
    let raw_frame = raw_frame.into();
    let header = FrameHeader::read_from(&raw_frame)?;
    let expected = header.expected_frame_size();
    if raw_frame.len() != expected {
      return Err(TypeError::FrameLengthMismatch {
        expected,
        actual: raw_frame.len(),
      });
    }
    Ok(Self::from_frame(header, raw_frame))
  }

  #[must_use]
  pub fn header(&self) -> &FrameHeader {
    &self.header
  }

  /// The `payload_len` bytes after the header.
  #[must_use]
  pub fn payload(&self) -> &Bytes {
    &self.payload
  }

  /// The whole frame as received.
  #[must_use]
  pub fn raw_frame(&self) -> &Bytes {
    &self.raw_frame
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::header::ProgramHeader;

  fn frame(payload: &[u8]) -> Vec<u8> {
    let header = ProgramHeader {
      auto_start_line: 10,
      payload_len: u16::try_from(payload.len()).unwrap(),
      program_len: u16::try_from(payload.len()).unwrap(),
    };
    let mut raw = Vec::new();
    header.write_to(&mut raw);
    raw.extend_from_slice(payload);
    raw
  }

  #[test]
  fn payload_is_suffix_of_raw_frame() {
    let raw = frame(b"\x00\x0a\x05\x00\xf5\"HI\"\x0d");
    let file = CompletedFile::parse(raw.clone()).unwrap();
    assert_eq!(file.raw_frame().as_ref(), raw.as_slice());
    assert_eq!(file.payload().as_ref(), &raw[8..]);
    assert_eq!(file.header().payload_len(), 10);
  }

  #[test]
  fn empty_payload() {
    let file = CompletedFile::parse(frame(b"")).unwrap();
    assert!(file.payload().is_empty());
    assert_eq!(file.raw_frame().len(), 8);
  }

  #[test]
  fn parse_rejects_trailing_bytes() {
    let mut raw = frame(b"abc");
    raw.push(0xFF);
    assert_eq!(
      CompletedFile::parse(raw),
      Err(TypeError::FrameLengthMismatch {
        expected: 11,
        actual: 12
      })
    );
  }

  #[test]
  fn parse_rejects_truncated_payload() {
    let mut raw = frame(b"abcdef");
    raw.truncate(10);
    assert!(matches!(
      CompletedFile::parse(raw),
      Err(TypeError::FrameLengthMismatch { expected: 14, actual: 10 })
    ));
  }
}
