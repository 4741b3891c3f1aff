use std::fmt;

use crate::error::TypeError;

/// File type codes sent in the second byte of every frame.
///
/// ```text
/// ┌──────┬────────────────────┬─────────────┐
/// │ Code │ Variant            │ Header size │
/// ├──────┼────────────────────┼─────────────┤
/// │ 0x00 │ Program            │ 8 bytes     │
/// │ 0x01 │ NumericArray       │ 8 bytes     │
/// │ 0x02 │ AlphanumericArray  │ 8 bytes     │
/// │ 0x03 │ Bytes              │ 6 bytes     │
/// └──────┴────────────────────┴─────────────┘
/// ```
///
/// The set is closed. Unlike forward-compatible tag enums there is no
/// catch-all variant: an unknown code means the decoder is looking at
/// noise, so [`FileType::from_code`] fails instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileType {
  Program,
  NumericArray,
  AlphanumericArray,
  Bytes,
}

impl FileType {
  /// Every file type, in code order.
  pub const ALL: [FileType; 4] = [
    FileType::Program,
    FileType::NumericArray,
    FileType::AlphanumericArray,
    FileType::Bytes,
  ];

  /// The wire code for this type.
  #[must_use]
  pub fn code(self) -> u8 {
    match self {
      Self::Program => 0x00,
      Self::NumericArray => 0x01,
      Self::AlphanumericArray => 0x02,
      Self::Bytes => 0x03,
    }
  }

  /// Parse a wire code.
  ///
  /// # Errors
  ///
  /// Returns [`TypeError::UnknownFileType`] for any code above 0x03.
  pub fn from_code(code: u8) -> Result<Self, TypeError> {
    match code {
      0x00 => Ok(Self::Program),
      0x01 => Ok(Self::NumericArray),
      0x02 => Ok(Self::AlphanumericArray),
      0x03 => Ok(Self::Bytes),
      other => Err(TypeError::UnknownFileType { code: other }),
    }
  }

  /// Size of the frame header for this type, marker and type byte included.
  #[must_use]
  pub fn header_size(self) -> usize {
    match self {
      Self::Program | Self::NumericArray | Self::AlphanumericArray => 8,
      Self::Bytes => 6,
    }
  }

  /// Human-readable name, used in progress descriptions and listings.
  #[must_use]
  pub fn label(self) -> &'static str {
    match self {
      Self::Program => "Program",
      Self::NumericArray => "Numeric Array",
      Self::AlphanumericArray => "Alphanumeric Array",
      Self::Bytes => "Bytes",
    }
  }
}

impl TryFrom<u8> for FileType {
  type Error = TypeError;

  fn try_from(code: u8) -> Result<Self, Self::Error> {
    Self::from_code(code)
  }
}

impl fmt::Display for FileType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}
