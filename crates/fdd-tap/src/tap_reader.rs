use fdd_types::FileType;
use fdd_wire::checksum;
use fdd_wire::le::read_u16_le;

use crate::error::TapError;
use crate::name::{NAME_LEN, TapeName};
use crate::tap_writer::{HEADER_BLOCK_LEN, HEADER_FLAG};

/// One length-prefixed block of a tape image, borrowed from the image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TapBlock<'a> {
    /// Offset of the block's length field within the image.
    pub offset: usize,
    pub flag: u8,
    /// Bytes between the flag and the checksum.
    pub data: &'a [u8],
    pub checksum: u8,
}

impl TapBlock<'_> {
    /// Whether the stored checksum matches flag + data.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.flag ^ checksum(self.data) == self.checksum
    }

    /// Interpret this block as a tape header.
    ///
    /// # Errors
    ///
    /// - [`TapError::NotAHeader`] if the flag is not 0x00 or the size is
    ///   not that of a header block.
    /// - [`TapError::Type`] if the type code is unknown.
    pub fn as_header(&self) -> Result<TapHeaderBlock, TapError> {
        // flag and checksum are not part of `data`
        let expected = usize::from(HEADER_BLOCK_LEN) - 2;
        if self.flag != HEADER_FLAG || self.data.len() != expected {
            return Err(TapError::NotAHeader {
                flag: self.flag,
                len: self.data.len() + 2,
            });
        }

        let file_type = FileType::from_code(self.data[0])?;
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&self.data[1..=NAME_LEN]);
        let params = &self.data[1 + NAME_LEN..];

        Ok(TapHeaderBlock {
            file_type,
            name: TapeName::from_raw(name),
            data_len: read_u16_le(params, 0),
            param1: read_u16_le(params, 2),
            param2: read_u16_le(params, 4),
        })
    }
}

/// Decoded contents of a header block.
///
/// For programs `param1` is the auto start line and `param2` the
/// program length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapHeaderBlock {
    pub file_type: FileType,
    pub name: TapeName,
    pub data_len: u16,
    pub param1: u16,
    pub param2: u16,
}

/// Split a tape image into its blocks.
///
/// Checksums are not enforced here; use [`TapBlock::is_valid`].
///
/// # Errors
///
/// - [`TapError::Truncated`] if the image ends inside a length field or
///   block body.
/// - [`TapError::BlockTooShort`] for a block shorter than flag + checksum.
pub fn read_tap_blocks(image: &[u8]) -> Result<Vec<TapBlock<'_>>, TapError> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while cursor < image.len() {
        if image.len() - cursor < 2 {
            return Err(TapError::Truncated { offset: cursor });
        }
        let len = usize::from(read_u16_le(image, cursor));
        if len < 2 {
            return Err(TapError::BlockTooShort {
                offset: cursor,
                len,
            });
        }

        let body_start = cursor + 2;
        let body = image
            .get(body_start..body_start + len)
            .ok_or(TapError::Truncated { offset: image.len() })?;

        blocks.push(TapBlock {
            offset: cursor,
            flag: body[0],
            data: &body[1..len - 1],
            checksum: body[len - 1],
        });
        cursor = body_start + len;
    }

    Ok(blocks)
}
