use std::io::Write;

use fdd_types::{CompletedFile, FrameHeader};
use fdd_wire::checksum;
use fdd_wire::le::LittleEndian;

use crate::error::TapError;
use crate::name::TapeName;

/// Length field of every header block: flag + type + name + 3 params + checksum.
pub const HEADER_BLOCK_LEN: u16 = 0x13;

/// Flag byte opening a header block.
pub const HEADER_FLAG: u8 = 0x00;

/// Flag byte opening a data ("loading") block.
pub const DATA_FLAG: u8 = 0xFF;

/// Largest payload whose data block length (payload + flag + checksum)
/// still fits the 16-bit length field.
pub const MAX_TAP_PAYLOAD: usize = u16::MAX as usize - 2;

/// Tape image writer: turns a decoded file into a two-block TAP record.
///
/// The record is independent of the drive's own framing. Each block is
/// length-prefixed and closed by an XOR checksum over everything after
/// its length field:
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────────┐
/// │ [2 bytes]    │ Header block length, always 0x0013 (LE)      │
/// │ [1 byte]     │ Flag 0x00 (header)                  ┐        │
/// │ [1 byte]     │ File type code                      │        │
/// │ [10 bytes]   │ Name, ISO-8859-1, space padded      │ header │
/// │ [2 bytes]    │ Data length (LE)                    │ chksum │
/// │ [2 bytes]    │ Param 1: auto start line (LE)       │ scope  │
/// │ [2 bytes]    │ Param 2: program length (LE)        ┘        │
/// │ [1 byte]     │ Header checksum                              │
/// ├──────────────┼──────────────────────────────────────────────┤
/// │ [2 bytes]    │ Data block length = payload + 2 (LE)         │
/// │ [1 byte]     │ Flag 0xFF (loading)                 ┐ data   │
/// │ [N bytes]    │ Payload                             ┘ chksum │
/// │ [1 byte]     │ Data checksum                                │
/// └──────────────┴──────────────────────────────────────────────┘
/// ```
///
/// The three parameters follow the tape header order: data length
/// first, then the two type-specific parameters.
///
/// # Usage
///
/// ```rust
/// use fdd_tap::TapWriter;
/// use fdd_types::ProgramHeader;
///
/// let header = ProgramHeader {
///     auto_start_line: 10,
///     payload_len: 3,
///     program_len: 3,
/// };
/// let image = TapWriter::new(header, "HI", &[1, 2, 3]).unwrap().encode();
/// assert_eq!(image.len(), 28);
/// ```
#[derive(Clone, Debug)]
pub struct TapWriter<'a> {
    header: FrameHeader,
    name: TapeName,
    payload: &'a [u8],
    data_block_len: u16,
}

impl<'a> TapWriter<'a> {
    /// Prepare a record for `payload` described by `header`.
    ///
    /// Accepts a [`FrameHeader`] or any per-type header that converts
    /// into one, such as [`fdd_types::ProgramHeader`].
    ///
    /// # Errors
    ///
    /// Returns [`TapError::PayloadTooLarge`] if the payload is longer than
    /// [`MAX_TAP_PAYLOAD`].
    pub fn new(
        header: impl Into<FrameHeader>,
        name: &str,
        payload: &'a [u8],
    ) -> Result<Self, TapError> {
        let data_block_len =
            u16::try_from(payload.len() + 2).map_err(|_| TapError::PayloadTooLarge {
                len: payload.len(),
                limit: MAX_TAP_PAYLOAD,
            })?;

        Ok(Self {
            header: header.into(),
            name: name.into(),
            payload,
            data_block_len,
        })
    }

    /// Prepare a record for a file produced by the stream decoder.
    ///
    /// # Errors
    ///
    /// Same as [`TapWriter::new`].
    pub fn for_file(file: &'a CompletedFile, name: &str) -> Result<Self, TapError> {
        Self::new(*file.header(), name, file.payload())
    }

    /// Exact size of [`encode`](Self::encode)'s output.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        2 + usize::from(HEADER_BLOCK_LEN) + 2 + usize::from(self.data_block_len)
    }

    /// Serialize both blocks.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());

        // Header block
        HEADER_BLOCK_LEN.write_le(&mut out);
        let header_start = out.len();
        out.push(HEADER_FLAG);
        out.push(self.header.file_type().code());
        out.extend_from_slice(self.name.as_bytes());
        for param in tape_params(&self.header) {
            param.write_le(&mut out);
        }
        let header_sum = checksum(&out[header_start..]);
        out.push(header_sum);

        // Data block
        self.data_block_len.write_le(&mut out);
        let data_start = out.len();
        out.push(DATA_FLAG);
        out.extend_from_slice(self.payload);
        let data_sum = checksum(&out[data_start..]);
        out.push(data_sum);

        out
    }

    /// Write the record to `w`.
    ///
    /// # Returns
    ///
    /// Total number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`TapError::Io`] if the writer fails.
    pub fn write_to(&self, w: &mut impl Write) -> Result<usize, TapError> {
        let bytes = self.encode();
        w.write_all(&bytes)?;
        Ok(bytes.len())
    }
}

/// Data length and the two type-specific parameters, in tape order.
///
/// Only Program headers carry real parameters; the other types have no
/// parsed fields yet and write zeros.
#[must_use]
pub fn tape_params(header: &FrameHeader) -> [u16; 3] {
    match header {
        FrameHeader::Program(program) => [
            program.payload_len,
            program.auto_start_line,
            program.program_len,
        ],
        other => [other.payload_len(), 0, 0],
    }
}

/// One-shot form of [`TapWriter`].
///
/// # Errors
///
/// Same as [`TapWriter::new`].
pub fn encode_tap(header: &FrameHeader, name: &str, payload: &[u8]) -> Result<Vec<u8>, TapError> {
    Ok(TapWriter::new(*header, name, payload)?.encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdd_types::ProgramHeader;

    fn program(auto_start_line: u16, payload_len: u16, program_len: u16) -> FrameHeader {
        ProgramHeader {
            auto_start_line,
            payload_len,
            program_len,
        }
        .into()
    }

    #[test]
    fn exact_bytes_for_small_program() {
        let image = encode_tap(&program(10, 3, 3), "HI", &[1, 2, 3]).unwrap();

        #[rustfmt::skip]
        let expected = vec![
            0x13, 0x00,                         // header block length
            0x00,                               // header flag
            0x00,                               // type: Program
            b'H', b'I', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ',
            0x03, 0x00,                         // data length
            0x0A, 0x00,                         // auto start line
            0x03, 0x00,                         // program length
            0x0B,                               // header checksum
            0x05, 0x00,                         // data block length
            0xFF,                               // loading flag
            0x01, 0x02, 0x03,                   // payload
            0xFF,                               // data checksum
        ];
        assert_eq!(image, expected);
    }

    #[test]
    fn encoded_len_matches_output() {
        let payload = vec![0x42; 0x0115];
        let writer = TapWriter::new(program(1, 0x0115, 0xF2), "File", &payload).unwrap();
        let image = writer.encode();
        assert_eq!(image.len(), writer.encoded_len());
        assert_eq!(image.len(), 2 + 19 + 2 + 0x0115 + 2);
    }

    #[test]
    fn both_blocks_checksum_to_zero() {
        let payload: Vec<u8> = (0..200).collect();
        let image = encode_tap(&program(0, 200, 150), "Numbers", &payload).unwrap();

        let header_block = &image[2..21];
        assert_eq!(checksum(header_block), 0);

        let data_block = &image[23..];
        assert_eq!(data_block.len(), 202);
        assert_eq!(checksum(data_block), 0);
    }

    #[test]
    fn header_checksum_does_not_cover_length_field() {
        let image = encode_tap(&program(0, 0, 0), "A", &[]).unwrap();
        // Flag 0 ^ type 0 ^ 'A' ^ nine spaces ^ zero params = 'A' ^ ' '
        assert_eq!(image[20], b'A' ^ b' ');
    }

    #[test]
    fn empty_payload_still_has_flag_and_checksum() {
        let image = encode_tap(&program(0, 0, 0), "EMPTY", &[]).unwrap();
        assert_eq!(&image[21..], &[0x02, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn unparsed_types_write_zero_params() {
        let header = FrameHeader::Bytes { payload_len: 4 };
        assert_eq!(tape_params(&header), [4, 0, 0]);
        let image = encode_tap(&header, "SCREEN", &[0; 4]).unwrap();
        assert_eq!(image[3], 0x03);
    }

    #[test]
    fn placeholder_name_when_not_latin1() {
        let image = encode_tap(&program(0, 1, 1), "プログラム", &[0]).unwrap();
        assert_eq!(&image[4..14], b"??????????");
    }

    #[test]
    fn oversized_payload_rejected() {
        let payload = vec![0; MAX_TAP_PAYLOAD + 1];
        let result = TapWriter::new(FrameHeader::Bytes { payload_len: u16::MAX }, "BIG", &payload);
        assert!(matches!(
            result,
            Err(TapError::PayloadTooLarge { limit: MAX_TAP_PAYLOAD, .. })
        ));
    }

    #[test]
    fn program_header_is_accepted_directly() {
        let header = ProgramHeader {
            auto_start_line: 10,
            payload_len: 3,
            program_len: 3,
        };
        let direct = TapWriter::new(header, "HI", &[1, 2, 3]).unwrap().encode();
        let wrapped = encode_tap(&FrameHeader::Program(header), "HI", &[1, 2, 3]).unwrap();
        assert_eq!(direct, wrapped);
    }

    #[test]
    fn write_to_reports_length() {
        let mut sink = Vec::new();
        let n = TapWriter::new(program(0, 2, 2), "W", &[7, 7])
            .unwrap()
            .write_to(&mut sink)
            .unwrap();
        assert_eq!(n, sink.len());
        assert_eq!(n, 27);
    }
}
