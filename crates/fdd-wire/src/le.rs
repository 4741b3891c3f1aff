/// Fixed-width little-endian integer codec.
///
/// Every multi-byte field in both the FDD frame header and the tape
/// container is an unsigned little-endian integer. The FDD only ever sends
/// 16-bit fields, but the trait covers the other widths so the tape writer
/// and test fixtures share one code path.
///
/// # Precondition
///
/// [`read_le`](LittleEndian::read_le) reads exactly `WIDTH` bytes starting
/// at `offset` and does **no** bounds checking of its own: callers must
/// guarantee `offset + WIDTH <= buf.len()`. Violating this is a bug in the
/// caller and panics on the slice index, it is never reported as an error.
pub trait LittleEndian: Sized + Copy {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Append the little-endian encoding of `self` to `out`.
    fn write_le(self, out: &mut Vec<u8>);

    /// Decode a value from `buf[offset..offset + WIDTH]`.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `WIDTH` bytes are available at `offset`.
    fn read_le(buf: &[u8], offset: usize) -> Self;
}

macro_rules! impl_little_endian {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl LittleEndian for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn read_le(buf: &[u8], offset: usize) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&buf[offset..offset + Self::WIDTH]);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )+
    };
}

impl_little_endian!(u8, u16, u32, u64);

/// Read a `u16` at `offset`. Same precondition as [`LittleEndian::read_le`].
#[must_use]
pub fn read_u16_le(buf: &[u8], offset: usize) -> u16 {
    u16::read_le(buf, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_low_byte_first() {
        let mut out = Vec::new();
        0x0115_u16.write_le(&mut out);
        0x0013_u16.write_le(&mut out);
        assert_eq!(out, [0x15, 0x01, 0x13, 0x00]);
    }

    #[test]
    fn read_at_offset() {
        // Program header as sent by the drive: auto start 1, data 0x0115, program 0x00F2
        let header = [0x00, 0x00, 0x01, 0x00, 0x15, 0x01, 0xF2, 0x00];
        assert_eq!(read_u16_le(&header, 2), 0x0001);
        assert_eq!(read_u16_le(&header, 4), 0x0115);
        assert_eq!(read_u16_le(&header, 6), 0x00F2);
    }

    #[test]
    fn read_ignores_trailing_bytes() {
        let buf = [0x34, 0x12, 0xFF, 0xFF];
        assert_eq!(read_u16_le(&buf, 0), 0x1234);
    }

    #[test]
    fn wider_types() {
        let mut out = Vec::new();
        0xDEAD_BEEF_u32.write_le(&mut out);
        assert_eq!(out, [0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(u32::read_le(&out, 0), 0xDEAD_BEEF);

        let mut out = vec![0xAA];
        0x0102_0304_0506_0708_u64.write_le(&mut out);
        assert_eq!(u64::read_le(&out, 1), 0x0102_0304_0506_0708);
        assert_eq!(u8::WIDTH, 1);
        assert_eq!(u64::WIDTH, 8);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn short_buffer_is_a_caller_bug() {
        let _ = read_u16_le(&[0x01], 0);
    }
}
