/// XOR checksum used by the tape container blocks.
///
/// Every byte of the covered range is folded in with `^`, starting from 0.
/// An empty range checksums to 0, and appending the checksum byte to the
/// range it covers always produces a range whose checksum is 0, which is
/// how tape loaders validate a block.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &b| acc ^ b)
}
