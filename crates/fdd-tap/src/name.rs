/// Width of the name field in a tape header block.
pub const NAME_LEN: usize = 10;

/// Name written when the requested one is not representable.
pub const PLACEHOLDER: [u8; NAME_LEN] = *b"??????????";

const PAD: u8 = b' ';

/// A tape file name: exactly ten ISO-8859-1 bytes, space padded.
///
/// The whole name is encoded first and then truncated, so a long name
/// keeps its first ten characters. If any character lies outside
/// ISO-8859-1 (above U+00FF) the encoding fails as a whole and the name
/// becomes [`PLACEHOLDER`]; this is not reported as an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapeName([u8; NAME_LEN]);

impl TapeName {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let Some(encoded) = encode_latin1(name) else {
            return Self(PLACEHOLDER);
        };

        let mut field = [PAD; NAME_LEN];
        let len = encoded.len().min(NAME_LEN);
        field[..len].copy_from_slice(&encoded[..len]);
        Self(field)
    }

    /// Wrap a raw field read from an existing image.
    #[must_use]
    pub fn from_raw(raw: [u8; NAME_LEN]) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NAME_LEN] {
        &self.0
    }

    /// Decode back to text, dropping the trailing padding.
    #[must_use]
    pub fn to_text(&self) -> String {
        // ISO-8859-1 maps every byte to the code point of the same value
        let text: String = self.0.iter().map(|&b| char::from(b)).collect();
        text.trim_end_matches(char::from(PAD)).to_string()
    }
}

impl From<&str> for TapeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

fn encode_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_is_space_padded() {
        assert_eq!(TapeName::new("File").as_bytes(), b"File      ");
    }

    #[test]
    fn long_name_is_truncated() {
        assert_eq!(TapeName::new("Red Alert Deluxe").as_bytes(), b"Red Alert ");
    }

    #[test]
    fn exact_length_untouched() {
        assert_eq!(TapeName::new("0123456789").as_bytes(), b"0123456789");
    }

    #[test]
    fn latin1_characters_are_single_bytes() {
        let name = TapeName::new("Café");
        assert_eq!(&name.as_bytes()[..4], &[b'C', b'a', b'f', 0xE9]);
        assert_eq!(name.to_text(), "Café");
    }

    #[test]
    fn non_latin1_falls_back_to_placeholder() {
        assert_eq!(TapeName::new("Файл").as_bytes(), &PLACEHOLDER);
        // One bad character is enough, even past the tenth position
        assert_eq!(TapeName::new("ABCDEFGHIJK€").as_bytes(), &PLACEHOLDER);
    }

    #[test]
    fn empty_name_is_all_spaces() {
        assert_eq!(TapeName::new("").as_bytes(), &[b' '; NAME_LEN]);
        assert_eq!(TapeName::new("").to_text(), "");
    }
}
