//! Byte-order-mark detection and source decoding.

use serde::Serialize;

/// Encoding marker detected at the start of a source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ByteOrderMark {
    #[default]
    None,
    Utf8,
    Utf16BigEndian,
    Utf16LittleEndian,
}

impl ByteOrderMark {
    /// Inspect the leading bytes of `bytes` for a known marker.
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes {
            [0xFE, 0xFF, ..] => Self::Utf16BigEndian,
            [0xFF, 0xFE, ..] => Self::Utf16LittleEndian,
            [0xEF, 0xBB, 0xBF, ..] => Self::Utf8,
            _ => Self::None,
        }
    }

    /// Length in bytes of the marker itself.
    pub const fn len(self) -> usize {
        match self {
            Self::None => 0,
            Self::Utf8 => 3,
            Self::Utf16BigEndian | Self::Utf16LittleEndian => 2,
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Decode raw file bytes into text, returning the detected marker.
///
/// Invalid sequences are replaced with U+FFFD rather than rejected; a
/// trailing odd byte in UTF-16 input is dropped.
pub fn decode(bytes: &[u8]) -> (String, ByteOrderMark) {
    let mark = ByteOrderMark::detect(bytes);
    let body = &bytes[mark.len()..];
    let text = match mark {
        ByteOrderMark::Utf16BigEndian => decode_utf16(body, u16::from_be_bytes),
        ByteOrderMark::Utf16LittleEndian => decode_utf16(body, u16::from_le_bytes),
        ByteOrderMark::Utf8 | ByteOrderMark::None => String::from_utf8_lossy(body).into_owned(),
    };
    (text, mark)
}

fn decode_utf16(body: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = body.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
