use std::char;

/// Byte Order Mark (BOM) is used to signal the endianness of an encoding. The order `0xFF 0xFE`
/// strongly suggests that the encoding is using little-endian byte order.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Character encoding of an INI file on disk. Detected when reading, reused when writing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf8Bom,
    Utf16Le,
}

impl Encoding {
    /// Sniff the BOM of `data` and decode the rest. Anything without a known BOM is treated as
    /// UTF-8; invalid sequences become U+FFFD rather than failing the parse.
    #[must_use]
    pub fn decode(data: &[u8]) -> (Self, String) {
        if let Some(rest) = data.strip_prefix(BOM_UTF16_LE) {
            let utf16 = rest
                .chunks_exact(2)
                .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
                .collect::<Vec<u16>>();
            let text = char::decode_utf16(utf16)
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect::<String>();

            (Self::Utf16Le, text)
        } else if let Some(rest) = data.strip_prefix(BOM_UTF8) {
            (Self::Utf8Bom, String::from_utf8_lossy(rest).into_owned())
        } else {
            (Self::Utf8, String::from_utf8_lossy(data).into_owned())
        }
    }

    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf8Bom => [BOM_UTF8, text.as_bytes()].concat(),
            Self::Utf16Le => BOM_UTF16_LE
                .iter()
                .copied()
                .chain(text.encode_utf16().flat_map(u16::to_le_bytes))
                .collect(),
        }
    }
}
