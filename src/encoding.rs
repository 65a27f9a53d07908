//! Encodings and their preambles

use crate::error::{ReliableTxtError, Result};

pub const UTF8_PREAMBLE: [u8; 3] = [0xEF, 0xBB, 0xBF];
pub const UTF16_PREAMBLE: [u8; 2] = [0xFE, 0xFF];
pub const UTF16_REVERSE_PREAMBLE: [u8; 2] = [0xFF, 0xFE];
pub const UTF32_PREAMBLE: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];

/// The four encodings a ReliableTXT file may use
///
/// The discriminants are the tag values used when an encoding is stored
/// or transmitted as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Encoding {
    /// UTF-8
    #[default]
    Utf8 = 0,
    /// UTF-16 big-endian
    Utf16 = 1,
    /// UTF-16 little-endian
    Utf16Reverse = 2,
    /// UTF-32 big-endian
    Utf32 = 3,
}

impl Encoding {
    /// All encodings in declaration order
    pub const ALL: [Encoding; 4] = [
        Encoding::Utf8,
        Encoding::Utf16,
        Encoding::Utf16Reverse,
        Encoding::Utf32,
    ];

    /// Number of bytes taken by the byte order mark
    pub const fn preamble_size(self) -> usize {
        self.preamble_bytes().len()
    }

    /// Byte order mark written at the start of a file
    pub const fn preamble_bytes(self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => &UTF8_PREAMBLE,
            Encoding::Utf16 => &UTF16_PREAMBLE,
            Encoding::Utf16Reverse => &UTF16_REVERSE_PREAMBLE,
            Encoding::Utf32 => &UTF32_PREAMBLE,
        }
    }

    /// Encoded form of a single line feed, used to split lines without decoding
    pub(crate) const fn line_feed_bytes(self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => &[0x0A],
            Encoding::Utf16 => &[0x00, 0x0A],
            Encoding::Utf16Reverse => &[0x0A, 0x00],
            Encoding::Utf32 => &[0x00, 0x00, 0x00, 0x0A],
        }
    }

    /// Human readable name
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16 => "UTF-16",
            Encoding::Utf16Reverse => "UTF-16 Reverse",
            Encoding::Utf32 => "UTF-32",
        }
    }
}

impl TryFrom<u8> for Encoding {
    type Error = ReliableTxtError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Encoding::Utf8),
            1 => Ok(Encoding::Utf16),
            2 => Ok(Encoding::Utf16Reverse),
            3 => Ok(Encoding::Utf32),
            _ => Err(ReliableTxtError::InvalidEncoding { tag }),
        }
    }
}

impl From<Encoding> for u8 {
    fn from(encoding: Encoding) -> Self {
        encoding as u8
    }
}

impl std::str::FromStr for Encoding {
    type Err = ReliableTxtError;

    /// Parse names like `utf8`, `UTF-16`, `utf16r`, `utf16-reverse`, `utf32`
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "utf8" => Ok(Encoding::Utf8),
            "utf16" | "utf16be" => Ok(Encoding::Utf16),
            "utf16r" | "utf16reverse" | "utf16le" => Ok(Encoding::Utf16Reverse),
            "utf32" | "utf32be" => Ok(Encoding::Utf32),
            _ => Err(ReliableTxtError::UnknownEncodingName { name: s.to_string() }),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Preamble size for a raw encoding tag
pub fn preamble_size(tag: u8) -> Result<usize> {
    Encoding::try_from(tag).map(Encoding::preamble_size)
}

/// Preamble bytes for a raw encoding tag
pub fn preamble_bytes(tag: u8) -> Result<&'static [u8]> {
    Encoding::try_from(tag).map(Encoding::preamble_bytes)
}
