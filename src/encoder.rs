//! ReliableTXT encoder

use crate::encoding::Encoding;
use crate::error::Result;
use crate::utf16::{self, ByteOrder};

/// Encodes text into ReliableTXT bytes
pub struct Encoder {
    // Currently stateless, all options live in the encoding tag
}

impl Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {}
    }

    /// Encode text with the preamble of the given encoding in front
    pub fn encode(&self, text: &str, encoding: Encoding) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(encoding.preamble_size() + text.len());
        bytes.extend_from_slice(encoding.preamble_bytes());
        bytes.extend_from_slice(&self.encode_part(text, encoding));
        bytes
    }

    /// Encode text without a preamble, e.g. when appending to an existing file
    pub fn encode_part(&self, text: &str, encoding: Encoding) -> Vec<u8> {
        match encoding {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Utf16 => utf16::str_to_utf16_bytes(text, ByteOrder::BigEndian),
            Encoding::Utf16Reverse => utf16::str_to_utf16_bytes(text, ByteOrder::LittleEndian),
            Encoding::Utf32 => utf16::str_to_utf32_bytes(text, ByteOrder::BigEndian),
        }
    }

    /// Encode raw UTF-16 code units with a preamble
    ///
    /// Fails with `InvalidUtf16String` if the units contain a lone surrogate.
    pub fn encode_units(&self, units: &[u16], encoding: Encoding) -> Result<Vec<u8>> {
        let mut with_preamble = Vec::with_capacity(units.len() + 1);
        with_preamble.push(utf16::BOM);
        with_preamble.extend_from_slice(units);
        self.encode_units_part(&with_preamble, encoding)
    }

    /// Encode raw UTF-16 code units without a preamble
    pub fn encode_units_part(&self, units: &[u16], encoding: Encoding) -> Result<Vec<u8>> {
        match encoding {
            Encoding::Utf8 => utf16::to_utf8_bytes(units),
            Encoding::Utf16 => utf16::to_utf16_bytes(units, ByteOrder::BigEndian),
            Encoding::Utf16Reverse => utf16::to_utf16_bytes(units, ByteOrder::LittleEndian),
            Encoding::Utf32 => utf16::to_utf32_bytes(units, ByteOrder::BigEndian),
        }
    }

    /// Encode text directly to a writer
    pub fn encode_to_writer<W: std::io::Write>(&self, text: &str, encoding: Encoding, mut writer: W) -> anyhow::Result<()> {
        let encoded = self.encode(text, encoding);
        writer.write_all(&encoded)?;
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
