//! ReliableTXT decoder

use crate::document::Document;
use crate::encoding::{Encoding, UTF16_PREAMBLE, UTF16_REVERSE_PREAMBLE, UTF32_PREAMBLE, UTF8_PREAMBLE};
use crate::error::{ReliableTxtError, Result};
use crate::utf16::{self, ByteOrder};

/// Decodes ReliableTXT bytes
pub struct Decoder {
    // Currently stateless, decoding is always strict
}

impl Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self {}
    }

    /// Detect the encoding from the first bytes, if any preamble matches
    ///
    /// Checked in the order UTF-8, UTF-16, UTF-16 reverse, UTF-32. None of
    /// the preambles is a prefix of another, so plain prefix matching is enough.
    pub fn encoding_or_none(&self, bytes: &[u8]) -> Option<Encoding> {
        if bytes.starts_with(&UTF8_PREAMBLE) {
            Some(Encoding::Utf8)
        } else if bytes.starts_with(&UTF16_PREAMBLE) {
            Some(Encoding::Utf16)
        } else if bytes.starts_with(&UTF16_REVERSE_PREAMBLE) {
            Some(Encoding::Utf16Reverse)
        } else if bytes.starts_with(&UTF32_PREAMBLE) {
            Some(Encoding::Utf32)
        } else {
            None
        }
    }

    /// Detect the encoding, failing with `NoReliableTxtPreamble`
    pub fn encoding(&self, bytes: &[u8]) -> Result<Encoding> {
        self.encoding_or_none(bytes)
            .ok_or(ReliableTxtError::NoReliableTxtPreamble)
    }

    /// Decode a complete ReliableTXT byte buffer, dropping the preamble
    pub fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let encoding = self.encoding(bytes)?;
        log::trace!("Decoding {} bytes as {}", bytes.len(), encoding);

        let text = match encoding {
            Encoding::Utf8 => utf16::from_utf8_bytes(bytes, true)?,
            Encoding::Utf16 => utf16::from_utf16_bytes(bytes, ByteOrder::BigEndian, true)?,
            Encoding::Utf16Reverse => utf16::from_utf16_bytes(bytes, ByteOrder::LittleEndian, true)?,
            Encoding::Utf32 => utf16::from_utf32_bytes(bytes, ByteOrder::BigEndian, true)?,
        };

        Ok(Document::new(text, encoding))
    }

    /// Decode a fragment that carries no preamble of its own
    ///
    /// A leading U+FEFF is kept as content.
    pub fn decode_part(&self, bytes: &[u8], encoding: Encoding) -> Result<String> {
        match encoding {
            Encoding::Utf8 => utf16::from_utf8_bytes(bytes, false),
            Encoding::Utf16 => utf16::from_utf16_bytes(bytes, ByteOrder::BigEndian, false),
            Encoding::Utf16Reverse => utf16::from_utf16_bytes(bytes, ByteOrder::LittleEndian, false),
            Encoding::Utf32 => utf16::from_utf32_bytes(bytes, ByteOrder::BigEndian, false),
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
