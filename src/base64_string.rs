//! Base64 tokens for ReliableTXT bytes
//!
//! Two forms exist:
//!
//! ```text
//! TWFu            raw: standard alphabet, never padded with '='
//! Base64|TWFu|    delimited: raw payload wrapped in "Base64|" and "|"
//! ```
//!
//! The canonical scheme leaves out the `=` padding, so a final group of one
//! or two bytes becomes two or three characters. Artifacts written by older
//! tools use padded groups; [`Base64Scheme::Padded`] reads and writes those.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::decoder::Decoder;
use crate::document::Document;
use crate::encoder::Encoder;
use crate::encoding::Encoding;
use crate::error::{ReliableTxtError, Result};

pub const PREFIX: &str = "Base64|";
pub const SUFFIX: &str = "|";
const PREFIX_LEN: usize = 7; // len("Base64|")
const SUFFIX_LEN: usize = 1; // len("|")

const UNPADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Which Base64 flavour a token uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Base64Scheme {
    /// No `=` padding; the current format
    #[default]
    Unpadded,
    /// Standard `=`-padded groups, as produced by older tools
    Padded,
}

impl Base64Scheme {
    /// Encode bytes without delimiters
    pub fn encode_raw(self, bytes: &[u8]) -> String {
        match self {
            Base64Scheme::Unpadded => raw_from_bytes(bytes),
            Base64Scheme::Padded => base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Decode a token without delimiters
    pub fn decode_raw(self, raw: &str) -> Result<Vec<u8>> {
        match self {
            Base64Scheme::Unpadded => raw_to_bytes(raw),
            Base64Scheme::Padded => base64::engine::general_purpose::STANDARD
                .decode(raw)
                .map_err(|_| ReliableTxtError::InvalidBase64String),
        }
    }

    /// Encode bytes as a delimited token
    pub fn encode(self, bytes: &[u8]) -> String {
        let raw = self.encode_raw(bytes);
        let mut token = String::with_capacity(PREFIX_LEN + raw.len() + SUFFIX_LEN);
        token.push_str(PREFIX);
        token.push_str(&raw);
        token.push_str(SUFFIX);
        token
    }

    /// Decode a delimited token
    pub fn decode(self, token: &str) -> Result<Vec<u8>> {
        self.decode_raw(strip_delimiters(token)?)
    }
}

/// Result of decoding a token whose content type is not known up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base64Payload {
    /// Bytes without a ReliableTXT preamble
    Bytes(Vec<u8>),
    /// Bytes with a preamble, decoded as a document
    Text(Document),
}

/// Encode bytes without padding or delimiters
pub fn raw_from_bytes(bytes: &[u8]) -> String {
    UNPADDED.encode(bytes)
}

/// Decode an unpadded token without delimiters
///
/// Padding is never accepted, and a length of 1 modulo 4 cannot come out of
/// the encoder.
pub fn raw_to_bytes(raw: &str) -> Result<Vec<u8>> {
    UNPADDED
        .decode(raw)
        .map_err(|_| ReliableTxtError::InvalidBase64String)
}

/// Encode bytes as `Base64|...|`
pub fn from_bytes(bytes: &[u8]) -> String {
    Base64Scheme::Unpadded.encode(bytes)
}

/// Decode a `Base64|...|` token
pub fn to_bytes(token: &str) -> Result<Vec<u8>> {
    Base64Scheme::Unpadded.decode(token)
}

/// Encode text as ReliableTXT bytes, then as a raw token
pub fn raw_from_text(text: &str, encoding: Encoding) -> String {
    raw_from_bytes(&Encoder::new().encode(text, encoding))
}

/// Decode a raw token holding ReliableTXT bytes back to text
pub fn raw_to_text(raw: &str) -> Result<String> {
    let bytes = raw_to_bytes(raw)?;
    Ok(Decoder::new().decode(&bytes)?.text)
}

/// Encode text as ReliableTXT bytes, then as a delimited token
pub fn from_text(text: &str, encoding: Encoding) -> String {
    from_bytes(&Encoder::new().encode(text, encoding))
}

/// Decode a delimited token holding ReliableTXT bytes back to text
pub fn to_text(token: &str) -> Result<String> {
    let bytes = to_bytes(token)?;
    Ok(Decoder::new().decode(&bytes)?.text)
}

/// Decode a delimited token, returning a document when the bytes carry a preamble
pub fn decode(token: &str) -> Result<Base64Payload> {
    classify(to_bytes(token)?)
}

/// Decode a raw token, returning a document when the bytes carry a preamble
pub fn raw_decode(raw: &str) -> Result<Base64Payload> {
    classify(raw_to_bytes(raw)?)
}

fn classify(bytes: Vec<u8>) -> Result<Base64Payload> {
    let decoder = Decoder::new();
    if decoder.encoding_or_none(&bytes).is_some() {
        Ok(Base64Payload::Text(decoder.decode(&bytes)?))
    } else {
        Ok(Base64Payload::Bytes(bytes))
    }
}

fn strip_delimiters(token: &str) -> Result<&str> {
    if !token.starts_with(PREFIX) || token.len() < PREFIX_LEN + SUFFIX_LEN || !token.ends_with(SUFFIX) {
        return Err(ReliableTxtError::InvalidBase64String);
    }
    Ok(&token[PREFIX_LEN..token.len() - SUFFIX_LEN])
}
