//! ReliableTXT document

use crate::base64_string;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::{lines, utf16};

/// Text together with the encoding it is stored in
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Text without the preamble
    pub text: String,
    /// Encoding used when converting to bytes
    pub encoding: Encoding,
}

impl Document {
    /// Create a document with the given text and encoding
    pub fn new(text: impl Into<String>, encoding: Encoding) -> Self {
        Self {
            text: text.into(),
            encoding,
        }
    }

    /// Create a UTF-8 document
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(text, Encoding::Utf8)
    }

    /// Encode to bytes, preamble included
    pub fn to_bytes(&self) -> Vec<u8> {
        Encoder::new().encode(&self.text, self.encoding)
    }

    /// Lines of the text, split on U+000A
    pub fn lines(&self) -> Vec<&str> {
        lines::split(&self.text)
    }

    /// Replace the text with the joined lines
    pub fn set_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        self.text = lines::join(lines);
    }

    /// Code points of the text
    pub fn code_points(&self) -> Vec<u32> {
        self.text.chars().map(u32::from).collect()
    }

    /// Replace the text with the given code points
    ///
    /// Leaves the document untouched if a value is not a scalar value.
    pub fn set_code_points(&mut self, points: &[u32]) -> Result<()> {
        self.text = utf16::from_code_points(points)?;
        Ok(())
    }

    /// Delimited Base64 token of the encoded document
    pub fn to_base64_string(&self) -> String {
        base64_string::from_text(&self.text, self.encoding)
    }

    /// Decode bytes that start with a preamble
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Decoder::new().decode(bytes)
    }

    /// Build a document from lines
    pub fn from_lines<S: AsRef<str>>(lines: &[S], encoding: Encoding) -> Self {
        let mut document = Self::new(String::new(), encoding);
        document.set_lines(lines);
        document
    }

    /// Build a document from code points
    pub fn from_code_points(points: &[u32], encoding: Encoding) -> Result<Self> {
        let mut document = Self::new(String::new(), encoding);
        document.set_code_points(points)?;
        Ok(document)
    }

    /// Decode a delimited Base64 token holding an encoded document
    pub fn from_base64_string(token: &str) -> Result<Self> {
        let bytes = base64_string::to_bytes(token)?;
        Self::from_bytes(&bytes)
    }
}
