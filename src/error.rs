//! Error types shared by the encoding core

/// Error type for ReliableTXT encoding, decoding and Base64 handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReliableTxtError {
    /// A UTF-16 code unit sequence contains an unpaired or misordered surrogate
    InvalidUtf16String,
    /// Bytes could not be decoded under the claimed encoding
    StringDecoding,
    /// The byte buffer does not start with any known preamble
    NoReliableTxtPreamble,
    /// Malformed raw or delimited Base64 text
    InvalidBase64String,
    /// Encoding tag outside the four defined encodings
    InvalidEncoding { tag: u8 },
    /// Encoding name that does not map to any encoding
    UnknownEncodingName { name: String },
    /// Code unit index past the end of the text
    IndexOutOfRange { index: usize, length: usize },
}

impl std::fmt::Display for ReliableTxtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReliableTxtError::InvalidUtf16String => {
                write!(f, "Invalid UTF16 string")
            }
            ReliableTxtError::StringDecoding => {
                write!(f, "Could not decode string")
            }
            ReliableTxtError::NoReliableTxtPreamble => {
                write!(f, "Document does not have a ReliableTXT preamble")
            }
            ReliableTxtError::InvalidBase64String => {
                write!(f, "Invalid Base64 string")
            }
            ReliableTxtError::InvalidEncoding { tag } => {
                write!(f, "Invalid encoding tag: {}", tag)
            }
            ReliableTxtError::UnknownEncodingName { name } => {
                write!(f, "Unknown encoding name: '{}' (expected utf8, utf16, utf16r or utf32)", name)
            }
            ReliableTxtError::IndexOutOfRange { index, length } => {
                write!(f, "Code unit index {} out of range (length {})", index, length)
            }
        }
    }
}

impl std::error::Error for ReliableTxtError {}

/// Result alias used throughout the encoding core
pub type Result<T> = std::result::Result<T, ReliableTxtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(ReliableTxtError::InvalidUtf16String.to_string(), "Invalid UTF16 string");
        assert_eq!(ReliableTxtError::StringDecoding.to_string(), "Could not decode string");
        assert_eq!(
            ReliableTxtError::NoReliableTxtPreamble.to_string(),
            "Document does not have a ReliableTXT preamble"
        );
        assert_eq!(ReliableTxtError::InvalidBase64String.to_string(), "Invalid Base64 string");
    }

    #[test]
    fn test_error_converts_to_anyhow() {
        let err: anyhow::Error = ReliableTxtError::InvalidEncoding { tag: 4 }.into();
        assert_eq!(
            err.downcast_ref::<ReliableTxtError>(),
            Some(&ReliableTxtError::InvalidEncoding { tag: 4 })
        );
    }
}
