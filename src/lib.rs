//! # reliabletxt
//!
//! ReliableTXT encoding: Unicode text files whose encoding is always known
//! from a mandatory preamble.
//!
//! ## Encodings
//!
//! A ReliableTXT file starts with one of four preambles, which is the
//! byte-order mark in that encoding:
//!
//! ```text
//! UTF-8           EF BB BF
//! UTF-16          FE FF
//! UTF-16 reverse  FF FE        (little endian UTF-16)
//! UTF-32          00 00 FE FF
//! ```
//!
//! Bytes without one of these preambles are not ReliableTXT and are rejected.
//! Decoding is strict: overlong sequences, lone surrogates and values above
//! U+10FFFF are errors, never replaced.
//!
//! ## Lines
//!
//! U+000A is the only line separator. Splitting N line feeds always gives
//! N + 1 lines, and joining inserts U+000A between lines, so the two are
//! exact inverses. Other Unicode line breaks are plain characters.
//!
//! ## Base64
//!
//! Encoded documents can be carried as text with delimited Base64 tokens:
//!
//! ```text
//! Base64|77u/TWFu|
//! ```
//!
//! The payload uses the standard alphabet without `=` padding.
//!
//! ## Example
//!
//! ```
//! use reliabletxt::{Document, Encoding};
//!
//! let document = Document::new("Line 1\nLine 2", Encoding::Utf16);
//! let bytes = document.to_bytes();
//! assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
//!
//! let decoded = Document::from_bytes(&bytes).unwrap();
//! assert_eq!(decoded.lines(), vec!["Line 1", "Line 2"]);
//! ```

pub mod base64_string;
pub mod decoder;
pub mod document;
pub mod encoder;
pub mod encoding;
pub mod error;
pub mod file;
pub mod fixtures;
pub mod lines;
pub mod stream;
pub mod utf16;

pub use base64_string::{Base64Payload, Base64Scheme};
pub use decoder::Decoder;
pub use document::Document;
pub use encoder::Encoder;
pub use encoding::Encoding;
pub use error::{ReliableTxtError, Result};
pub use lines::LineInfo;
pub use stream::{StreamOptions, StreamReader, StreamWriter};
pub use utf16::ByteOrder;
