//! Reading and writing ReliableTXT files
//!
//! Whole-file helpers on top of [`Encoder`] and [`Decoder`]. Appending never
//! rewrites the preamble: the encoding of an existing file is detected and
//! the new text is encoded to match.

use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::decoder::Decoder;
use crate::document::Document;
use crate::encoder::Encoder;
use crate::encoding::Encoding;
use crate::error::ReliableTxtError;
use crate::lines;

// Longest preamble (UTF-32)
const MAX_PREAMBLE_SIZE: usize = 4;

/// Detect the encoding of a file from its first bytes
pub fn encoding_or_none(path: impl AsRef<Path>) -> Result<Option<Encoding>> {
    let path = path.as_ref();
    let file = fs::File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;

    let mut head = Vec::with_capacity(MAX_PREAMBLE_SIZE);
    file.take(MAX_PREAMBLE_SIZE as u64)
        .read_to_end(&mut head)
        .with_context(|| format!("Failed to read: {}", path.display()))?;

    Ok(Decoder::new().encoding_or_none(&head))
}

/// Detect the encoding of a file, failing if it has no preamble
pub fn encoding(path: impl AsRef<Path>) -> Result<Encoding> {
    let path = path.as_ref();
    encoding_or_none(path)?
        .ok_or(ReliableTxtError::NoReliableTxtPreamble)
        .with_context(|| format!("Not a ReliableTXT file: {}", path.display()))
}

/// Load and decode a whole file
pub fn load(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    let document = Decoder::new()
        .decode(&bytes)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    log::debug!("Loaded {} ({} bytes, {})", path.display(), bytes.len(), document.encoding);
    Ok(document)
}

/// Encode a document and write it, replacing any existing file
pub fn save(document: &Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = document.to_bytes();
    fs::write(path, &bytes).with_context(|| format!("Failed to write: {}", path.display()))?;
    log::debug!("Saved {} ({} bytes, {})", path.display(), bytes.len(), document.encoding);
    Ok(())
}

/// Load a file and return its text
pub fn read_all_text(path: impl AsRef<Path>) -> Result<String> {
    Ok(load(path)?.text)
}

/// Load a file and split its text into lines
pub fn read_all_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = read_all_text(path)?;
    Ok(lines::split(&text).into_iter().map(String::from).collect())
}

/// Write text with the preamble of `encoding`, replacing any existing file
pub fn write_all_text(text: &str, path: impl AsRef<Path>, encoding: Encoding) -> Result<()> {
    save(&Document::new(text, encoding), path)
}

/// Join lines and write them with the preamble of `encoding`
pub fn write_all_lines<S: AsRef<str>>(lines: &[S], path: impl AsRef<Path>, encoding: Encoding) -> Result<()> {
    save(&Document::from_lines(lines, encoding), path)
}

/// Append text, creating the file with `create_with` if it does not exist
pub fn append_all_text(text: &str, path: impl AsRef<Path>, create_with: Encoding) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return write_all_text(text, path, create_with);
    }
    let encoding = encoding(path)?;
    append_part(path, &Encoder::new().encode_part(text, encoding))
}

/// Append lines to the last line of a file
///
/// A line feed separates the existing content from the new lines unless the
/// file holds nothing but its preamble.
pub fn append_all_lines<S: AsRef<str>>(lines: &[S], path: impl AsRef<Path>, create_with: Encoding) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return write_all_lines(lines, path, create_with);
    }
    let encoding = encoding(path)?;
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to stat: {}", path.display()))?
        .len();

    let mut text = lines::join(lines);
    if size != encoding.preamble_size() as u64 {
        text.insert(0, lines::LINE_FEED);
    }
    append_part(path, &Encoder::new().encode_part(&text, encoding))
}

fn append_part(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open for append: {}", path.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("Failed to append: {}", path.display()))?;
    log::debug!("Appended {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");

        for encoding in Encoding::ALL {
            let document = Document::new("a\n\u{1D11E}", encoding);
            save(&document, &path).unwrap();
            assert_eq!(fs::read(&path).unwrap(), document.to_bytes());
            assert_eq!(load(&path).unwrap(), document);
        }
    }

    #[test]
    fn test_encoding_detection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");

        write_all_text("abc", &path, Encoding::Utf16Reverse).unwrap();
        assert_eq!(encoding_or_none(&path).unwrap(), Some(Encoding::Utf16Reverse));
        assert_eq!(encoding(&path).unwrap(), Encoding::Utf16Reverse);

        fs::write(&path, b"abc").unwrap();
        assert_eq!(encoding_or_none(&path).unwrap(), None);
        let err = encoding(&path).unwrap_err();
        assert_eq!(err.downcast_ref::<ReliableTxtError>(), Some(&ReliableTxtError::NoReliableTxtPreamble));

        fs::write(&path, b"").unwrap();
        assert_eq!(encoding_or_none(&path).unwrap(), None);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load(dir.path().join("missing.txt")).is_err());
        assert!(encoding_or_none(dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_load_invalid_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, [0xEF, 0xBB, 0xBF, 0xFF]).unwrap();
        let err = load(&path).unwrap_err();
        assert_eq!(err.downcast_ref::<ReliableTxtError>(), Some(&ReliableTxtError::StringDecoding));
    }

    #[test]
    fn test_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lines.txt");

        write_all_lines(&["Line 1", "Line 2", ""], &path, Encoding::Utf32).unwrap();
        assert_eq!(read_all_text(&path).unwrap(), "Line 1\nLine 2\n");
        assert_eq!(read_all_lines(&path).unwrap(), vec!["Line 1", "Line 2", ""]);
    }

    #[test]
    fn test_append_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("append.txt");

        append_all_text("ab", &path, Encoding::Utf16).unwrap();
        append_all_text("c", &path, Encoding::Utf8).unwrap();
        let document = load(&path).unwrap();
        assert_eq!(document.text, "abc");
        assert_eq!(document.encoding, Encoding::Utf16);
    }

    #[test]
    fn test_append_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("append.txt");

        write_all_text("", &path, Encoding::Utf32).unwrap();
        append_all_lines(&["a", "b"], &path, Encoding::Utf8).unwrap();
        assert_eq!(read_all_text(&path).unwrap(), "a\nb");

        append_all_lines(&["c"], &path, Encoding::Utf8).unwrap();
        assert_eq!(read_all_text(&path).unwrap(), "a\nb\nc");
        assert_eq!(encoding(&path).unwrap(), Encoding::Utf32);
    }

    #[test]
    fn test_append_lines_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.txt");

        append_all_lines(&["x", "y"], &path, Encoding::Utf16Reverse).unwrap();
        let document = load(&path).unwrap();
        assert_eq!(document.text, "x\ny");
        assert_eq!(document.encoding, Encoding::Utf16Reverse);
    }

    #[test]
    fn test_append_requires_preamble() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, b"plain").unwrap();
        assert!(append_all_text("x", &path, Encoding::Utf8).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"plain");
    }
}
