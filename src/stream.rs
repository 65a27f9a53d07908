//! Line-oriented streaming over ReliableTXT files
//!
//! [`StreamReader`] reads a file in fixed-size chunks and hands out one line
//! at a time, so large files never have to be held in memory. The line feed
//! is matched as a whole encoded code unit, which works for every encoding:
//!
//! ```text
//! UTF-8          0A
//! UTF-16         00 0A
//! UTF-16 reverse 0A 00
//! UTF-32         00 00 00 0A
//! ```
//!
//! [`StreamWriter`] appends text and lines without rewriting the preamble.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::encoding::Encoding;
use crate::file;

// Enough bytes to recognize any preamble
const MIN_CHUNK_SIZE: usize = 4;

/// Options shared by [`StreamReader`] and [`StreamWriter`]
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Number of bytes read from the file at a time
    pub chunk_size: usize,
    /// Encoding of files the writer creates
    pub create_with: Encoding,
    /// Keep the content of an existing file when opening a writer
    pub append: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            create_with: Encoding::Utf8,
            append: true,
        }
    }
}

impl StreamOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_create_with(mut self, encoding: Encoding) -> Self {
        self.create_with = encoding;
        self
    }

    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }
}

/// Reads a ReliableTXT file line by line
pub struct StreamReader {
    file: File,
    encoding: Encoding,
    decoder: Decoder,
    chunk: Vec<u8>,
    // Bytes read but not yet returned as lines
    pending: Vec<u8>,
    // Offset in `pending` up to which no line feed was found
    scanned: usize,
    eof: bool,
    done: bool,
}

impl StreamReader {
    /// Open a file and consume its preamble
    ///
    /// Fails if the file has no ReliableTXT preamble.
    pub fn open(path: impl AsRef<Path>, options: &StreamOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let chunk_size = options.chunk_size.max(MIN_CHUNK_SIZE);

        let mut reader = Self {
            file,
            encoding: Encoding::default(),
            decoder: Decoder::new(),
            chunk: vec![0; chunk_size],
            pending: Vec::new(),
            scanned: 0,
            eof: false,
            done: false,
        };

        while reader.pending.len() < MIN_CHUNK_SIZE && !reader.eof {
            reader.fill()?;
        }
        reader.encoding = reader
            .decoder
            .encoding(&reader.pending)
            .with_context(|| format!("Not a ReliableTXT file: {}", path.display()))?;
        reader.pending.drain(..reader.encoding.preamble_size());

        log::debug!("Opened {} for reading ({})", path.display(), reader.encoding);
        Ok(reader)
    }

    /// Encoding detected from the preamble
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Read the next line without its line feed
    ///
    /// The last line is returned even when empty, so a file holding only a
    /// preamble yields one empty line. Returns `None` once every line has
    /// been read.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        if self.done {
            return Ok(None);
        }

        loop {
            if let Some(end) = self.find_line_feed() {
                let unit = self.encoding.line_feed_bytes().len();
                let line: Vec<u8> = self.pending.drain(..end + unit).take(end).collect();
                self.scanned = 0;
                return self.decode_line(&line).map(Some);
            }

            if self.eof {
                self.done = true;
                let line = std::mem::take(&mut self.pending);
                return self.decode_line(&line).map(Some);
            }

            if let Err(err) = self.fill() {
                self.done = true;
                return Err(err);
            }
        }
    }

    fn find_line_feed(&mut self) -> Option<usize> {
        let line_feed = self.encoding.line_feed_bytes();
        let unit = line_feed.len();
        let found = self.pending[self.scanned..]
            .chunks_exact(unit)
            .position(|candidate| candidate == line_feed)
            .map(|i| self.scanned + i * unit);
        if found.is_none() {
            self.scanned = self.pending.len() - self.pending.len() % unit;
        }
        found
    }

    fn fill(&mut self) -> Result<()> {
        let read = self.file.read(&mut self.chunk).context("Failed to read chunk")?;
        if read == 0 {
            self.eof = true;
        } else {
            self.pending.extend_from_slice(&self.chunk[..read]);
        }
        Ok(())
    }

    fn decode_line(&self, bytes: &[u8]) -> Result<String> {
        Ok(self.decoder.decode_part(bytes, self.encoding)?)
    }
}

impl Iterator for StreamReader {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}

/// Appends text and lines to a ReliableTXT file
pub struct StreamWriter {
    writer: BufWriter<File>,
    encoding: Encoding,
    encoder: Encoder,
    // Nothing but the preamble has been written so far
    is_empty: bool,
}

impl StreamWriter {
    /// Open a file for writing
    ///
    /// With `append` set, an existing file keeps its content and encoding.
    /// Otherwise, or when the file does not exist, it is created with
    /// `create_with` and holds only the preamble.
    pub fn open(path: impl AsRef<Path>, options: &StreamOptions) -> Result<Self> {
        let path = path.as_ref();

        if options.append && path.exists() {
            let encoding = file::encoding(path)?;
            let size = fs::metadata(path)
                .with_context(|| format!("Failed to stat: {}", path.display()))?
                .len();
            let handle = OpenOptions::new()
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open for append: {}", path.display()))?;

            log::debug!("Opened {} for appending ({})", path.display(), encoding);
            return Ok(Self {
                writer: BufWriter::new(handle),
                encoding,
                encoder: Encoder::new(),
                is_empty: size == encoding.preamble_size() as u64,
            });
        }

        let encoding = options.create_with;
        let mut handle = File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
        handle
            .write_all(encoding.preamble_bytes())
            .with_context(|| format!("Failed to write: {}", path.display()))?;

        log::debug!("Created {} for writing ({})", path.display(), encoding);
        Ok(Self {
            writer: BufWriter::new(handle),
            encoding,
            encoder: Encoder::new(),
            is_empty: true,
        })
    }

    /// Encoding the writer uses
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Append text as is
    pub fn write(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.is_empty = false;
        self.writer
            .write_all(&self.encoder.encode_part(text, self.encoding))
            .context("Failed to write text")?;
        Ok(())
    }

    /// Append a line, starting a new one unless nothing has been written yet
    ///
    /// An empty first line still counts, so the next line is separated from it.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        if self.is_empty {
            self.is_empty = false;
            return self.write(line);
        }
        let mut text = String::with_capacity(line.len() + 1);
        text.push(crate::lines::LINE_FEED);
        text.push_str(line);
        self.write(&text)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush")?;
        Ok(())
    }

    /// Flush and close the file
    ///
    /// Dropping the writer also flushes, but can only log a failure.
    pub fn close(mut self) -> Result<()> {
        self.flush()
    }
}

impl Drop for StreamWriter {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            log::warn!("Failed to flush on drop: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReliableTxtError;
    use tempfile::TempDir;

    fn read_all(path: &Path, chunk_size: usize) -> Vec<String> {
        let options = StreamOptions::default().with_chunk_size(chunk_size);
        StreamReader::open(path, &options)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_default_options() {
        let options = StreamOptions::default();
        assert_eq!(options.chunk_size, 4096);
        assert_eq!(options.create_with, Encoding::Utf8);
        assert!(options.append);
    }

    #[test]
    fn test_read_lines_all_encodings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lines.txt");
        let text = "Line 1\n\u{1D11E}\u{6771}\n\nlast";

        for encoding in Encoding::ALL {
            file::write_all_text(text, &path, encoding).unwrap();
            for chunk_size in [1, 3, 5, 4096] {
                assert_eq!(
                    read_all(&path, chunk_size),
                    vec!["Line 1", "\u{1D11E}\u{6771}", "", "last"],
                    "{} chunk {}",
                    encoding,
                    chunk_size
                );
            }
        }
    }

    #[test]
    fn test_read_trailing_line_feed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lines.txt");
        file::write_all_text("a\n", &path, Encoding::Utf16).unwrap();
        assert_eq!(read_all(&path, 4096), vec!["a", ""]);
    }

    #[test]
    fn test_read_preamble_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        file::write_all_text("", &path, Encoding::Utf32).unwrap();

        let mut reader = StreamReader::open(&path, &StreamOptions::default()).unwrap();
        assert_eq!(reader.encoding(), Encoding::Utf32);
        assert_eq!(reader.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(reader.read_line().unwrap(), None);
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_line_feed_must_be_aligned() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("aligned.txt");
        // U+0A00 and U+000A share a 0A byte in UTF-16
        file::write_all_text("\u{0A00}\u{0A0A}\nb", &path, Encoding::Utf16).unwrap();
        assert_eq!(read_all(&path, 3), vec!["\u{0A00}\u{0A0A}", "b"]);
        file::write_all_text("\u{0A00}\u{0A0A}\nb", &path, Encoding::Utf16Reverse).unwrap();
        assert_eq!(read_all(&path, 3), vec!["\u{0A00}\u{0A0A}", "b"]);
    }

    #[test]
    fn test_open_without_preamble() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, b"plain").unwrap();
        let err = StreamReader::open(&path, &StreamOptions::default()).err().unwrap();
        assert_eq!(err.downcast_ref::<ReliableTxtError>(), Some(&ReliableTxtError::NoReliableTxtPreamble));
    }

    #[test]
    fn test_invalid_line_reports_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, [0xEF, 0xBB, 0xBF, 0x61, 0x0A, 0xFF, 0x0A, 0x62]).unwrap();

        let mut reader = StreamReader::open(&path, &StreamOptions::default()).unwrap();
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("a"));
        let err = reader.read_line().unwrap_err();
        assert_eq!(err.downcast_ref::<ReliableTxtError>(), Some(&ReliableTxtError::StringDecoding));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_writer_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let options = StreamOptions::default().with_create_with(Encoding::Utf16Reverse);

        let mut writer = StreamWriter::open(&path, &options).unwrap();
        assert_eq!(writer.encoding(), Encoding::Utf16Reverse);
        writer.write_line("a").unwrap();
        writer.write_line("b").unwrap();
        writer.write("c").unwrap();
        writer.close().unwrap();

        let document = file::load(&path).unwrap();
        assert_eq!(document.text, "a\nbc");
        assert_eq!(document.encoding, Encoding::Utf16Reverse);
    }

    #[test]
    fn test_writer_empty_first_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        let mut writer = StreamWriter::open(&path, &StreamOptions::default()).unwrap();
        writer.write_line("").unwrap();
        writer.write_line("").unwrap();
        writer.write_line("x").unwrap();
        writer.close().unwrap();

        assert_eq!(file::read_all_text(&path).unwrap(), "\n\nx");
    }

    #[test]
    fn test_writer_appends_with_existing_encoding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        file::write_all_text("first", &path, Encoding::Utf32).unwrap();

        let mut writer = StreamWriter::open(&path, &StreamOptions::default()).unwrap();
        assert_eq!(writer.encoding(), Encoding::Utf32);
        writer.write_line("second").unwrap();
        writer.close().unwrap();

        let document = file::load(&path).unwrap();
        assert_eq!(document.text, "first\nsecond");
        assert_eq!(document.encoding, Encoding::Utf32);
    }

    #[test]
    fn test_writer_appends_to_preamble_only_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        file::write_all_text("", &path, Encoding::Utf16).unwrap();

        let mut writer = StreamWriter::open(&path, &StreamOptions::default()).unwrap();
        writer.write_line("only").unwrap();
        writer.close().unwrap();

        assert_eq!(file::read_all_text(&path).unwrap(), "only");
    }

    #[test]
    fn test_writer_flushes_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        {
            let mut writer = StreamWriter::open(&path, &StreamOptions::default()).unwrap();
            writer.write_line("kept").unwrap();
            writer.write_line("too").unwrap();
        }

        assert_eq!(file::read_all_text(&path).unwrap(), "kept\ntoo");
    }

    #[test]
    fn test_writer_truncates_without_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        file::write_all_text("old", &path, Encoding::Utf32).unwrap();

        let options = StreamOptions::default().with_append(false);
        let mut writer = StreamWriter::open(&path, &options).unwrap();
        writer.write_line("new").unwrap();
        writer.close().unwrap();

        let document = file::load(&path).unwrap();
        assert_eq!(document.text, "new");
        assert_eq!(document.encoding, Encoding::Utf8);
    }

    #[test]
    fn test_write_then_stream_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("round.txt");
        let lines: Vec<String> = (0..500).map(|i| format!("Line {:03} \u{1D11E}", i)).collect();

        for encoding in Encoding::ALL {
            let options = StreamOptions::default().with_create_with(encoding).with_append(false);
            let mut writer = StreamWriter::open(&path, &options).unwrap();
            for line in &lines {
                writer.write_line(line).unwrap();
            }
            writer.close().unwrap();

            assert_eq!(read_all(&path, 64), lines);
        }
    }
}
