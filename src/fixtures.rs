//! Reference fixture files
//!
//! [`generate`] writes a set of valid and invalid ReliableTXT files that
//! other implementations can be checked against. Valid samples come in all
//! four encodings and are read back after writing:
//!
//! ```text
//! Example03_FourLines_UTF8.txt
//! Example03_FourLines_UTF16.txt
//! Example03_FourLines_UTF16R.txt
//! Example03_FourLines_UTF32.txt
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::encoding::Encoding;
use crate::file;
use crate::utf16::{self, ByteOrder};

pub const TABLE: &str = concat!(
    "a \tU+0061    61            0061        \"Latin Small Letter A\"\n",
    "~ \tU+007E    7E            007E        Tilde\n",
    "\u{A5} \tU+00A5    C2_A5         00A5        \"Yen Sign\"\n",
    "\u{BB} \tU+00BB    C2_BB         00BB        \"Right-Pointing Double Angle Quotation Mark\"\n",
    "\u{BD} \tU+00BD    C2_BD         00BD        \"Vulgar Fraction One Half\"\n",
    "\u{BF} \tU+00BF    C2_BF         00BF        \"Inverted Question Mark\"\n",
    "\u{DF} \tU+00DF    C3_9F         00DF        \"Latin Small Letter Sharp S\"\n",
    "\u{E4} \tU+00E4    C3_A4         00E4        \"Latin Small Letter A with Diaeresis\"\n",
    "\u{EF} \tU+00EF    C3_AF         00EF        \"Latin Small Letter I with Diaeresis\"\n",
    "\u{153} \tU+0153    C5_93         0153        \"Latin Small Ligature Oe\"\n",
    "\u{20AC} \tU+20AC    E2_82_AC      20AC        \"Euro Sign\"\n",
    "\u{6771} \tU+6771    E6_9D_B1      6771        \"CJK Unified Ideograph-6771\"\n",
    "\u{1D11E} \tU+1D11E   F0_9D_84_9E   D834_DD1E   \"Musical Symbol G Clef\"\n",
    "\u{20007} \tU+20007   F0_A0_80_87   D840_DC07   \"CJK Unified Ideograph-20007\"",
);

pub const FOUR_LINES: &str = "Line 1\nLine 2\nLine 3\n";

pub const UNICODE_LINE_BREAKS: &str = concat!(
    "Line1| Line Feed (U+000A):\n",
    "Line2| Line Tabulation (U+000B):'\u{0B}' Form Feed (U+000C):'\u{0C}' Carriage Return (U+000D):'\r' ",
    "Next Line (U+0085):'\u{85}' Line Separator (U+2028):'\u{2028}' Paragraph Separator (U+2029):'\u{2029}'\n",
    "Line3|",
);

const CORRUPT_DATA: [(&str, &[u8]); 4] = [
    ("UTF8", &[0xEF, 0xBB, 0xBF, 0xFF]),
    ("UTF16", &[0xFE, 0xFF, 0xD8, 0x40, 0x00, 0x61]),
    ("UTF16R", &[0xFF, 0xFE, 0x40, 0xD8, 0x61, 0x00]),
    ("UTF32", &[0x00, 0x00, 0xFE, 0xFF, 0x00, 0x11, 0x00, 0x00]),
];

/// Two lines of 1000 numbered words each
pub fn long_lines() -> String {
    let mut text = String::with_capacity(2 * 1000 * 13 + 1);
    for letter in ['A', 'B'] {
        if letter == 'B' {
            text.push('\n');
        }
        for i in 0..1000 {
            text.push_str(&format!("LongLine{}_{:03}", letter, i));
        }
    }
    text
}

/// Every C0 control character, U+0000 through U+001F
pub fn c0_controls() -> String {
    ('\u{0}'..='\u{1F}').collect()
}

/// The first 100 CJK unified ideographs
pub fn cjk() -> String {
    ('\u{4E00}'..'\u{4E64}').collect()
}

/// Named texts written in every encoding
pub fn examples() -> Vec<(&'static str, String)> {
    vec![
        ("Example01_Table", TABLE.to_string()),
        ("Example02_Empty", String::new()),
        ("Example03_FourLines", FOUR_LINES.to_string()),
        ("Example04_LongLines", long_lines()),
        ("Example05_C0", c0_controls()),
        ("Example06_UnicodeLineBreaks", UNICODE_LINE_BREAKS.to_string()),
        ("Example07_CJK", cjk()),
    ]
}

/// File name suffix used for an encoding
pub fn suffix(encoding: Encoding) -> &'static str {
    match encoding {
        Encoding::Utf8 => "UTF8",
        Encoding::Utf16 => "UTF16",
        Encoding::Utf16Reverse => "UTF16R",
        Encoding::Utf32 => "UTF32",
    }
}

/// Write every fixture into `dir` and return the written paths
///
/// Fails if a valid sample does not read back with the same text and encoding.
pub fn generate(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut written = Vec::new();
    for (name, text) in examples() {
        for encoding in Encoding::ALL {
            let path = dir.join(format!("{}_{}.txt", name, suffix(encoding)));
            generate_file(&text, &path, encoding)?;
            written.push(path);
        }
    }

    written.extend(generate_missing_preamble(dir)?);
    written.extend(generate_corrupt_data(dir)?);

    log::info!("Generated {} fixtures in {}", written.len(), dir.display());
    Ok(written)
}

fn generate_file(text: &str, path: &Path, encoding: Encoding) -> Result<()> {
    file::write_all_text(text, path, encoding)?;

    let document = file::load(path)?;
    if document.text != text {
        anyhow::bail!("Mismatching text: {}", path.display());
    }
    if document.encoding != encoding {
        anyhow::bail!("Mismatching encoding: {} (expected {}, found {})", path.display(), encoding, document.encoding);
    }
    Ok(())
}

fn generate_missing_preamble(dir: &Path) -> Result<Vec<PathBuf>> {
    let name = "InvalidExample01_Table";
    let samples = [
        ("UTF8_withoutBOM", TABLE.as_bytes().to_vec()),
        ("UTF16_withoutBOM", utf16::str_to_utf16_bytes(TABLE, ByteOrder::BigEndian)),
        ("UTF16R_withoutBOM", utf16::str_to_utf16_bytes(TABLE, ByteOrder::LittleEndian)),
        ("UTF32_withoutBOM", utf16::str_to_utf32_bytes(TABLE, ByteOrder::BigEndian)),
        ("UTF32R_withoutBOM", utf16::str_to_utf32_bytes(TABLE, ByteOrder::LittleEndian)),
        // Little endian UTF-32 is not a ReliableTXT encoding
        ("UTF32R", utf16::str_to_utf32_bytes(&format!("\u{FEFF}{}", TABLE), ByteOrder::LittleEndian)),
    ];

    samples
        .iter()
        .map(|(suffix, bytes)| write_bytes(&dir.join(format!("{}_{}.txt", name, suffix)), bytes))
        .collect()
}

fn generate_corrupt_data(dir: &Path) -> Result<Vec<PathBuf>> {
    let name = "InvalidExample02_CorruptData";
    CORRUPT_DATA
        .iter()
        .map(|(suffix, bytes)| write_bytes(&dir.join(format!("{}_{}.txt", name, suffix)), bytes))
        .collect()
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    fs::write(path, bytes).with_context(|| format!("Failed to write: {}", path.display()))?;
    log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use crate::error::ReliableTxtError;
    use tempfile::TempDir;

    #[test]
    fn test_example_texts() {
        assert_eq!(TABLE.lines().count(), 14);
        assert!(TABLE.ends_with("\"CJK Unified Ideograph-20007\""));
        assert_eq!(c0_controls().chars().count(), 32);
        assert_eq!(cjk().chars().count(), 100);
        assert!(cjk().ends_with('\u{4E63}'));

        let long = long_lines();
        let lines: Vec<&str> = long.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 13000);
        assert!(lines[0].starts_with("LongLineA_000LongLineA_001"));
        assert!(lines[1].ends_with("LongLineB_999"));
    }

    #[test]
    fn test_generate() {
        let dir = TempDir::new().unwrap();
        let written = generate(dir.path()).unwrap();
        assert_eq!(written.len(), 7 * 4 + 6 + 4);
        assert!(written.iter().all(|path| path.exists()));

        let document = file::load(dir.path().join("Example03_FourLines_UTF16R.txt")).unwrap();
        assert_eq!(document.text, FOUR_LINES);
        assert_eq!(document.encoding, Encoding::Utf16Reverse);

        let bytes = fs::read(dir.path().join("Example02_Empty_UTF32.txt")).unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0xFE, 0xFF]);
    }

    #[test]
    fn test_invalid_fixtures_fail_to_load() {
        let dir = TempDir::new().unwrap();
        generate(dir.path()).unwrap();

        for suffix in [
            "UTF8_withoutBOM",
            "UTF16_withoutBOM",
            "UTF16R_withoutBOM",
            "UTF32_withoutBOM",
            "UTF32R_withoutBOM",
        ] {
            let path = dir.path().join(format!("InvalidExample01_Table_{}.txt", suffix));
            assert!(file::load(&path).is_err(), "{}", suffix);
        }

        // FF FE 00 00 looks like a UTF-16 reverse preamble followed by U+0000
        let bytes = fs::read(dir.path().join("InvalidExample01_Table_UTF32R.txt")).unwrap();
        assert_eq!(Decoder::new().encoding_or_none(&bytes), Some(Encoding::Utf16Reverse));

        for (suffix, _) in CORRUPT_DATA {
            let path = dir.path().join(format!("InvalidExample02_CorruptData_{}.txt", suffix));
            let err = file::load(&path).unwrap_err();
            assert_eq!(err.downcast_ref::<ReliableTxtError>(), Some(&ReliableTxtError::StringDecoding));
        }
    }
}
