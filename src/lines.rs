//! Splitting and joining text on line feeds

use crate::error::{ReliableTxtError, Result};
use crate::utf16::{is_high_surrogate, is_low_surrogate};

/// The only line separator ReliableTXT knows about
pub const LINE_FEED: char = '\n';

const LINE_FEED_UNIT: u16 = 0x0A;

/// Position of a code unit offset expressed in scalar values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineInfo {
    /// Scalar value index reported for the offset, counted from the start of its line
    pub char_index: usize,
    /// Zero based line number
    pub line_index: usize,
    /// Scalar value index within the line
    pub line_char_index: usize,
}

/// Split on U+000A only
///
/// N line feeds always give N + 1 lines, so empty text is one empty line.
pub fn split(text: &str) -> Vec<&str> {
    text.split(LINE_FEED).collect()
}

/// Join lines with U+000A; no lines give an empty string
pub fn join<S: AsRef<str>>(lines: &[S]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 1).sum());
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            text.push(LINE_FEED);
        }
        text.push_str(line.as_ref());
    }
    text
}

/// Locate a UTF-16 code unit offset in terms of lines and scalar values
///
/// `code_unit_index` may equal the text length, which reports the position
/// right after the last character, or the start of a new line when the text
/// ends with a line feed. An offset that points at the low half of a
/// surrogate pair reports the pair itself, except for a pair at the very
/// end of the text, which reports the position after it.
pub fn line_info(text: &[u16], code_unit_index: usize) -> Result<LineInfo> {
    let length = text.len();
    if code_unit_index > length {
        return Err(ReliableTxtError::IndexOutOfRange { index: code_unit_index, length });
    }
    if code_unit_index == 0 {
        return Ok(LineInfo::default());
    }

    let at_end = code_unit_index == length;
    let last = if at_end { length - 1 } else { code_unit_index };

    let mut line_index = 0;
    // scalars of the current line that start at or before `last`
    let mut line_chars = 0usize;
    let mut was_line_break = false;
    let mut i = 0;
    while i <= last {
        if was_line_break {
            was_line_break = false;
            line_chars = 0;
            line_index += 1;
        }
        let unit = text[i];
        if unit == LINE_FEED_UNIT {
            was_line_break = true;
        } else if is_low_surrogate(unit) {
            return Err(ReliableTxtError::InvalidUtf16String);
        } else if is_high_surrogate(unit) {
            i += 1;
            match text.get(i) {
                Some(&low) if is_low_surrogate(low) => {}
                _ => return Err(ReliableTxtError::InvalidUtf16String),
            }
            if code_unit_index == length - 1 && i == length - 1 {
                line_chars += 1;
            }
        }
        line_chars += 1;
        i += 1;
    }

    let mut char_index = line_chars - 1;
    if at_end {
        if was_line_break {
            line_index += 1;
            char_index = 0;
        } else {
            char_index += 1;
        }
    }

    Ok(LineInfo {
        char_index,
        line_index,
        line_char_index: char_index,
    })
}
