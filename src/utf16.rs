//! UTF-16 code unit validation and transcoding
//!
//! Text in memory is looked at as a sequence of UTF-16 code units so that
//! lone surrogates can be represented and rejected. Functions taking `&[u16]`
//! validate surrogate pairing; decoders produce a `String`, which can only
//! hold well formed text.
//!
//! All byte decoders are strict: malformed input fails with
//! [`ReliableTxtError::StringDecoding`] and produces no partial result.

use crate::error::{ReliableTxtError, Result};

const HIGH_SURROGATE_START: u16 = 0xD800;
const HIGH_SURROGATE_END: u16 = 0xDBFF;
const LOW_SURROGATE_START: u16 = 0xDC00;
const LOW_SURROGATE_END: u16 = 0xDFFF;

/// Byte order mark as a single code unit / code point
pub const BOM: u16 = 0xFEFF;

/// Byte order used when reading or writing multi-byte units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (HIGH_SURROGATE_START..=HIGH_SURROGATE_END).contains(&unit)
}

pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (LOW_SURROGATE_START..=LOW_SURROGATE_END).contains(&unit)
}

fn scalar_values(units: &[u16]) -> impl Iterator<Item = Result<char>> + '_ {
    char::decode_utf16(units.iter().copied()).map(|r| r.map_err(|_| ReliableTxtError::InvalidUtf16String))
}

/// Check that every high surrogate is followed by a low surrogate and no
/// low surrogate appears on its own
pub fn is_valid(units: &[u16]) -> bool {
    scalar_values(units).all(|r| r.is_ok())
}

/// Like [`is_valid`], failing with `InvalidUtf16String`
pub fn validate(units: &[u16]) -> Result<()> {
    if is_valid(units) {
        Ok(())
    } else {
        Err(ReliableTxtError::InvalidUtf16String)
    }
}

/// Number of scalar values, counting a surrogate pair once
pub fn code_point_count(units: &[u16]) -> Result<usize> {
    scalar_values(units).try_fold(0usize, |count, r| r.map(|_| count + 1))
}

/// Decode the code units into code points
pub fn code_points(units: &[u16]) -> Result<Vec<u32>> {
    let count = code_point_count(units)?;
    let mut points = Vec::with_capacity(count);
    for c in scalar_values(units) {
        points.push(u32::from(c?));
    }
    Ok(points)
}

/// Exact UTF-8 length of the text, or `None` if the surrogates are malformed
///
/// Unlike the other functions here this does not fail, so callers can use
/// it as a cheap probe.
pub fn utf8_byte_count(units: &[u16]) -> Option<usize> {
    let mut count = 0usize;
    for r in scalar_values(units) {
        count += r.ok()?.len_utf8();
    }
    Some(count)
}

/// Validate, then encode as UTF-8
pub fn to_utf8_bytes(units: &[u16]) -> Result<Vec<u8>> {
    let size = utf8_byte_count(units).ok_or(ReliableTxtError::InvalidUtf16String)?;
    let mut bytes = Vec::with_capacity(size);
    let mut buf = [0u8; 4];
    for c in scalar_values(units) {
        bytes.extend_from_slice(c?.encode_utf8(&mut buf).as_bytes());
    }
    Ok(bytes)
}

/// Copy the code units as 16-bit values, checking surrogate order on the way
pub fn to_utf16_bytes(units: &[u16], order: ByteOrder) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(units.len() * 2);
    let mut was_high_surrogate = false;
    for &unit in units {
        if was_high_surrogate {
            if !is_low_surrogate(unit) {
                return Err(ReliableTxtError::InvalidUtf16String);
            }
            was_high_surrogate = false;
        } else if is_low_surrogate(unit) {
            return Err(ReliableTxtError::InvalidUtf16String);
        } else if is_high_surrogate(unit) {
            was_high_surrogate = true;
        }
        push_u16(&mut bytes, unit, order);
    }
    if was_high_surrogate {
        return Err(ReliableTxtError::InvalidUtf16String);
    }
    Ok(bytes)
}

/// Write each scalar value as a 32-bit word
pub fn to_utf32_bytes(units: &[u16], order: ByteOrder) -> Result<Vec<u8>> {
    let count = code_point_count(units)?;
    let mut bytes = Vec::with_capacity(count * 4);
    for c in scalar_values(units) {
        push_u32(&mut bytes, u32::from(c?), order);
    }
    Ok(bytes)
}

/// Encode well formed text as UTF-16 bytes
pub fn str_to_utf16_bytes(text: &str, order: ByteOrder) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        push_u16(&mut bytes, unit, order);
    }
    bytes
}

/// Encode well formed text as UTF-32 bytes
pub fn str_to_utf32_bytes(text: &str, order: ByteOrder) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.chars().count() * 4);
    for c in text.chars() {
        push_u32(&mut bytes, u32::from(c), order);
    }
    bytes
}

/// Strict UTF-8 decode
///
/// With `skip_first_bom` a leading U+FEFF is dropped after decoding.
pub fn from_utf8_bytes(bytes: &[u8], skip_first_bom: bool) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|_| ReliableTxtError::StringDecoding)?;
    let text = if skip_first_bom {
        text.strip_prefix('\u{FEFF}').unwrap_or(text)
    } else {
        text
    };
    Ok(text.to_string())
}

/// Strict UTF-16 decode of byte pairs in the given order
pub fn from_utf16_bytes(bytes: &[u8], order: ByteOrder, skip_first_bom: bool) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(ReliableTxtError::StringDecoding);
    }
    let mut units = bytes.chunks_exact(2).map(|pair| read_u16([pair[0], pair[1]], order)).peekable();
    if skip_first_bom {
        units.next_if_eq(&BOM);
    }
    let mut text = String::with_capacity(bytes.len() / 2);
    for r in char::decode_utf16(units) {
        text.push(r.map_err(|_| ReliableTxtError::StringDecoding)?);
    }
    Ok(text)
}

/// Strict UTF-32 decode of 4-byte words in the given order
///
/// Values above U+10FFFF and surrogate values are rejected.
pub fn from_utf32_bytes(bytes: &[u8], order: ByteOrder, skip_first_bom: bool) -> Result<String> {
    if bytes.len() % 4 != 0 {
        return Err(ReliableTxtError::StringDecoding);
    }
    let mut words = bytes
        .chunks_exact(4)
        .map(|word| read_u32([word[0], word[1], word[2], word[3]], order))
        .peekable();
    if skip_first_bom {
        words.next_if_eq(&u32::from(BOM));
    }
    let mut text = String::with_capacity(bytes.len() / 4);
    for value in words {
        text.push(char::from_u32(value).ok_or(ReliableTxtError::StringDecoding)?);
    }
    Ok(text)
}

/// Build text from code points, rejecting out of range and surrogate values
pub fn from_code_points(points: &[u32]) -> Result<String> {
    let mut text = String::with_capacity(points.len());
    for &point in points {
        text.push(char::from_u32(point).ok_or(ReliableTxtError::StringDecoding)?);
    }
    Ok(text)
}

fn push_u16(bytes: &mut Vec<u8>, value: u16, order: ByteOrder) {
    match order {
        ByteOrder::BigEndian => bytes.extend_from_slice(&value.to_be_bytes()),
        ByteOrder::LittleEndian => bytes.extend_from_slice(&value.to_le_bytes()),
    }
}

fn push_u32(bytes: &mut Vec<u8>, value: u32, order: ByteOrder) {
    match order {
        ByteOrder::BigEndian => bytes.extend_from_slice(&value.to_be_bytes()),
        ByteOrder::LittleEndian => bytes.extend_from_slice(&value.to_le_bytes()),
    }
}

fn read_u16(pair: [u8; 2], order: ByteOrder) -> u16 {
    match order {
        ByteOrder::BigEndian => u16::from_be_bytes(pair),
        ByteOrder::LittleEndian => u16::from_le_bytes(pair),
    }
}

fn read_u32(word: [u8; 4], order: ByteOrder) -> u32 {
    match order {
        ByteOrder::BigEndian => u32::from_be_bytes(word),
        ByteOrder::LittleEndian => u32::from_le_bytes(word),
    }
}
