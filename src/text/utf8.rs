//! Strict incremental UTF-8 decoding.
//!
//! Decoding is done one code point at a time so that a chunked byte stream can
//! be tokenized without first being validated as a whole. Invalid sequences
//! (overlong forms, stray continuation bytes, surrogates, values above
//! U+10FFFF) decode to [`REPLACEMENT`] and consume exactly one byte.

/// U+FFFD, produced for every invalid byte sequence.
pub const REPLACEMENT: char = '\u{FFFD}';

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Decode the code point at the start of `bytes`.
///
/// Returns the decoded character and the number of bytes consumed, or `None`
/// when the sequence is cut off by the end of `bytes` and more input may
/// follow. When `final_chunk` is set a truncated sequence decodes to
/// [`REPLACEMENT`] instead.
#[must_use]
pub fn decode(bytes: &[u8], final_chunk: bool) -> Option<(char, usize)> {
    let &lead = bytes.first()?;

    let width = match lead {
        0x00..=0x7F => return Some((char::from(lead), 1)),
        0x80..=0xC1 => return Some((REPLACEMENT, 1)),
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Some((REPLACEMENT, 1)),
    };

    if bytes.len() < width {
        return final_chunk.then_some((REPLACEMENT, 1));
    }

    let tail = &bytes[1..width];
    if !tail.iter().all(|&b| is_continuation(b)) {
        return Some((REPLACEMENT, 1));
    }

    let second = bytes[1];
    let out_of_range = match lead {
        0xE0 => second < 0xA0,
        0xED => second >= 0xA0,
        0xF0 => second < 0x90,
        0xF4 => second >= 0x90,
        _ => false,
    };
    if out_of_range {
        return Some((REPLACEMENT, 1));
    }

    let lead_bits = u32::from(lead) & (0x7F >> width);
    let code = tail
        .iter()
        .fold(lead_bits, |acc, &b| (acc << 6) | (u32::from(b) & 0x3F));

    Some((char::from_u32(code).unwrap_or(REPLACEMENT), width))
}
