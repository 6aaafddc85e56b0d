//! Byte-level text scrapers for markup and binary formats.
//!
//! These never fail: malformed input simply yields less text. The output is
//! a byte buffer destined for the tokenizer, so stray non-UTF-8 bytes (for
//! example RTF `\'hh` escapes in a legacy code page) are left for the
//! decoder to turn into token boundaries.

/// Minimum length of a printable ASCII run kept by [`binary_text`].
pub const MIN_ASCII_RUN: usize = 4;

/// Minimum length (in code units) of a UTF-16LE ASCII run kept by [`binary_text`].
pub const MIN_UTF16_RUN: usize = 4;

/// Longest entity name (between `&` and `;`) that is decoded.
const MAX_ENTITY_LEN: usize = 12;

const CDATA_OPEN: &[u8] = b"<![CDATA[";

fn hex_value(b: u8) -> Option<u32> {
    char::from(b).to_digit(16)
}

fn push_code_point(out: &mut Vec<u8>, value: u32) {
    if value > 0x10FFFF {
        return;
    }
    let ch = char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
    let mut buf = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
}

/// Decode the entity starting at `data[at] == b'&'`.
///
/// Returns the index just past the `;` on success.
fn decode_entity(data: &[u8], at: usize, out: &mut Vec<u8>) -> Option<usize> {
    let start = at + 1;
    let end = data[start.min(data.len())..]
        .iter()
        .take(MAX_ENTITY_LEN + 1)
        .position(|&b| b == b';')
        .map(|offset| start + offset)?;
    let name = &data[start..end];
    match name {
        b"lt" => out.push(b'<'),
        b"gt" => out.push(b'>'),
        b"amp" => out.push(b'&'),
        b"quot" => out.push(b'"'),
        b"apos" => out.push(b'\''),
        b"nbsp" => out.push(b' '),
        [b'#', rest @ ..] if !rest.is_empty() => {
            let (digits, radix) = match rest {
                [b'x' | b'X', hex @ ..] => (hex, 16),
                dec => (dec, 10),
            };
            let mut value: u32 = 0;
            for &b in digits {
                let digit = char::from(b).to_digit(radix)?;
                value = value.checked_mul(radix)?.checked_add(digit)?;
            }
            push_code_point(out, value);
        }
        _ => return None,
    }
    Some(end + 1)
}

/// Strip XML tags, keep CDATA content and decode basic entities.
///
/// Recognised entities are `lt gt amp quot apos nbsp` plus decimal and
/// hexadecimal character references. Anything else is kept literally. An
/// unterminated CDATA section ends extraction.
pub fn xml_text(data: &[u8], out: &mut Vec<u8>) {
    let mut in_tag = false;
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        if in_tag {
            if b == b'>' {
                in_tag = false;
            }
            i += 1;
            continue;
        }
        match b {
            b'<' if data[i..].starts_with(CDATA_OPEN) => {
                let body = i + CDATA_OPEN.len();
                let Some(len) = data[body..].windows(3).position(|w| w == b"]]>") else {
                    break;
                };
                out.extend_from_slice(&data[body..body + len]);
                i = body + len + 3;
            }
            b'<' => {
                in_tag = true;
                i += 1;
            }
            b'&' => match decode_entity(data, i, out) {
                Some(next) => i = next,
                None => {
                    out.push(b'&');
                    i += 1;
                }
            },
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }
}

/// Extract visible text from an RTF document.
///
/// Group braces and control words are dropped; `\par` and `\line` become a
/// newline, `\tab` a tab. Escaped `\\ \{ \}` are kept, `\'hh` yields the raw
/// byte and `\uN` the code point (negative values wrap by 65536). The
/// optional `?` fallback character after `\uN` is skipped.
#[must_use]
pub fn rtf_text(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 2);
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        match b {
            b'{' | b'}' => i += 1,
            b'\\' => {
                let Some(&next) = data.get(i + 1) else {
                    break;
                };
                match next {
                    b'\\' | b'{' | b'}' => {
                        out.push(next);
                        i += 2;
                    }
                    b'\'' => match (data.get(i + 2), data.get(i + 3)) {
                        (Some(&hi), Some(&lo)) => match (hex_value(hi), hex_value(lo)) {
                            (Some(hi), Some(lo)) => {
                                out.push(((hi << 4) | lo) as u8);
                                i += 4;
                            }
                            _ => i += 2,
                        },
                        _ => i += 2,
                    },
                    b'u' if data
                        .get(i + 2)
                        .is_some_and(|&c| c == b'-' || c.is_ascii_digit()) =>
                    {
                        i = unicode_escape(data, i + 2, &mut out);
                    }
                    c if c.is_ascii_alphabetic() => {
                        i = control_word(data, i + 1, &mut out);
                    }
                    _ => i += 2,
                }
            }
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }
    out
}

/// Parse `N` of a `\uN` escape starting at `start`; returns the next index.
fn unicode_escape(data: &[u8], start: usize, out: &mut Vec<u8>) -> usize {
    let mut i = start;
    let negative = data.get(i) == Some(&b'-');
    if negative {
        i += 1;
    }
    let mut value: i64 = 0;
    while let Some(&d) = data.get(i).filter(|d| d.is_ascii_digit()) {
        value = value.saturating_mul(10).saturating_add(i64::from(d - b'0'));
        i += 1;
    }
    let mut code = if negative { -value } else { value };
    if code < 0 {
        code += 65536;
    }
    if let Ok(code) = u32::try_from(code) {
        push_code_point(out, code);
    }
    if data.get(i) == Some(&b'?') {
        i += 1;
    }
    if data.get(i) == Some(&b' ') {
        i += 1;
    }
    i
}

/// Consume a control word whose letters start at `start`; returns the next index.
fn control_word(data: &[u8], start: usize, out: &mut Vec<u8>) -> usize {
    let mut i = start;
    while data.get(i).is_some_and(u8::is_ascii_alphabetic) {
        i += 1;
    }
    let word = data[start..i].to_ascii_lowercase();
    if data.get(i) == Some(&b'-') {
        i += 1;
    }
    while data.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    match word.as_slice() {
        b"par" | b"line" => out.push(b'\n'),
        b"tab" => out.push(b'\t'),
        _ => {}
    }
    if data.get(i) == Some(&b' ') {
        i += 1;
    }
    i
}

fn is_ascii_text(b: u8) -> bool {
    (0x20..=0x7E).contains(&b) || b == b'\n' || b == b'\r' || b == b'\t'
}

/// Scrape readable runs out of a binary file (legacy Office formats).
///
/// Keeps printable ASCII runs of at least [`MIN_ASCII_RUN`] bytes and
/// UTF-16LE runs of ASCII characters of at least [`MIN_UTF16_RUN`] code
/// units. Each kept run is followed by a newline.
#[must_use]
pub fn binary_text(data: &[u8]) -> Vec<u8> {
    let utf16_unit = |at: usize| {
        at + 1 < data.len() && data[at + 1] == 0 && is_ascii_text(data[at])
    };

    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        if utf16_unit(i) {
            let mut j = i;
            while utf16_unit(j) {
                j += 2;
            }
            if (j - i) / 2 >= MIN_UTF16_RUN {
                out.extend((i..j).step_by(2).map(|k| data[k]));
                out.push(b'\n');
                i = j;
                continue;
            }
        }

        if is_ascii_text(data[i]) {
            let run = data[i..].iter().take_while(|&&b| is_ascii_text(b)).count();
            if run >= MIN_ASCII_RUN {
                out.extend_from_slice(&data[i..i + run]);
                out.push(b'\n');
            }
            i += run;
            continue;
        }

        i += 1;
    }
    out
}
