//! Escape Sequence Processing
//!
//! Handles escape sequences in string literals.
//! Recognized escapes: `\a` `\b` `\f` `\n` `\r` `\t` `\v` `\\` `\"` `\'`,
//! `\xHH`, `\uHHHH`, `\UHHHHHHHH` and three-digit octal `\NNN`.
//! Byte escapes (`\x`, octal) are limited to ASCII so the result stays UTF-8.

use std::borrow::Cow;
use std::str::CharIndices;

use crate::LexError;

/// Resolve a single-character escape to its replacement.
#[inline]
fn resolve_simple_escape(c: char) -> Option<char> {
    match c {
        'a' => Some('\u{07}'),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{0B}'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// Read exactly `count` digits of `radix` and fold them into a code point.
fn read_digits(chars: &mut CharIndices<'_>, count: usize, radix: u32) -> Option<u32> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let (_, c) = chars.next()?;
        let digit = c.to_digit(radix)?;
        value = value.checked_mul(radix)?.checked_add(digit)?;
    }
    Some(value)
}

/// Unescape a string literal's content (between the `"`s).
///
/// `base_offset` is the byte offset of `content` in the source, used for
/// error positions. Returns the borrowed slice unchanged when it contains
/// no backslash.
pub(crate) fn unescape_string(content: &str, base_offset: usize) -> Result<Cow<'_, str>, LexError> {
    if !content.contains('\\') {
        return Ok(Cow::Borrowed(content));
    }

    let mut result = String::with_capacity(content.len());
    let mut chars = content.char_indices();

    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let offset = base_offset + i;
        let Some((_, esc)) = chars.next() else {
            return Err(LexError::MalformedEscape {
                offset,
                escape: '\\',
            });
        };
        let malformed = LexError::MalformedEscape {
            offset,
            escape: esc,
        };
        let resolved = match esc {
            'x' => read_digits(&mut chars, 2, 16)
                .filter(|v| *v < 0x80)
                .and_then(char::from_u32),
            'u' => read_digits(&mut chars, 4, 16).and_then(char::from_u32),
            'U' => read_digits(&mut chars, 8, 16).and_then(char::from_u32),
            '0'..='7' => {
                let first = esc.to_digit(8).unwrap_or_default();
                read_digits(&mut chars, 2, 8)
                    .map(|rest| first * 64 + rest)
                    .filter(|v| *v < 0x80)
                    .and_then(char::from_u32)
            }
            other => resolve_simple_escape(other),
        };
        match resolved {
            Some(ch) => result.push(ch),
            None => return Err(malformed),
        }
    }

    Ok(Cow::Owned(result))
}
