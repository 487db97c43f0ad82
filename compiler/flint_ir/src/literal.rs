//! Numeric Literal Parsing
//!
//! Integers accept an optional sign, a radix prefix (`0x`, `0o`, `0b`, or a
//! bare leading `0` for octal) and `_` separators between digits. Values that
//! overflow `i64` are retried as `u64`; the result is always the 64-bit
//! pattern that goes into the bytecode payload.

use std::fmt;

/// Why an integer literal was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IntLiteralError {
    /// Not a number in the detected radix.
    Malformed,
    /// Fits neither `i64` nor `u64`.
    OutOfRange,
}

impl fmt::Display for IntLiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntLiteralError::Malformed => f.write_str("malformed integer literal"),
            IntLiteralError::OutOfRange => f.write_str("integer literal out of range"),
        }
    }
}

impl std::error::Error for IntLiteralError {}

/// Parse integer skipping underscores without allocation.
///
/// Returns `None` on overflow. Callers validate digits beforehand.
#[inline]
fn parse_int_skip_underscores(s: &str, radix: u32) -> Option<u64> {
    let mut result: u64 = 0;
    for c in s.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix)?;
        result = result.checked_mul(u64::from(radix))?;
        result = result.checked_add(u64::from(digit))?;
    }
    Some(result)
}

/// Split a radix prefix off an unsigned literal body.
fn split_radix(body: &str) -> (u32, &str) {
    let prefixed = |lower: &str, upper: &str| {
        body.strip_prefix(lower)
            .or_else(|| body.strip_prefix(upper))
    };
    if let Some(rest) = prefixed("0x", "0X") {
        (16, rest)
    } else if let Some(rest) = prefixed("0o", "0O") {
        (8, rest)
    } else if let Some(rest) = prefixed("0b", "0B") {
        (2, rest)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    }
}

/// Parse an integer literal into its 64-bit payload.
///
/// Negative values are stored in two's complement; positive values above
/// `i64::MAX` are kept as their unsigned bits.
pub fn parse_int_literal(text: &str) -> Result<u64, IntLiteralError> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = split_radix(body);

    let well_formed = !digits.is_empty()
        && !digits.starts_with('_')
        && !digits.ends_with('_')
        && digits.chars().all(|c| c == '_' || c.is_digit(radix));
    if !well_formed {
        return Err(IntLiteralError::Malformed);
    }

    let magnitude = parse_int_skip_underscores(digits, radix).ok_or(IntLiteralError::OutOfRange)?;
    if negative {
        if magnitude > 1 << 63 {
            return Err(IntLiteralError::OutOfRange);
        }
        Ok(0u64.wrapping_sub(magnitude))
    } else {
        Ok(magnitude)
    }
}

/// Parse a float literal into its IEEE-754 bits.
///
/// Only plain decimal notation is accepted (`1.5`, `.5`, `5.`, `-2.5e3`).
pub fn parse_float_literal(text: &str) -> Option<u64> {
    let unsigned = text.trim_start_matches(['+', '-']);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse::<f64>().ok().map(f64::to_bits)
}
