//! Lazy token reader.

use std::iter::FusedIterator;

use crate::escape::unescape_string;
use crate::{LexError, Token, TokenKind};

/// Whether `c` ends a bare atom.
#[inline]
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

/// Classify a bare (non-string, non-parenthesis) lexeme.
///
/// Only a leading digit or `.` makes a number; a signed lexeme such as `-5`
/// is a symbol, and negation is written `(- 5)`. Whether a number is an Int
/// or a Float only depends on the presence of a `.`; radix prefixes and range
/// checks are the compiler's job.
pub(crate) fn classify_atom(lexeme: &str) -> TokenKind {
    let numeric = matches!(
        lexeme.as_bytes(),
        [first, ..] if first.is_ascii_digit() || *first == b'.'
    );
    if numeric {
        if lexeme.contains('.') {
            TokenKind::Float
        } else {
            TokenKind::Int
        }
    } else if lexeme == "true" || lexeme == "false" {
        TokenKind::Bool
    } else {
        TokenKind::Symbol
    }
}

/// Tokenizer over a source string.
///
/// Yields `Result<Token, LexError>` items. The sequence is finite and not
/// restartable: re-scanning needs a fresh reader. After the first error the
/// reader is exhausted.
#[derive(Clone, Debug)]
pub struct TokenReader<'src> {
    source: &'src str,
    pos: usize,
    done: bool,
}

impl<'src> TokenReader<'src> {
    pub fn new(source: &'src str) -> Self {
        TokenReader {
            source,
            pos: 0,
            done: false,
        }
    }

    /// Current byte position (start of the unread input).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Scan the next token.
    ///
    /// Returns `None` at end of input.
    pub fn next_token(&mut self) -> Option<Result<Token<'src>, LexError>> {
        if self.done {
            return None;
        }
        let rest = &self.source[self.pos..];
        let trimmed = rest.trim_start();
        let start = self.pos + (rest.len() - trimmed.len());

        let Some(first) = trimmed.chars().next() else {
            self.pos = self.source.len();
            self.done = true;
            return None;
        };

        let token = match first {
            '(' | ')' => {
                self.pos = start + 1;
                Ok(Token::new(
                    &self.source[start..start + 1],
                    TokenKind::Parenthesis,
                    start,
                ))
            }
            '"' => self.scan_string(start),
            _ => Ok(self.scan_atom(start)),
        };

        if token.is_err() {
            self.done = true;
        }
        Some(token)
    }

    /// Scan a string literal whose opening quote is at `start`.
    fn scan_string(&mut self, start: usize) -> Result<Token<'src>, LexError> {
        let bytes = self.source.as_bytes();
        let mut i = start + 1;
        let end = loop {
            // Both needles are ASCII, so a hit never lands inside a
            // multi-byte character.
            let Some(hit) = memchr::memchr2(b'"', b'\\', &bytes[i..]) else {
                return Err(LexError::UnterminatedString { offset: start });
            };
            let at = i + hit;
            if bytes[at] == b'"' {
                break at;
            }
            // Skip the backslash and the first byte of the escaped character.
            i = at + 2;
            if i > bytes.len() {
                return Err(LexError::UnterminatedString { offset: start });
            }
        };

        self.pos = end + 1;
        let content = &self.source[start + 1..end];
        let text = unescape_string(content, start + 1)?;
        Ok(Token::new(text, TokenKind::String, start))
    }

    /// Scan a maximal run of non-space, non-parenthesis characters.
    fn scan_atom(&mut self, start: usize) -> Token<'src> {
        let rest = &self.source[start..];
        let len = rest.find(is_delimiter).unwrap_or(rest.len());
        self.pos = start + len;
        let lexeme = &rest[..len];
        Token::new(lexeme, classify_atom(lexeme), start)
    }
}

impl<'src> Iterator for TokenReader<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl FusedIterator for TokenReader<'_> {}

#[cfg(test)]
mod tests;
