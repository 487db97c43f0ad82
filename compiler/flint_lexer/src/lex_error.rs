//! Lexer error types.

use thiserror::Error;

/// A lexical error. Offsets are byte positions in the source.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum LexError {
    /// Missing closing `"` for a string literal.
    #[error("unterminated string sequence starting at offset {offset}")]
    UnterminatedString { offset: usize },
    /// Unknown or incomplete escape inside a string literal (e.g. `\q`, `\u12`).
    #[error("malformed escape `\\{escape}` at offset {offset}")]
    MalformedEscape { offset: usize, escape: char },
}

impl LexError {
    /// Byte offset the error points at.
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnterminatedString { offset } | LexError::MalformedEscape { offset, .. } => {
                *offset
            }
        }
    }
}
