//! Parse error types.

use flint_lexer::LexError;
use thiserror::Error;

/// A syntax or lexical error found while parsing.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum ParseError {
    /// The tokenizer rejected the input.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// `(` was not followed by an operator symbol.
    #[error("expecting symbolic operator")]
    ExpectingOperator { offset: usize },
    /// `)` with no open form to close.
    #[error("unexpected parenthesis")]
    UnexpectedParenthesis { offset: usize },
    /// Input ended before the expression was complete.
    #[error("unexpected EOF")]
    UnexpectedEof,
}

impl ParseError {
    /// Whether this error was caused by running out of input.
    ///
    /// Useful for REPL-style callers that keep reading lines until the
    /// expression is balanced.
    pub fn is_eof(&self) -> bool {
        matches!(
            self,
            ParseError::UnexpectedEof | ParseError::Lex(LexError::UnterminatedString { .. })
        )
    }
}
