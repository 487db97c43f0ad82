//! Flint Lexer - tokenizer for the lisp-like expression language.
//!
//! The lexer turns source text into a lazy sequence of [`Token`]s. It only
//! decides the *kind* of each token; numeric literals are validated later by
//! the IR compiler, which understands radix prefixes and range rules.
//!
//! # Token Kinds
//!
//! | first character            | kind                         |
//! |----------------------------|------------------------------|
//! | `(` or `)`                 | [`TokenKind::Parenthesis`]   |
//! | `"`                        | [`TokenKind::String`]        |
//! | leading digit or `.`       | [`TokenKind::Int`] / [`TokenKind::Float`] |
//! | `true` / `false`           | [`TokenKind::Bool`]          |
//! | anything else              | [`TokenKind::Symbol`]        |
//!
//! String tokens are unescaped while scanning, so their text is the literal
//! value rather than the source spelling.

mod escape;
mod lex_error;
mod reader;
mod token;

pub use lex_error::LexError;
pub use reader::TokenReader;
pub use token::{Token, TokenKind};

/// Tokenize a whole source string.
///
/// Convenience for tests and tools; the parser pulls tokens lazily instead.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    TokenReader::new(source).collect()
}
