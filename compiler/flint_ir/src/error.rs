//! Compile error types.

use flint_lexer::TokenKind;
use thiserror::Error;

/// An error raised while turning an AST into bytecode.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum CompileError {
    /// No registry entry for this name and argument count.
    #[error("operator {name} not found")]
    UnknownOperator { name: String, arity: usize },
    /// A symbol that is not in the declared symbol table.
    #[error("symbol {0} not found")]
    UndeclaredSymbol(String),
    /// A symbol declared with a non-value kind (parenthesis or symbol).
    #[error("symbol {name} must have a value type, not {kind}")]
    InvalidSymbolType { name: String, kind: TokenKind },
    /// Integer literal that is not a valid number in its radix.
    #[error("invalid integer literal {0}")]
    InvalidInt(String),
    /// Integer literal outside both `i64` and `u64`.
    #[error("integer literal {0} out of range")]
    IntOutOfRange(String),
    /// Float literal that does not parse.
    #[error("invalid float literal {0}")]
    InvalidFloat(String),
    /// String literal too large to describe with a 32-bit length.
    #[error("string too large ({0} bytes)")]
    StringTooLarge(usize),
    /// More nodes appended after the program was finalized.
    #[error("code already finalized")]
    Finalized,
}
