//! Flint Parse - builds an AST from expression source.
//!
//! The grammar is tiny:
//!
//! ```text
//! expr := atom | "(" symbol expr* ")"
//! ```
//!
//! Parsing is iterative: an explicit stack holds open forms and finished
//! nodes, so nesting depth is limited by memory rather than by the native
//! stack.

mod ast;
mod error;
mod parser;

pub use ast::AstNode;
pub use error::ParseError;
pub use flint_lexer::{LexError, TokenKind};
pub use parser::parse;
