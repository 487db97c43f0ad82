//! Flint IR - compiles expression ASTs into a flat stack bytecode.
//!
//! # Bytecode
//!
//! A program is a sequence of 16-byte [`Record`]s `(tag, payload)`:
//!
//! | tag            | payload                                   |
//! |----------------|-------------------------------------------|
//! | `Bool`         | 0 or 1                                    |
//! | `Int`          | two's complement bits                     |
//! | `Float`        | IEEE-754 bits                             |
//! | `String`       | address of a [`StrDescriptor`]            |
//! | `Symbol`       | parameter index                           |
//! | `Parenthesis`  | opcode (applied to the top of the stack)  |
//!
//! Records are in stack (post) order: a form's operands precede its
//! operator. The first record's tag additionally carries
//! [`FLOAT_RETURN_FLAG`] when the whole expression yields a float.
//!
//! # Pipeline
//!
//! ```text
//! AstNode + SymbolTypes ──IrBuilder──► Program ──CodeGenerator──► handle
//!                ▲
//!        OperatorRegistry
//! ```

mod arena;
mod builder;
mod error;
mod literal;
mod record;
pub mod registry;
mod value_type;

pub use arena::{ConstArena, StrDescriptor};
pub use builder::{compile, IrBuilder, Program, SymbolTypes};
pub use error::CompileError;
pub use flint_lexer::TokenKind;
pub use literal::{parse_float_literal, parse_int_literal, IntLiteralError};
pub use record::{decode_words, Record, FLOAT_RETURN_FLAG, KIND_MASK, RECORD_SIZE};
pub use registry::{OperatorClass, OperatorEntry, OperatorRegistry, RegistryError, ResultRule};
pub use value_type::ValueType;
