//! JIT error types.

use flint_ir::CompileError;
use flint_parse::ParseError;
use thiserror::Error;

/// Anything that can go wrong between source text and a call result.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum JitError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// A declared parameter was missing from the call arguments.
    #[error("parameter {0} not found")]
    MissingParameter(String),
    /// A string argument for a numeric parameter.
    #[error("unsupported conversion from string for parameter {0}")]
    FromString(String),
    /// A numeric argument for a string parameter.
    #[error("unsupported conversion into string for parameter {0}")]
    IntoString(String),
    /// Raw argument buffer shorter than the parameter list.
    #[error("arguments not enough: expected {expected}, got {got}")]
    NotEnoughArguments { expected: usize, got: usize },
    /// The code generator returned an invalid handle.
    #[error("code generator failed to compile the expression")]
    Backend,
    #[error("function already released")]
    Released,
}
