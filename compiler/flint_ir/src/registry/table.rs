//! Built-in operator table.

use super::{OperatorEntry, ResultRule};
use crate::ValueType;

use ResultRule::{Bool, Float, Int, Promote};

const fn op(
    name: &'static str,
    opcode: u64,
    arity: u8,
    native: &'static str,
    result: ResultRule,
) -> OperatorEntry {
    OperatorEntry::arithmetic(name, opcode, arity, native, result)
}

/// Every operator known to the default registry.
pub const BUILTIN_OPERATORS: &[OperatorEntry] = &[
    // Arithmetic
    op("+", 0x01, 2, "add", Promote),
    op("-", 0x02, 2, "sub", Promote),
    op("-", 0x03, 1, "neg", Promote),
    op("*", 0x04, 2, "mul", Promote),
    op("/", 0x05, 2, "div", Promote),
    op("%", 0x06, 2, "rem", Promote),
    // Bitwise
    op("&", 0x07, 2, "and", Int),
    op("|", 0x08, 2, "or", Int),
    op("^", 0x09, 2, "xor", Int),
    op("^", 0x0a, 1, "not", Int),
    op("<<", 0x0b, 2, "shl", Int),
    op(">>", 0x0c, 2, "sar", Int),
    op(">>>", 0x0d, 2, "shr", Int),
    // Logical
    OperatorEntry::logical("&&", 0x20, "logical_and"),
    OperatorEntry::logical("||", 0x21, "logical_or"),
    // Comparison
    op("=", 0x40, 2, "eq", Bool),
    op("==", 0x41, 2, "eq", Bool),
    op("!=", 0x42, 2, "ne", Bool),
    op("<", 0x43, 2, "lt", Bool),
    op("<=", 0x44, 2, "le", Bool),
    op(">", 0x45, 2, "gt", Bool),
    op(">=", 0x46, 2, "ge", Bool),
    op("cmpl", 0x47, 2, "cmpl", Int),
    op("cmpg", 0x48, 2, "cmpg", Int),
    op("->bool", 0x49, 1, "to_bool", Bool),
    op("!", 0x4a, 1, "to_not_bool", Bool),
    // Math
    op("acos", 0x4b, 1, "acos", Float),
    op("asin", 0x4c, 1, "asin", Float),
    op("atan", 0x4d, 1, "atan", Float),
    op("atan2", 0x4e, 2, "atan2", Float),
    op("ceil", 0x4f, 1, "ceil", Float),
    op("cos", 0x50, 1, "cos", Float),
    op("cosh", 0x51, 1, "cosh", Float),
    op("exp", 0x52, 1, "exp", Float),
    op("floor", 0x53, 1, "floor", Float),
    op("log", 0x54, 1, "log", Float),
    op("log10", 0x55, 1, "log10", Float),
    op("pow", 0x56, 2, "pow", Float),
    op("**", 0x57, 2, "pow", Float),
    op("rint", 0x58, 1, "rint", Float),
    op("round", 0x59, 1, "round", Float),
    op("sin", 0x5a, 1, "sin", Float),
    op("sinh", 0x5b, 1, "sinh", Float),
    op("sqrt", 0x5c, 1, "sqrt", Float),
    op("tan", 0x5d, 1, "tan", Float),
    op("tanh", 0x5e, 1, "tanh", Float),
    op("trunc", 0x5f, 1, "trunc", Float),
    op("nan?", 0x60, 1, "is_nan", Bool),
    op("finite?", 0x61, 1, "is_finite", Bool),
    op("inf?", 0x62, 1, "is_inf", Bool),
    op("abs", 0x63, 1, "abs", Promote),
    op("min", 0x64, 2, "min", Promote),
    op("max", 0x65, 2, "max", Promote),
    op("sign", 0x66, 1, "sign", Int),
    // Intrinsics
    OperatorEntry::intrinsic("len", 0x80, "str_len", &[ValueType::String], Int),
    OperatorEntry::intrinsic(
        "index",
        0x81,
        "str_index",
        &[ValueType::String, ValueType::String],
        Int,
    ),
];
