//! Call arguments and results.

use flint_ir::ValueType;

use crate::JitError;

/// A named argument passed to [`Function::call`](crate::Function::call).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    Bool(bool),
    Int(i64),
    /// Unsigned integer wider than `i64` allows. Float slots receive its
    /// unsigned value rather than the signed reading of its bits.
    UInt(u64),
    Float(f64),
    Str(&'a str),
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value<'_> {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<isize> for Value<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: isize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<usize> for Value<'_> {
    fn from(value: usize) -> Self {
        Value::UInt(value as u64)
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value<'_> {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Str(value)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(value: &'a String) -> Self {
        Value::Str(value)
    }
}

/// An argument lowered to its slot representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Slot<'a> {
    Word(u64),
    Str(&'a str),
}

/// Convert `value` for a parameter declared as `ty`.
///
/// Numeric kinds coerce to the declared kind: floats truncate into integer
/// slots, integers convert into float slots, and bool slots receive a
/// nonzero test. Strings only go into string slots.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub(crate) fn lower<'a>(name: &str, value: Value<'a>, ty: ValueType) -> Result<Slot<'a>, JitError> {
    let word = match (ty, value) {
        (ValueType::String, Value::Str(text)) => return Ok(Slot::Str(text)),
        (ValueType::String, _) => return Err(JitError::IntoString(name.to_owned())),
        (_, Value::Str(_)) => return Err(JitError::FromString(name.to_owned())),

        (ValueType::Bool, Value::Bool(b)) => u64::from(b),
        (ValueType::Bool, Value::Int(i)) => u64::from(i != 0),
        (ValueType::Bool, Value::UInt(u)) => u64::from(u != 0),
        (ValueType::Bool, Value::Float(f)) => u64::from(f != 0.0),

        (ValueType::Int, Value::Bool(b)) => u64::from(b),
        (ValueType::Int, Value::Int(i)) => i as u64,
        (ValueType::Int, Value::UInt(u)) => u,
        (ValueType::Int, Value::Float(f)) => f as i64 as u64,

        (ValueType::Float, Value::Bool(b)) => f64::from(u8::from(b)).to_bits(),
        (ValueType::Float, Value::Int(i)) => (i as f64).to_bits(),
        (ValueType::Float, Value::UInt(u)) => (u as f64).to_bits(),
        (ValueType::Float, Value::Float(f)) => f.to_bits(),
    };
    Ok(Slot::Word(word))
}

/// Result of a call.
///
/// Integer and bool results come back as the raw 64-bit word; float
/// results are already reinterpreted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReturnValue {
    Word(u64),
    Float(f64),
}

impl ReturnValue {
    /// Raw result word. For floats, the IEEE-754 bits.
    pub fn as_u64(self) -> u64 {
        match self {
            ReturnValue::Word(word) => word,
            ReturnValue::Float(f) => f.to_bits(),
        }
    }

    /// Signed integer view. Floats truncate toward zero.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn as_i64(self) -> i64 {
        match self {
            ReturnValue::Word(word) => word as i64,
            ReturnValue::Float(f) => f as i64,
        }
    }

    /// Float view. Words are read as signed integers.
    #[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            ReturnValue::Word(word) => word as i64 as f64,
            ReturnValue::Float(f) => f,
        }
    }

    pub fn as_bool(self) -> bool {
        match self {
            ReturnValue::Word(word) => word != 0,
            ReturnValue::Float(f) => f != 0.0,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, ReturnValue::Float(_))
    }
}

#[cfg(test)]
mod tests;
