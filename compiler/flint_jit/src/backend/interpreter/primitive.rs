//! Evaluation of individual operators on interpreter values.

use std::cmp::Ordering;

/// A value on the interpreter's evaluation stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Cell<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
impl Cell<'_> {
    fn is_float(self) -> bool {
        matches!(self, Cell::Float(_))
    }

    fn int(self) -> Option<i64> {
        match self {
            Cell::Bool(b) => Some(i64::from(b)),
            Cell::Int(i) => Some(i),
            Cell::Float(f) => Some(f as i64),
            Cell::Str(_) => None,
        }
    }

    fn float(self) -> Option<f64> {
        match self {
            Cell::Bool(b) => Some(f64::from(u8::from(b))),
            Cell::Int(i) => Some(i as f64),
            Cell::Float(f) => Some(f),
            Cell::Str(_) => None,
        }
    }

    fn truthy(self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(b),
            Cell::Int(i) => Some(i != 0),
            Cell::Float(f) => Some(f != 0.0),
            Cell::Str(_) => None,
        }
    }

    /// Result word: float bits when the program returns a float, the
    /// integer pattern otherwise.
    #[allow(clippy::cast_sign_loss)]
    pub(super) fn into_word(self, returns_float: bool) -> Option<u64> {
        if returns_float {
            return self.float().map(f64::to_bits);
        }
        self.int().map(|i| i as u64)
    }
}

/// A primitive operation, identified by its registry `native` name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(super) enum Primitive {
    Add,
    Sub,
    Neg,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Not,
    Shl,
    Sar,
    Shr,
    LogicalAnd,
    LogicalOr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Cmpl,
    Cmpg,
    ToBool,
    ToNotBool,
    Acos,
    Asin,
    Atan,
    Atan2,
    Ceil,
    Cos,
    Cosh,
    Exp,
    Floor,
    Log,
    Log10,
    Pow,
    Rint,
    Round,
    Sin,
    Sinh,
    Sqrt,
    Tan,
    Tanh,
    Trunc,
    IsNan,
    IsFinite,
    IsInf,
    Abs,
    Min,
    Max,
    Sign,
    StrLen,
    StrIndex,
}

use Primitive as P;

impl Primitive {
    pub(super) fn from_native(native: &str) -> Option<Self> {
        Some(match native {
            "add" => P::Add,
            "sub" => P::Sub,
            "neg" => P::Neg,
            "mul" => P::Mul,
            "div" => P::Div,
            "rem" => P::Rem,
            "and" => P::And,
            "or" => P::Or,
            "xor" => P::Xor,
            "not" => P::Not,
            "shl" => P::Shl,
            "sar" => P::Sar,
            "shr" => P::Shr,
            "logical_and" => P::LogicalAnd,
            "logical_or" => P::LogicalOr,
            "eq" => P::Eq,
            "ne" => P::Ne,
            "lt" => P::Lt,
            "le" => P::Le,
            "gt" => P::Gt,
            "ge" => P::Ge,
            "cmpl" => P::Cmpl,
            "cmpg" => P::Cmpg,
            "to_bool" => P::ToBool,
            "to_not_bool" => P::ToNotBool,
            "acos" => P::Acos,
            "asin" => P::Asin,
            "atan" => P::Atan,
            "atan2" => P::Atan2,
            "ceil" => P::Ceil,
            "cos" => P::Cos,
            "cosh" => P::Cosh,
            "exp" => P::Exp,
            "floor" => P::Floor,
            "log" => P::Log,
            "log10" => P::Log10,
            "pow" => P::Pow,
            "rint" => P::Rint,
            "round" => P::Round,
            "sin" => P::Sin,
            "sinh" => P::Sinh,
            "sqrt" => P::Sqrt,
            "tan" => P::Tan,
            "tanh" => P::Tanh,
            "trunc" => P::Trunc,
            "is_nan" => P::IsNan,
            "is_finite" => P::IsFinite,
            "is_inf" => P::IsInf,
            "abs" => P::Abs,
            "min" => P::Min,
            "max" => P::Max,
            "sign" => P::Sign,
            "str_len" => P::StrLen,
            "str_index" => P::StrIndex,
            _ => return None,
        })
    }

    pub(super) fn arity(self) -> usize {
        match self {
            P::Neg
            | P::Not
            | P::ToBool
            | P::ToNotBool
            | P::Acos
            | P::Asin
            | P::Atan
            | P::Ceil
            | P::Cos
            | P::Cosh
            | P::Exp
            | P::Floor
            | P::Log
            | P::Log10
            | P::Rint
            | P::Round
            | P::Sin
            | P::Sinh
            | P::Sqrt
            | P::Tan
            | P::Tanh
            | P::Trunc
            | P::IsNan
            | P::IsFinite
            | P::IsInf
            | P::Abs
            | P::Sign
            | P::StrLen => 1,
            _ => 2,
        }
    }

    /// Whether string operands are meaningful.
    pub(super) fn accepts_strings(self) -> bool {
        matches!(self, P::Eq | P::Ne | P::StrLen | P::StrIndex)
    }

    /// Apply to the top `arity` stack values. `None` on an operand this
    /// primitive cannot take.
    #[allow(clippy::cast_possible_wrap)]
    pub(super) fn apply<'a>(self, operands: &[Cell<'a>]) -> Option<Cell<'a>> {
        match (self, operands) {
            (P::StrLen, &[Cell::Str(text)]) => Some(Cell::Int(text.len() as i64)),
            (P::StrIndex, &[Cell::Str(haystack), Cell::Str(needle)]) => Some(Cell::Int(
                haystack.find(needle).map_or(-1, |offset| offset as i64),
            )),
            (P::StrLen | P::StrIndex, _) => None,
            (P::Eq, &[a, b]) => Some(Cell::Bool(equal(a, b))),
            (P::Ne, &[a, b]) => Some(Cell::Bool(!equal(a, b))),
            (_, &[a]) => self.unary(a),
            (_, &[a, b]) => self.binary(a, b),
            _ => None,
        }
    }

    fn unary<'a>(self, a: Cell<'a>) -> Option<Cell<'a>> {
        let cell = match self {
            P::Neg => arith1(a, i64::wrapping_neg, |x| -x)?,
            P::Abs => arith1(a, i64::wrapping_abs, f64::abs)?,
            P::Not => Cell::Int(!a.int()?),
            P::ToBool => Cell::Bool(a.truthy()?),
            P::ToNotBool => Cell::Bool(!a.truthy()?),
            P::Sign => Cell::Int(match a {
                Cell::Float(f) if f > 0.0 => 1,
                Cell::Float(f) if f < 0.0 => -1,
                Cell::Float(_) => 0,
                other => other.int()?.signum(),
            }),
            P::IsNan => Cell::Bool(a.float()?.is_nan()),
            P::IsFinite => Cell::Bool(a.float()?.is_finite()),
            P::IsInf => Cell::Bool(a.float()?.is_infinite()),
            _ => Cell::Float(self.float_fn()?(a.float()?)),
        };
        Some(cell)
    }

    fn float_fn(self) -> Option<fn(f64) -> f64> {
        let f: fn(f64) -> f64 = match self {
            P::Acos => f64::acos,
            P::Asin => f64::asin,
            P::Atan => f64::atan,
            P::Ceil => f64::ceil,
            P::Cos => f64::cos,
            P::Cosh => f64::cosh,
            P::Exp => f64::exp,
            P::Floor => f64::floor,
            P::Log => f64::ln,
            P::Log10 => f64::log10,
            P::Rint => f64::round_ties_even,
            P::Round => f64::round,
            P::Sin => f64::sin,
            P::Sinh => f64::sinh,
            P::Sqrt => f64::sqrt,
            P::Tan => f64::tan,
            P::Tanh => f64::tanh,
            P::Trunc => f64::trunc,
            _ => return None,
        };
        Some(f)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    fn binary<'a>(self, a: Cell<'a>, b: Cell<'a>) -> Option<Cell<'a>> {
        let cell = match self {
            P::Add => arith2(a, b, i64::wrapping_add, |x, y| x + y)?,
            P::Sub => arith2(a, b, i64::wrapping_sub, |x, y| x - y)?,
            P::Mul => arith2(a, b, i64::wrapping_mul, |x, y| x * y)?,
            P::Div => arith2(
                a,
                b,
                |x, y| if y == 0 { 0 } else { x.wrapping_div(y) },
                |x, y| x / y,
            )?,
            P::Rem => arith2(
                a,
                b,
                |x, y| if y == 0 { 0 } else { x.wrapping_rem(y) },
                |x, y| x % y,
            )?,
            P::Min => arith2(a, b, i64::min, f64::min)?,
            P::Max => arith2(a, b, i64::max, f64::max)?,
            P::And => Cell::Int(a.int()? & b.int()?),
            P::Or => Cell::Int(a.int()? | b.int()?),
            P::Xor => Cell::Int(a.int()? ^ b.int()?),
            P::Shl => Cell::Int(a.int()?.wrapping_shl(b.int()? as u32)),
            P::Sar => Cell::Int(a.int()?.wrapping_shr(b.int()? as u32)),
            P::Shr => Cell::Int((a.int()? as u64).wrapping_shr(b.int()? as u32) as i64),
            P::LogicalAnd => Cell::Bool(a.truthy()? && b.truthy()?),
            P::LogicalOr => Cell::Bool(a.truthy()? || b.truthy()?),
            P::Lt => Cell::Bool(matches!(order(a, b)?, Some(Ordering::Less))),
            P::Le => Cell::Bool(matches!(
                order(a, b)?,
                Some(Ordering::Less | Ordering::Equal)
            )),
            P::Gt => Cell::Bool(matches!(order(a, b)?, Some(Ordering::Greater))),
            P::Ge => Cell::Bool(matches!(
                order(a, b)?,
                Some(Ordering::Greater | Ordering::Equal)
            )),
            P::Cmpl => Cell::Int(order(a, b)?.map_or(-1, ordering_to_int)),
            P::Cmpg => Cell::Int(order(a, b)?.map_or(1, ordering_to_int)),
            P::Atan2 => Cell::Float(a.float()?.atan2(b.float()?)),
            P::Pow => Cell::Float(a.float()?.powf(b.float()?)),
            _ => return None,
        };
        Some(cell)
    }
}

fn arith1<'a>(a: Cell<'a>, int: fn(i64) -> i64, float: fn(f64) -> f64) -> Option<Cell<'a>> {
    if a.is_float() {
        Some(Cell::Float(float(a.float()?)))
    } else {
        Some(Cell::Int(int(a.int()?)))
    }
}

fn arith2<'a>(
    a: Cell<'a>,
    b: Cell<'a>,
    int: fn(i64, i64) -> i64,
    float: fn(f64, f64) -> f64,
) -> Option<Cell<'a>> {
    if a.is_float() || b.is_float() {
        Some(Cell::Float(float(a.float()?, b.float()?)))
    } else {
        Some(Cell::Int(int(a.int()?, b.int()?)))
    }
}

/// Numeric ordering. The inner `None` means unordered (NaN).
fn order(a: Cell<'_>, b: Cell<'_>) -> Option<Option<Ordering>> {
    if a.is_float() || b.is_float() {
        Some(a.float()?.partial_cmp(&b.float()?))
    } else {
        Some(Some(a.int()?.cmp(&b.int()?)))
    }
}

fn ordering_to_int(ordering: Ordering) -> i64 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Equality across kinds: strings by content, a string never equals a
/// number, numbers after promotion.
fn equal(a: Cell<'_>, b: Cell<'_>) -> bool {
    match (a, b) {
        (Cell::Str(x), Cell::Str(y)) => x == y,
        (Cell::Str(_), _) | (_, Cell::Str(_)) => false,
        _ if a.is_float() || b.is_float() => a.float() == b.float(),
        _ => a.int() == b.int(),
    }
}
