//! Parameter and value types.

use std::fmt;

use flint_lexer::TokenKind;

/// Type of a runtime value: the token kinds that denote values.
///
/// Discriminants equal the matching [`TokenKind`] tags, which is also the
/// one-byte argument type encoding passed to the code generator.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ValueType {
    Bool = 1,
    Int = 2,
    Float = 3,
    String = 4,
}

impl ValueType {
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(ValueType::Bool),
            2 => Some(ValueType::Int),
            3 => Some(ValueType::Float),
            4 => Some(ValueType::String),
            _ => None,
        }
    }

    pub const fn from_kind(kind: TokenKind) -> Option<Self> {
        Self::from_tag(kind.tag())
    }

    pub const fn kind(self) -> TokenKind {
        match self {
            ValueType::Bool => TokenKind::Bool,
            ValueType::Int => TokenKind::Int,
            ValueType::Float => TokenKind::Float,
            ValueType::String => TokenKind::String,
        }
    }

    /// Bool, Int or Float.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, ValueType::String)
    }
}

impl TryFrom<TokenKind> for ValueType {
    type Error = TokenKind;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        ValueType::from_kind(kind).ok_or(kind)
    }
}

impl From<ValueType> for TokenKind {
    fn from(ty: ValueType) -> Self {
        ty.kind()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind().fmt(f)
    }
}
