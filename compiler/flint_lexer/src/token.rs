//! Token and token-kind definitions.

use std::borrow::Cow;
use std::fmt;

/// Kind of a token.
///
/// The discriminants are stable: the IR compiler reuses them as bytecode
/// type tags and as the one-byte argument type encoding handed to the code
/// generator.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    /// Either `(` or `)`.
    Parenthesis = 0,
    /// Either `true` or `false`.
    Bool = 1,
    /// An integer literal (any radix).
    Int = 2,
    /// A floating point literal (contains a `.`).
    Float = 3,
    /// A double-quoted string.
    String = 4,
    /// Anything else: operator names and parameter references.
    Symbol = 5,
}

impl TokenKind {
    /// All kinds, in tag order.
    pub const ALL: [TokenKind; 6] = [
        TokenKind::Parenthesis,
        TokenKind::Bool,
        TokenKind::Int,
        TokenKind::Float,
        TokenKind::String,
        TokenKind::Symbol,
    ];

    /// Numeric tag of this kind.
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Kind for a numeric tag, if the tag is known.
    #[inline]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(TokenKind::Parenthesis),
            1 => Some(TokenKind::Bool),
            2 => Some(TokenKind::Int),
            3 => Some(TokenKind::Float),
            4 => Some(TokenKind::String),
            5 => Some(TokenKind::Symbol),
            _ => None,
        }
    }

    /// Whether values of this kind can be passed as parameters.
    #[inline]
    pub const fn is_value(self) -> bool {
        matches!(
            self,
            TokenKind::Bool | TokenKind::Int | TokenKind::Float | TokenKind::String
        )
    }

    /// Lowercase name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::Parenthesis => "parenthesis",
            TokenKind::Bool => "bool",
            TokenKind::Int => "int",
            TokenKind::Float => "float",
            TokenKind::String => "string",
            TokenKind::Symbol => "symbol",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token.
///
/// `text` borrows from the source except for strings containing escapes,
/// which own their unescaped value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token<'src> {
    /// Lexeme, already unquoted for strings.
    pub text: Cow<'src, str>,
    /// Classified kind.
    pub kind: TokenKind,
    /// Byte offset of the token's first character in the source.
    pub offset: usize,
}

impl<'src> Token<'src> {
    pub fn new(text: impl Into<Cow<'src, str>>, kind: TokenKind, offset: usize) -> Self {
        Token {
            text: text.into(),
            kind,
            offset,
        }
    }

    /// Token text as a plain `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether this is the opening parenthesis.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.kind == TokenKind::Parenthesis && self.text == "("
    }

    /// Whether this is the closing parenthesis.
    #[inline]
    pub fn is_close(&self) -> bool {
        self.kind == TokenKind::Parenthesis && self.text == ")"
    }

    /// Detach from the source buffer.
    pub fn into_owned(self) -> Token<'static> {
        Token {
            text: Cow::Owned(self.text.into_owned()),
            kind: self.kind,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests;
