use std::fmt;
use std::hash::{Hash, Hasher};

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// The kind of model entry a [`Token`] refers to.
///
/// The numeric values are stored in the high byte of the token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount)]
pub enum TokenKind {
    /// A declared type
    Type = 0x02,
    /// A field
    Field = 0x04,
    /// A method (static or instance)
    Method = 0x06,
    /// A constructor
    Constructor = 0x0A,
    /// An attached annotation instance
    Annotation = 0x0C,
}

/// An opaque handle identifying a type, member or annotation instance in a model.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the [`TokenKind`]
/// - The low 24 bits (bits 0-23) hold a running index within that kind
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token of the given kind and index
    #[must_use]
    pub fn from_parts(kind: TokenKind, index: u32) -> Self {
        Token(((kind as u32) << 24) | (index & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the kind encoded in the high byte, if it is a known one
    #[must_use]
    pub fn kind(&self) -> Option<TokenKind> {
        let tag = self.0 >> 24;
        TokenKind::iter().find(|kind| *kind as u32 == tag)
    }

    /// Extracts the index (low 24 bits)
    #[must_use]
    pub fn index(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(0x{:08x}, kind: {:?}, index: {})", self.0, self.kind(), self.index())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
