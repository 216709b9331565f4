//! Modifier flags for types and members.
//!
//! Types and members store their modifiers as a raw 32-bit mask, split into a
//! 3-bit access field and a set of independent modifier bits. The helpers in
//! this module extract the logical groups from the raw value.
//!
//! # Key Types
//! - [`MemberAccess`]: Visibility of a type or member
//! - [`MemberModifiers`]: Modifiers of fields, methods and constructors
//! - [`TypeModifiers`]: Modifiers of declared types

use bitflags::bitflags;

/// Bitmask for `ACCESS` extraction
pub const ACCESS_MASK: u32 = 0x0007;

/// Raw access values, stored in the low 3 bits of the flags
#[allow(non_snake_case)]
pub mod AccessFlags {
    /// Accessible only by the declaring type
    pub const PRIVATE: u32 = 0x0001;
    /// Accessible by anyone in the same package
    pub const PACKAGE: u32 = 0x0003;
    /// Accessible by the package and sub-types
    pub const PROTECTED: u32 = 0x0004;
    /// Accessible by anyone who can see the declaring type
    pub const PUBLIC: u32 = 0x0006;
}

/// Visibility of a type or member
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum MemberAccess {
    /// Only the declaring type
    Private,
    /// Same package (the default when no access bits are set)
    Package,
    /// Package and sub-types
    Protected,
    /// Everyone
    Public,
}

impl MemberAccess {
    /// Extract the access level from raw flags
    #[must_use]
    pub fn from_flags(flags: u32) -> Self {
        match flags & ACCESS_MASK {
            AccessFlags::PRIVATE => MemberAccess::Private,
            AccessFlags::PROTECTED => MemberAccess::Protected,
            AccessFlags::PUBLIC => MemberAccess::Public,
            _ => MemberAccess::Package,
        }
    }

    /// The raw bits for this access level
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            MemberAccess::Private => AccessFlags::PRIVATE,
            MemberAccess::Package => AccessFlags::PACKAGE,
            MemberAccess::Protected => AccessFlags::PROTECTED,
            MemberAccess::Public => AccessFlags::PUBLIC,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Modifiers of fields, methods and constructors
    pub struct MemberModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Cannot be overridden (methods) or reassigned (fields)
        const FINAL = 0x0020;
        /// Field is not persisted; write-only constructor input
        const TRANSIENT = 0x0080;
        /// Generated by the compiler rather than declared in source
        const SYNTHETIC = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
    }
}

impl MemberModifiers {
    /// Extract member modifiers from raw flags
    #[must_use]
    pub fn from_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !ACCESS_MASK)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Modifiers of declared types
    pub struct TypeModifiers: u32 {
        /// Nested type that does not capture an enclosing instance
        const STATIC = 0x0010;
        /// Type cannot be extended
        const FINAL = 0x0020;
        /// Type is an interface
        const INTERFACE = 0x0040;
        /// Type cannot be instantiated directly
        const ABSTRACT = 0x0400;
        /// Structural data type whose positional accessors are generated
        const RECORD = 0x1000;
        /// Type is an enumeration
        const ENUM = 0x2000;
    }
}

impl TypeModifiers {
    /// Extract type modifiers from raw flags
    #[must_use]
    pub fn from_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !ACCESS_MASK)
    }
}
