//! Declared types of fields, parameters and return values.
//!
//! A [`TypeSig`] is the type as written at the declaration site. Named types are
//! carried by full name and resolved to a [`crate::model::TypeDescriptor`] through
//! the [`crate::model::TypeModel`] on demand; primitives and `void` never resolve.

use std::fmt;

use strum::{EnumCount, EnumIter};

/// Built-in primitive types
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount)]
pub enum PrimitiveKind {
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `char`
    Char,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
}

impl PrimitiveKind {
    /// Source-level keyword of the primitive
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }
}

/// The declared type of a field, parameter or method return value
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeSig {
    /// No value (method returns only)
    Void,
    /// A primitive value
    Primitive(PrimitiveKind),
    /// A declared type, by full name, with optional type arguments
    Named {
        /// Full name, `namespace.Name` (nested types use `Outer.Inner`)
        fullname: String,
        /// Type arguments of a generic instantiation
        args: Vec<TypeSig>,
    },
    /// An array of the element type
    Array(Box<TypeSig>),
    /// A type variable
    GenericParam(String),
}

impl TypeSig {
    /// A non-generic named type
    #[must_use]
    pub fn named(fullname: impl Into<String>) -> Self {
        TypeSig::Named {
            fullname: fullname.into(),
            args: Vec::new(),
        }
    }

    /// A generic instantiation of a named type
    #[must_use]
    pub fn generic(fullname: impl Into<String>, args: Vec<TypeSig>) -> Self {
        TypeSig::Named {
            fullname: fullname.into(),
            args,
        }
    }

    /// `boolean`
    #[must_use]
    pub fn boolean() -> Self {
        TypeSig::Primitive(PrimitiveKind::Boolean)
    }

    /// `int`
    #[must_use]
    pub fn int() -> Self {
        TypeSig::Primitive(PrimitiveKind::Int)
    }

    /// `long`
    #[must_use]
    pub fn long() -> Self {
        TypeSig::Primitive(PrimitiveKind::Long)
    }

    /// An array of `element`
    #[must_use]
    pub fn array(element: TypeSig) -> Self {
        TypeSig::Array(Box::new(element))
    }

    /// Returns true for `void`
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeSig::Void)
    }

    /// Returns true for any primitive
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeSig::Primitive(_))
    }

    /// Returns true for the primitive `boolean` and its boxed counterpart
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        match self {
            TypeSig::Primitive(PrimitiveKind::Boolean) => true,
            TypeSig::Named { fullname, .. } => fullname == "java.lang.Boolean",
            _ => false,
        }
    }

    /// The full name of a named type, `None` for everything else
    #[must_use]
    pub fn fullname(&self) -> Option<&str> {
        match self {
            TypeSig::Named { fullname, .. } => Some(fullname),
            _ => None,
        }
    }

    /// The erased form used in member identities: type arguments are dropped and
    /// type variables collapse to their bound-less erasure.
    #[must_use]
    pub fn erased(&self) -> String {
        match self {
            TypeSig::Void => "void".to_string(),
            TypeSig::Primitive(kind) => kind.keyword().to_string(),
            TypeSig::Named { fullname, .. } => fullname.clone(),
            TypeSig::Array(element) => format!("{}[]", element.erased()),
            TypeSig::GenericParam(_) => "?".to_string(),
        }
    }
}

impl fmt::Display for TypeSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSig::Void => write!(f, "void"),
            TypeSig::Primitive(kind) => write!(f, "{}", kind.keyword()),
            TypeSig::Named { fullname, args } => {
                write!(f, "{fullname}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeSig::Array(element) => write!(f, "{element}[]"),
            TypeSig::GenericParam(name) => write!(f, "{name}"),
        }
    }
}
