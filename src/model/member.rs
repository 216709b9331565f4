//! Member descriptors: fields, methods, constructors and their parameters.
//!
//! Members are immutable once registered. Their identity is explicit: a
//! [`MemberKey`] combines the declaring type's full name, the member name and
//! the erased signature, so two members compare equal only if they are the same
//! declaration, never merely because they share a name or a type.

use std::fmt;
use std::sync::Arc;

use crate::model::{
    annotation::AnnotationList,
    flags::{MemberAccess, MemberModifiers},
    signature::TypeSig,
    token::Token,
    typedesc::TypeRc,
};

/// Name under which constructors are keyed
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// A reference to a field
pub type FieldRc = Arc<FieldDescriptor>;
/// A reference to a method or constructor
pub type MethodRc = Arc<MethodDescriptor>;

/// Explicit identity of a declaration
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct MemberKey {
    /// What kind of declaration this is
    pub kind: MemberKind,
    /// Full name of the declaring type
    pub owner: String,
    /// Member name (`<init>` for constructors, empty for types)
    pub name: String,
    /// Erased parameter list for methods and constructors, erased type for fields
    pub signature: String,
}

/// The declaration kinds a [`MemberKey`] distinguishes
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum MemberKind {
    /// A declared type
    Type,
    /// A field
    Field,
    /// A method
    Method,
    /// A constructor
    Constructor,
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Type => write!(f, "{}", self.owner),
            MemberKind::Field => write!(f, "{}.{}:{}", self.owner, self.name, self.signature),
            MemberKind::Method | MemberKind::Constructor => {
                write!(f, "{}.{}{}", self.owner, self.name, self.signature)
            }
        }
    }
}

/// A field declared on a type
#[derive(Debug)]
pub struct FieldDescriptor {
    /// Token
    pub token: Token,
    /// Full name of the declaring type
    pub owner: String,
    /// Field name
    pub name: String,
    /// Raw flags, see [`crate::model::flags`]
    pub flags: u32,
    /// Declared type
    pub signature: TypeSig,
    /// Attached annotations
    pub annotations: AnnotationList,
}

impl FieldDescriptor {
    /// Visibility of the field
    #[must_use]
    pub fn access(&self) -> MemberAccess {
        MemberAccess::from_flags(self.flags)
    }

    /// Modifiers of the field
    #[must_use]
    pub fn modifiers(&self) -> MemberModifiers {
        MemberModifiers::from_flags(self.flags)
    }

    /// Returns true if the field is private
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.access() == MemberAccess::Private
    }

    /// Returns true if the field is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers().contains(MemberModifiers::STATIC)
    }

    /// Returns true if the field is marked as not persisted
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.modifiers().contains(MemberModifiers::TRANSIENT)
    }

    /// Identity of this field
    #[must_use]
    pub fn key(&self) -> MemberKey {
        MemberKey {
            kind: MemberKind::Field,
            owner: self.owner.clone(),
            name: self.name.clone(),
            signature: self.signature.erased(),
        }
    }
}

/// A declared parameter of a method or constructor
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub signature: TypeSig,
    /// Attached annotations
    pub annotations: AnnotationList,
}

/// Whether a [`MethodDescriptor`] is a regular method or a constructor
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MethodKind {
    /// A static or instance method
    Method,
    /// An instance constructor
    Constructor,
}

/// A method or constructor declared on a type
#[derive(Debug)]
pub struct MethodDescriptor {
    /// Token
    pub token: Token,
    /// Full name of the declaring type
    pub owner: String,
    /// Method or constructor
    pub kind: MethodKind,
    /// Method name ([`CONSTRUCTOR_NAME`] for constructors)
    pub name: String,
    /// Raw flags, see [`crate::model::flags`]
    pub flags: u32,
    /// Declared parameters, in order
    pub params: Vec<ParamDescriptor>,
    /// Declared return type (`void` for constructors)
    pub returns: TypeSig,
    /// Attached annotations
    pub annotations: AnnotationList,
}

impl MethodDescriptor {
    /// Visibility of the method
    #[must_use]
    pub fn access(&self) -> MemberAccess {
        MemberAccess::from_flags(self.flags)
    }

    /// Modifiers of the method
    #[must_use]
    pub fn modifiers(&self) -> MemberModifiers {
        MemberModifiers::from_flags(self.flags)
    }

    /// Returns true if the method is private
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.access() == MemberAccess::Private
    }

    /// Returns true if the method is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers().contains(MemberModifiers::STATIC)
    }

    /// Returns true if the compiler generated the method, e.g. a bridge
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.modifiers().contains(MemberModifiers::SYNTHETIC)
    }

    /// Returns true if this is a constructor
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    /// Returns true if the method declares no parameters
    #[must_use]
    pub fn has_no_params(&self) -> bool {
        self.params.is_empty()
    }

    /// Erased parameter list, e.g. `(int, java.lang.String)`
    #[must_use]
    pub fn erased_params(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.signature.erased()).collect();
        format!("({})", params.join(", "))
    }

    /// Identity of this method
    #[must_use]
    pub fn key(&self) -> MemberKey {
        MemberKey {
            kind: match self.kind {
                MethodKind::Method => MemberKind::Method,
                MethodKind::Constructor => MemberKind::Constructor,
            },
            owner: self.owner.clone(),
            name: self.name.clone(),
            signature: self.erased_params(),
        }
    }

    /// Name plus erased parameters, used to match overrides across a hierarchy
    #[must_use]
    pub fn override_signature(&self) -> String {
        format!("{}{}", self.name, self.erased_params())
    }
}

/// Any declaration a diagnostic can point at, and any element a route can be
/// resolved from.
#[derive(Debug, Clone)]
pub enum Element {
    /// A declared (possibly nested) type
    Type(TypeRc),
    /// A field
    Field(FieldRc),
    /// A method
    Method(MethodRc),
    /// A constructor
    Constructor(MethodRc),
}

impl Element {
    /// Wrap a method descriptor, choosing the variant by its kind
    #[must_use]
    pub fn from_method(method: &MethodRc) -> Self {
        match method.kind {
            MethodKind::Method => Element::Method(method.clone()),
            MethodKind::Constructor => Element::Constructor(method.clone()),
        }
    }

    /// Token of the underlying declaration
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            Element::Type(ty) => ty.token,
            Element::Field(field) => field.token,
            Element::Method(method) | Element::Constructor(method) => method.token,
        }
    }

    /// Identity of the underlying declaration
    #[must_use]
    pub fn key(&self) -> MemberKey {
        match self {
            Element::Type(ty) => ty.key(),
            Element::Field(field) => field.key(),
            Element::Method(method) | Element::Constructor(method) => method.key(),
        }
    }

    /// Human-readable description for diagnostics
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Element::Type(ty) => ty.fullname(),
            Element::Field(field) => format!("{}.{}", field.owner, field.name),
            Element::Method(method) => {
                format!("{}.{}({})", method.owner, method.name, display_params(method))
            }
            Element::Constructor(method) => {
                format!("{}({})", method.owner, display_params(method))
            }
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Element {}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

fn display_params(method: &MethodDescriptor) -> String {
    method
        .params
        .iter()
        .map(|p| p.signature.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
