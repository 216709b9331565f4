use std::fmt;
use std::sync::Arc;

use crate::model::{
    annotation::AnnotationList,
    flags::{MemberAccess, TypeModifiers},
    member::{FieldRc, MemberKey, MemberKind, MethodRc},
    signature::TypeSig,
    token::Token,
};

/// Reference to a `TypeDescriptor`
pub type TypeRc = Arc<TypeDescriptor>;

/// Where a type was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSource {
    /// Declared by the code under analysis
    Local,
    /// Declared by a third-party library
    External,
    /// Declared by the foundational runtime library
    Platform,
}

/// A declared type together with its members.
///
/// Supertypes, nested types and the enclosing type are carried as signatures and
/// resolved through the model, so a descriptor never owns another descriptor.
#[derive(Debug)]
pub struct TypeDescriptor {
    /// Token
    pub token: Token,
    /// Namespace (may be empty)
    pub namespace: String,
    /// Simple name; nested types use `Outer.Inner`
    pub name: String,
    /// Raw flags, see [`crate::model::flags`]
    pub flags: u32,
    /// Origin of the declaration
    pub source: TypeSource,
    /// The superclass, if any
    pub base: Option<TypeSig>,
    /// Implemented or extended interfaces, in declaration order
    pub interfaces: Vec<TypeSig>,
    /// The immediately enclosing type of a nested type
    pub enclosing: Option<TypeSig>,
    /// Declared fields
    pub fields: Vec<FieldRc>,
    /// Declared methods
    pub methods: Vec<MethodRc>,
    /// Declared constructors
    pub constructors: Vec<MethodRc>,
    /// Declared nested types
    pub nested_types: Vec<TypeSig>,
    /// Attached annotations
    pub annotations: AnnotationList,
}

impl TypeDescriptor {
    /// Returns the full name (Namespace.Name) of the type
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// A signature referring to this type
    #[must_use]
    pub fn as_sig(&self) -> TypeSig {
        TypeSig::named(self.fullname())
    }

    /// Visibility of the type
    #[must_use]
    pub fn access(&self) -> MemberAccess {
        MemberAccess::from_flags(self.flags)
    }

    /// Modifiers of the type
    #[must_use]
    pub fn modifiers(&self) -> TypeModifiers {
        TypeModifiers::from_flags(self.flags)
    }

    /// Returns true if the type is private
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.access() == MemberAccess::Private
    }

    /// Returns true for static nested types and nested interfaces
    #[must_use]
    pub fn is_static(&self) -> bool {
        let modifiers = self.modifiers();
        modifiers.contains(TypeModifiers::STATIC) || modifiers.contains(TypeModifiers::INTERFACE)
    }

    /// Returns true if the type is a structural data type
    #[must_use]
    pub fn is_record(&self) -> bool {
        self.modifiers().contains(TypeModifiers::RECORD)
    }

    /// Returns true if the type is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.modifiers().contains(TypeModifiers::INTERFACE)
    }

    /// Supertypes in walk order: the superclass first, then interfaces
    #[must_use]
    pub fn supertypes(&self) -> Vec<&TypeSig> {
        self.base.iter().chain(self.interfaces.iter()).collect()
    }

    /// Identity of this type
    #[must_use]
    pub fn key(&self) -> MemberKey {
        MemberKey {
            kind: MemberKind::Type,
            owner: self.fullname(),
            name: String::new(),
            signature: String::new(),
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fullname())
    }
}
