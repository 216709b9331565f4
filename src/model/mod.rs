//! Structural model of declared types.
//!
//! The analysis never parses source text; it consumes an already-reflected model
//! of types and members through the [`TypeModel`] trait. This module defines the
//! descriptors that trait hands out and ships an in-memory implementation,
//! [`TypeRegistry`], together with a fluent [`TypeBuilder`] to populate it.
//!
//! # Key Components
//!
//! - [`TypeModel`]: The provider seam consumed by the analysis
//! - [`Members`]: The members a model reports for a type, split by kind
//! - [`TypeDescriptor`]: A declared type with its fields, methods, constructors and nested types
//! - [`FieldDescriptor`], [`MethodDescriptor`]: Member declarations with modifiers and annotations
//! - [`Element`]: Any declaration a route can start from or a diagnostic can point at
//! - [`TypeRegistry`]: Lock-free in-memory model keyed by [`Token`]
//! - [`TypeBuilder`]: Builder pattern for declaring types into a registry
//! - [`MethodQuery`]: Composable member filters
//!
//! # Examples
//!
//! ```rust
//! use valuescope::model::{TypeBuilder, TypeModel, TypeRegistry, TypeSig};
//!
//! let registry = TypeRegistry::new();
//! let point = TypeBuilder::class("com.example", "Point")
//!     .public()
//!     .field("x", TypeSig::int(), |f| f.private().final_())
//!     .constructor(|c| c.public().param("x", TypeSig::int()))
//!     .method("getX", |m| m.public().returns(TypeSig::int()))
//!     .build(&registry)?;
//!
//! assert!(registry.type_by_name("com.example.Point").is_some());
//! assert_eq!(point.methods.len(), 1);
//! # Ok::<(), valuescope::Error>(())
//! ```

mod annotation;
mod builder;
mod flags;
mod member;
mod query;
mod registry;
mod signature;
mod token;
mod typedesc;

pub use annotation::{
    has_annotation, Annotation, AnnotationArgument, AnnotationList, AnnotationRc,
};
pub use builder::{FieldBuilder, MethodBuilder, TypeBuilder};
pub use flags::{AccessFlags, MemberAccess, MemberModifiers, TypeModifiers, ACCESS_MASK};
pub use member::{
    Element, FieldDescriptor, FieldRc, MemberKey, MemberKind, MethodDescriptor, MethodKind,
    MethodRc, ParamDescriptor, CONSTRUCTOR_NAME,
};
pub use query::MethodQuery;
pub use registry::{TypeRegistry, OBJECT_TYPE, STRING_TYPE};
pub use signature::{PrimitiveKind, TypeSig};
pub use token::{Token, TokenKind};
pub use typedesc::{TypeDescriptor, TypeRc, TypeSource};

/// Supplies declared types and their members to the analysis.
///
/// Only [`TypeModel::type_by_name`] is required; every other operation has a
/// default expressed in terms of it and the descriptors themselves. Providers
/// backed by a richer host (a compiler, a reflection API) override the defaults
/// where the host knows better, e.g. for type identity or synthetic accessors.
///
/// Implementations are read-only and must be safe to share between threads;
/// concurrent analyses of different types query the same provider.
pub trait TypeModel: Send + Sync {
    /// Look up a declared type by its full name
    fn type_by_name(&self, fullname: &str) -> Option<TypeRc>;

    /// Resolve a declared type to its descriptor; primitives, `void`, arrays and
    /// type variables never resolve.
    fn resolve(&self, sig: &TypeSig) -> Option<TypeRc> {
        sig.fullname().and_then(|name| self.type_by_name(name))
    }

    /// Resolve a method's return type to its declaring type descriptor
    fn resolve_return_type(&self, method: &MethodDescriptor) -> Option<TypeRc> {
        self.resolve(&method.returns)
    }

    /// Returns true if both descriptors denote the same type
    fn types_equal(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
        a.token == b.token
    }

    /// All declared members of `ty`: fields, constructors, methods and nested types
    fn members_of(&self, ty: &TypeDescriptor) -> Vec<Element> {
        let mut members = Vec::with_capacity(
            ty.fields.len() + ty.constructors.len() + ty.methods.len() + ty.nested_types.len(),
        );
        members.extend(ty.fields.iter().cloned().map(Element::Field));
        members.extend(ty.constructors.iter().cloned().map(Element::Constructor));
        members.extend(ty.methods.iter().cloned().map(Element::Method));
        members.extend(self.nested_types_of(ty).into_iter().map(Element::Type));
        members
    }

    /// Direct supertypes of `ty`, superclass first; unresolvable ones are skipped
    fn supertypes_of(&self, ty: &TypeDescriptor) -> Vec<TypeRc> {
        ty.supertypes()
            .into_iter()
            .filter_map(|sig| {
                let resolved = self.resolve(sig);
                if resolved.is_none() {
                    log::warn!("supertype {} of {} cannot be resolved", sig, ty.fullname());
                }
                resolved
            })
            .collect()
    }

    /// Nested types declared directly inside `ty`
    fn nested_types_of(&self, ty: &TypeDescriptor) -> Vec<TypeRc> {
        ty.nested_types
            .iter()
            .filter_map(|sig| self.resolve(sig))
            .collect()
    }

    /// The immediately enclosing type of a nested type
    fn enclosing_type_of(&self, ty: &TypeDescriptor) -> Option<TypeRc> {
        ty.enclosing.as_ref().and_then(|sig| self.resolve(sig))
    }

    /// Annotations attached to a declaration
    fn annotations_of(&self, element: &Element) -> AnnotationList {
        match element {
            Element::Type(ty) => ty.annotations.clone(),
            Element::Field(field) => field.annotations.clone(),
            Element::Method(method) | Element::Constructor(method) => method.annotations.clone(),
        }
    }

    /// Annotations attached to the `index`-th parameter of a method or
    /// constructor; empty if there is no such parameter
    fn param_annotations_of(&self, method: &MethodDescriptor, index: usize) -> AnnotationList {
        method
            .params
            .get(index)
            .map(|param| param.annotations.clone())
            .unwrap_or_default()
    }

    /// Returns true if `method` is a positional accessor generated for a
    /// structural data type rather than a hand-written accessor.
    ///
    /// The default recognises accessors on types flagged
    /// [`TypeModifiers::RECORD`]: a zero-argument instance method named like an
    /// instance field of the same erased type.
    fn is_synthetic_positional_accessor(
        &self,
        owner: &TypeDescriptor,
        method: &MethodDescriptor,
    ) -> bool {
        owner.is_record()
            && method.has_no_params()
            && !method.is_static()
            && owner.fields.iter().any(|field| {
                !field.is_static()
                    && field.name == method.name
                    && field.signature.erased() == method.returns.erased()
            })
    }
}

/// The members a [`TypeModel`] reports for one type, split by kind.
///
/// Every pass of the analysis reads members through this instead of the
/// descriptor's own lists, so a provider overriding [`TypeModel::members_of`]
/// is honoured everywhere.
#[derive(Debug, Clone, Default)]
pub struct Members {
    /// Fields, in declaration order
    pub fields: Vec<FieldRc>,
    /// Constructors, in declaration order
    pub constructors: Vec<MethodRc>,
    /// Methods, in declaration order
    pub methods: Vec<MethodRc>,
    /// Directly nested types
    pub nested_types: Vec<TypeRc>,
}

impl Members {
    /// Query `model` for the members of `ty`
    pub fn of(model: &dyn TypeModel, ty: &TypeDescriptor) -> Self {
        let mut members = Members::default();
        for element in model.members_of(ty) {
            match element {
                Element::Field(field) => members.fields.push(field),
                Element::Constructor(constructor) => members.constructors.push(constructor),
                Element::Method(method) => members.methods.push(method),
                Element::Type(nested) => members.nested_types.push(nested),
            }
        }
        members
    }
}
