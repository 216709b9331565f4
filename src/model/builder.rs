//! Builder for declared types.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for
//! declaring types, their fields, constructors, methods and nested types, and
//! registering them in a [`TypeRegistry`]. Members are configured through
//! closures receiving a [`FieldBuilder`] or [`MethodBuilder`].
//!
//! # Example
//!
//! ```rust
//! use valuescope::model::{TypeBuilder, TypeRegistry, TypeSig};
//!
//! let registry = TypeRegistry::new();
//! let person = TypeBuilder::class("com.example", "Person")
//!     .public()
//!     .final_()
//!     .field("name", TypeSig::named("java.lang.String"), |f| f.private().final_())
//!     .method("builder", |m| {
//!         m.public()
//!             .static_()
//!             .returns(TypeSig::named("com.example.Person.Builder"))
//!     })
//!     .nested(
//!         TypeBuilder::class("com.example", "Builder")
//!             .public()
//!             .static_()
//!             .method("build", |m| m.public().returns(TypeSig::named("com.example.Person"))),
//!     )
//!     .build(&registry)?;
//!
//! assert_eq!(person.nested_types.len(), 1);
//! assert!(registry.get_by_fullname("com.example.Person.Builder").is_some());
//! # Ok::<(), valuescope::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    model::{
        annotation::{AnnotationList, AnnotationRc},
        flags::{MemberAccess, MemberModifiers, TypeModifiers, ACCESS_MASK},
        member::{
            FieldDescriptor, FieldRc, MethodDescriptor, MethodKind, MethodRc, ParamDescriptor,
            CONSTRUCTOR_NAME,
        },
        registry::{TypeRegistry, OBJECT_TYPE},
        signature::TypeSig,
        token::TokenKind,
        typedesc::{TypeDescriptor, TypeRc, TypeSource},
    },
    Error::Builder,
    Result,
};

fn with_access(flags: u32, access: MemberAccess) -> u32 {
    (flags & !ACCESS_MASK) | access.bits()
}

/// Fluent configuration of a single field
pub struct FieldBuilder {
    name: String,
    signature: TypeSig,
    flags: u32,
    annotations: AnnotationList,
}

impl FieldBuilder {
    fn new(name: &str, signature: TypeSig) -> Self {
        FieldBuilder {
            name: name.to_string(),
            signature,
            flags: 0,
            annotations: Vec::new(),
        }
    }

    /// Make the field public
    #[must_use]
    pub fn public(mut self) -> Self {
        self.flags = with_access(self.flags, MemberAccess::Public);
        self
    }

    /// Make the field private
    #[must_use]
    pub fn private(mut self) -> Self {
        self.flags = with_access(self.flags, MemberAccess::Private);
        self
    }

    /// Make the field protected
    #[must_use]
    pub fn protected(mut self) -> Self {
        self.flags = with_access(self.flags, MemberAccess::Protected);
        self
    }

    /// Mark the field static
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.flags |= MemberModifiers::STATIC.bits();
        self
    }

    /// Mark the field final
    #[must_use]
    pub fn final_(mut self) -> Self {
        self.flags |= MemberModifiers::FINAL.bits();
        self
    }

    /// Mark the field as not persisted
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.flags |= MemberModifiers::TRANSIENT.bits();
        self
    }

    /// Attach an annotation instance
    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationRc) -> Self {
        self.annotations.push(annotation);
        self
    }

    fn build(self, registry: &TypeRegistry, owner: &str) -> FieldRc {
        Arc::new(FieldDescriptor {
            token: registry.next_token(TokenKind::Field),
            owner: owner.to_string(),
            name: self.name,
            flags: self.flags,
            signature: self.signature,
            annotations: self.annotations,
        })
    }
}

/// Fluent configuration of a single method or constructor
pub struct MethodBuilder {
    name: String,
    flags: u32,
    params: Vec<ParamDescriptor>,
    returns: TypeSig,
    annotations: AnnotationList,
}

impl MethodBuilder {
    fn new(name: &str) -> Self {
        MethodBuilder {
            name: name.to_string(),
            flags: 0,
            params: Vec::new(),
            returns: TypeSig::Void,
            annotations: Vec::new(),
        }
    }

    /// Make the method public
    #[must_use]
    pub fn public(mut self) -> Self {
        self.flags = with_access(self.flags, MemberAccess::Public);
        self
    }

    /// Make the method private
    #[must_use]
    pub fn private(mut self) -> Self {
        self.flags = with_access(self.flags, MemberAccess::Private);
        self
    }

    /// Make the method protected
    #[must_use]
    pub fn protected(mut self) -> Self {
        self.flags = with_access(self.flags, MemberAccess::Protected);
        self
    }

    /// Mark the method static
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.flags |= MemberModifiers::STATIC.bits();
        self
    }

    /// Mark the method final
    #[must_use]
    pub fn final_(mut self) -> Self {
        self.flags |= MemberModifiers::FINAL.bits();
        self
    }

    /// Mark the method abstract
    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.flags |= MemberModifiers::ABSTRACT.bits();
        self
    }

    /// Mark the method compiler-generated
    #[must_use]
    pub fn synthetic(mut self) -> Self {
        self.flags |= MemberModifiers::SYNTHETIC.bits();
        self
    }

    /// Append a parameter
    #[must_use]
    pub fn param(self, name: &str, signature: TypeSig) -> Self {
        self.param_annotated(name, signature, Vec::new())
    }

    /// Append a parameter carrying annotations
    #[must_use]
    pub fn param_annotated(
        mut self,
        name: &str,
        signature: TypeSig,
        annotations: AnnotationList,
    ) -> Self {
        self.params.push(ParamDescriptor {
            name: name.to_string(),
            signature,
            annotations,
        });
        self
    }

    /// Set the return type
    #[must_use]
    pub fn returns(mut self, signature: TypeSig) -> Self {
        self.returns = signature;
        self
    }

    /// Attach an annotation instance
    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationRc) -> Self {
        self.annotations.push(annotation);
        self
    }

    fn build(self, registry: &TypeRegistry, owner: &str, kind: MethodKind) -> Result<MethodRc> {
        let token_kind = match kind {
            MethodKind::Method => {
                if self.name.is_empty() {
                    return Err(Builder(format!("method without a name on {owner}")));
                }
                TokenKind::Method
            }
            MethodKind::Constructor => {
                if MemberModifiers::from_flags(self.flags).contains(MemberModifiers::STATIC) {
                    return Err(Builder(format!("static constructor on {owner}")));
                }
                if !self.returns.is_void() {
                    return Err(Builder(format!("constructor of {owner} declares a return type")));
                }
                TokenKind::Constructor
            }
        };

        Ok(Arc::new(MethodDescriptor {
            token: registry.next_token(token_kind),
            owner: owner.to_string(),
            kind,
            name: self.name,
            flags: self.flags,
            params: self.params,
            returns: self.returns,
            annotations: self.annotations,
        }))
    }
}

/// Provides a fluent API for declaring a type
pub struct TypeBuilder {
    namespace: String,
    name: String,
    flags: u32,
    source: TypeSource,
    base: Option<TypeSig>,
    interfaces: Vec<TypeSig>,
    enclosing: Option<TypeSig>,
    fields: Vec<FieldBuilder>,
    constructors: Vec<MethodBuilder>,
    methods: Vec<MethodBuilder>,
    nested: Vec<TypeBuilder>,
    annotations: AnnotationList,
}

impl TypeBuilder {
    /// Start declaring a class extending the root platform type
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace of the class
    /// * 'name'      - Simple name of the class
    #[must_use]
    pub fn class(namespace: &str, name: &str) -> Self {
        TypeBuilder {
            namespace: namespace.to_string(),
            name: name.to_string(),
            flags: 0,
            source: TypeSource::Local,
            base: Some(TypeSig::named(OBJECT_TYPE)),
            interfaces: Vec::new(),
            enclosing: None,
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Start declaring an interface
    #[must_use]
    pub fn interface(namespace: &str, name: &str) -> Self {
        let mut builder = Self::class(namespace, name).no_base();
        builder.flags |= TypeModifiers::INTERFACE.bits() | TypeModifiers::ABSTRACT.bits();
        builder
    }

    /// Start declaring a structural data type
    #[must_use]
    pub fn record(namespace: &str, name: &str) -> Self {
        let mut builder = Self::class(namespace, name);
        builder.flags |= TypeModifiers::RECORD.bits() | TypeModifiers::FINAL.bits();
        builder
    }

    /// Make the type public
    #[must_use]
    pub fn public(mut self) -> Self {
        self.flags = with_access(self.flags, MemberAccess::Public);
        self
    }

    /// Make the type private (nested types only)
    #[must_use]
    pub fn private(mut self) -> Self {
        self.flags = with_access(self.flags, MemberAccess::Private);
        self
    }

    /// Mark a nested type static
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.flags |= TypeModifiers::STATIC.bits();
        self
    }

    /// Mark the type final
    #[must_use]
    pub fn final_(mut self) -> Self {
        self.flags |= TypeModifiers::FINAL.bits();
        self
    }

    /// Mark the type abstract
    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.flags |= TypeModifiers::ABSTRACT.bits();
        self
    }

    /// Set the origin of the declaration
    #[must_use]
    pub fn source(mut self, source: TypeSource) -> Self {
        self.source = source;
        self
    }

    /// Remove the superclass
    #[must_use]
    pub fn no_base(mut self) -> Self {
        self.base = None;
        self
    }

    /// Set the superclass
    #[must_use]
    pub fn extends(mut self, base: TypeSig) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented interface
    #[must_use]
    pub fn implements(mut self, interface: TypeSig) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Attach an annotation instance to the type
    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationRc) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Declare a field
    #[must_use]
    pub fn field(
        mut self,
        name: &str,
        signature: TypeSig,
        configure: impl FnOnce(FieldBuilder) -> FieldBuilder,
    ) -> Self {
        self.fields.push(configure(FieldBuilder::new(name, signature)));
        self
    }

    /// Declare a constructor
    #[must_use]
    pub fn constructor(mut self, configure: impl FnOnce(MethodBuilder) -> MethodBuilder) -> Self {
        self.constructors
            .push(configure(MethodBuilder::new(CONSTRUCTOR_NAME)));
        self
    }

    /// Declare a method
    #[must_use]
    pub fn method(
        mut self,
        name: &str,
        configure: impl FnOnce(MethodBuilder) -> MethodBuilder,
    ) -> Self {
        self.methods.push(configure(MethodBuilder::new(name)));
        self
    }

    /// Declare a nested type. Its namespace is taken from this type and its name
    /// is prefixed with this type's name (`Outer.Inner`).
    #[must_use]
    pub fn nested(mut self, nested: TypeBuilder) -> Self {
        self.nested.push(nested);
        self
    }

    fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Build the type, register it (and its nested types) and return it
    ///
    /// # Errors
    /// Returns an error if a type with the same full name is already registered,
    /// or a member is inconsistent (a static or value-returning constructor, an
    /// unnamed method).
    pub fn build(self, registry: &TypeRegistry) -> Result<TypeRc> {
        let fullname = self.fullname();
        let nested_builders: Vec<TypeBuilder> = self
            .nested
            .into_iter()
            .map(|mut nested| {
                nested.name = format!("{}.{}", self.name, nested.name);
                nested.namespace = self.namespace.clone();
                nested.enclosing = Some(TypeSig::named(fullname.clone()));
                nested
            })
            .collect();

        let fields = self
            .fields
            .into_iter()
            .map(|field| field.build(registry, &fullname))
            .collect();
        let constructors = self
            .constructors
            .into_iter()
            .map(|ctor| ctor.build(registry, &fullname, MethodKind::Constructor))
            .collect::<Result<Vec<_>>>()?;
        let methods = self
            .methods
            .into_iter()
            .map(|method| method.build(registry, &fullname, MethodKind::Method))
            .collect::<Result<Vec<_>>>()?;

        let new_type = Arc::new(TypeDescriptor {
            token: registry.next_token(TokenKind::Type),
            namespace: self.namespace,
            name: self.name,
            flags: self.flags,
            source: self.source,
            base: self.base,
            interfaces: self.interfaces,
            enclosing: self.enclosing,
            fields,
            methods,
            constructors,
            nested_types: nested_builders
                .iter()
                .map(|nested| TypeSig::named(nested.fullname()))
                .collect(),
            annotations: self.annotations,
        });
        registry.insert(&new_type)?;

        for nested in nested_builders {
            nested.build(registry)?;
        }

        Ok(new_type)
    }
}
