//! Central in-memory type model.
//!
//! This module provides the [`TypeRegistry`], a thread-safe registry holding every
//! declared type of a model. It is the reference implementation of
//! [`TypeModel`]: the analysis reads types from it, test fixtures and callers
//! without a richer host populate it through [`crate::model::TypeBuilder`].
//!
//! # Registry Architecture
//!
//! - **Token-based storage**: Primary index using [`Token`]s in a lock-free `SkipMap`,
//!   so iteration order is the registration order and therefore deterministic
//! - **Name-based lookup**: Secondary `DashMap` index from full name to token
//! - **Token generation**: Atomic per-kind counters, shared by types, members and
//!   annotation instances
//!
//! A fresh registry already contains the root platform type `java.lang.Object`
//! (with its universal methods) and `java.lang.String`, so declared types have a
//! real platform ancestor to inherit from.
//!
//! # Examples
//!
//! ```rust
//! use valuescope::model::{TypeModel, TypeRegistry, OBJECT_TYPE};
//!
//! let registry = TypeRegistry::new();
//! let object = registry.type_by_name(OBJECT_TYPE).unwrap();
//! assert!(object.methods.iter().any(|m| m.name == "hashCode"));
//! ```

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    model::{
        annotation::{Annotation, AnnotationRc},
        builder::{MethodBuilder, TypeBuilder},
        signature::TypeSig,
        token::{Token, TokenKind},
        typedesc::{TypeRc, TypeSource},
        TypeModel,
    },
    Error::TypeInsert,
    Result,
};

/// Full name of the root platform type
pub const OBJECT_TYPE: &str = "java.lang.Object";
/// Full name of the platform string type
pub const STRING_TYPE: &str = "java.lang.String";

/// Central registry for all types of a model
pub struct TypeRegistry {
    /// Primary storage, keyed by token
    types: SkipMap<Token, TypeRc>,
    /// Full name to token index
    types_by_fullname: DashMap<String, Token>,
    /// Next free index per token kind
    next_index: [AtomicU32; 5],
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a new registry containing the root platform types
    #[must_use]
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register_platform_roots();
        registry
    }

    /// Create a registry without any pre-registered type
    #[must_use]
    pub fn empty() -> Self {
        TypeRegistry {
            types: SkipMap::new(),
            types_by_fullname: DashMap::new(),
            next_index: std::array::from_fn(|_| AtomicU32::new(1)),
        }
    }

    fn register_platform_roots(&self) {
        let string = TypeSig::named(STRING_TYPE);
        let object = TypeBuilder::class("java.lang", "Object")
            .public()
            .source(TypeSource::Platform)
            .no_base()
            .constructor(MethodBuilder::public)
            .method("hashCode", |m| m.public().returns(TypeSig::int()))
            .method("equals", |m| {
                m.public()
                    .param("other", TypeSig::named(OBJECT_TYPE))
                    .returns(TypeSig::boolean())
            })
            .method("toString", |m| m.public().returns(string.clone()))
            .method("getClass", |m| {
                m.public().final_().returns(TypeSig::named("java.lang.Class"))
            })
            .method("clone", |m| m.protected().returns(TypeSig::named(OBJECT_TYPE)))
            .method("finalize", MethodBuilder::protected);

        let string_type = TypeBuilder::class("java.lang", "String")
            .public()
            .final_()
            .source(TypeSource::Platform)
            .constructor(MethodBuilder::public)
            .method("length", |m| m.public().returns(TypeSig::int()))
            .method("isEmpty", |m| m.public().returns(TypeSig::boolean()));

        for root in [object, string_type] {
            if let Err(error) = root.build(self) {
                log::warn!("failed to register platform root: {error}");
            }
        }
    }

    /// Allocate the next token of the given kind
    pub fn next_token(&self, kind: TokenKind) -> Token {
        let slot = match kind {
            TokenKind::Type => 0,
            TokenKind::Field => 1,
            TokenKind::Method => 2,
            TokenKind::Constructor => 3,
            TokenKind::Annotation => 4,
        };
        let index = self.next_index[slot].fetch_add(1, Ordering::Relaxed);
        Token::from_parts(kind, index)
    }

    /// Mint a fresh annotation instance of the given type.
    ///
    /// Attaching the returned `Arc` to several declarations attaches the *same*
    /// instance to all of them.
    pub fn annotation(&self, type_name: &str) -> AnnotationRc {
        Arc::new(Annotation::new(self.next_token(TokenKind::Annotation), type_name))
    }

    /// Wrap an annotation built by the caller, assigning it a fresh token
    pub fn annotation_from(&self, mut annotation: Annotation) -> AnnotationRc {
        annotation.token = self.next_token(TokenKind::Annotation);
        Arc::new(annotation)
    }

    /// Register a new type
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if a type with the same full name is
    /// already registered.
    pub fn insert(&self, new_type: &TypeRc) -> Result<()> {
        let fullname = new_type.fullname();
        match self.types_by_fullname.entry(fullname.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => return Err(TypeInsert(fullname)),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(new_type.token);
            }
        }

        self.types.insert(new_type.token, new_type.clone());
        Ok(())
    }

    /// Get a type by its token
    pub fn get(&self, token: &Token) -> Option<TypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Get a type by its full name
    pub fn get_by_fullname(&self, fullname: &str) -> Option<TypeRc> {
        let token = *self.types_by_fullname.get(fullname)?.value();
        self.get(&token)
    }

    /// Get the number of types in the registry
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns an iterator over all types in the registry
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, Token, TypeRc> {
        self.types.iter()
    }

    /// Get all types in the registry, in registration order
    pub fn all_types(&self) -> Vec<TypeRc> {
        self.types
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Get all types from a specific source
    pub fn types_from_source(&self, source: TypeSource) -> Vec<TypeRc> {
        self.types
            .iter()
            .filter(|entry| entry.value().source == source)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl TypeModel for TypeRegistry {
    fn type_by_name(&self, fullname: &str) -> Option<TypeRc> {
        self.get_by_fullname(fullname)
    }
}
