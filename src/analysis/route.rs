//! Construction routes.
//!
//! A [`ConstructionRoute`] is the resolved mechanism for building an instance of a
//! value type. Every route names exactly one target type and exactly one callable
//! (the construction element); builder routes additionally name the builder type
//! and the build method that produces the target.

use std::fmt;

use strum::{EnumCount, EnumIter};

use crate::model::{Element, MemberKey, MethodRc, ParamDescriptor, TypeRc};

/// The four route shapes, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum RouteKind {
    /// Direct constructor of the target type
    Constructor,
    /// Static method returning the target type
    Factory,
    /// Constructor of a builder type
    BuilderConstructor,
    /// Static method returning a builder type
    BuilderFactory,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteKind::Constructor => write!(f, "constructor"),
            RouteKind::Factory => write!(f, "factory"),
            RouteKind::BuilderConstructor => write!(f, "builder constructor"),
            RouteKind::BuilderFactory => write!(f, "builder factory"),
        }
    }
}

/// The resolved way of constructing a value type.
///
/// Equality is by identity: two routes are equal if they have the same shape,
/// target, construction element and build method.
#[derive(Debug, Clone)]
pub enum ConstructionRoute {
    /// `new Target(..)`
    Constructor {
        /// The type produced
        target: TypeRc,
        /// Constructor of `target`
        constructor: MethodRc,
    },
    /// `Target.of(..)`
    Factory {
        /// The type produced
        target: TypeRc,
        /// Static method returning `target`
        factory: MethodRc,
    },
    /// `new Builder(..)` followed by setters and `build()`
    BuilderConstructor {
        /// The type produced by `build_method`
        target: TypeRc,
        /// The intermediate builder type
        builder: TypeRc,
        /// Constructor of `builder`
        constructor: MethodRc,
        /// Method of `builder` producing `target`
        build_method: MethodRc,
    },
    /// `Target.builder(..)` followed by setters and `build()`
    BuilderFactory {
        /// The type produced by `build_method`
        target: TypeRc,
        /// The intermediate builder type
        builder: TypeRc,
        /// Static method returning `builder`
        factory: MethodRc,
        /// Method of `builder` producing `target`
        build_method: MethodRc,
    },
}

impl ConstructionRoute {
    /// Shape of this route
    #[must_use]
    pub fn kind(&self) -> RouteKind {
        match self {
            ConstructionRoute::Constructor { .. } => RouteKind::Constructor,
            ConstructionRoute::Factory { .. } => RouteKind::Factory,
            ConstructionRoute::BuilderConstructor { .. } => RouteKind::BuilderConstructor,
            ConstructionRoute::BuilderFactory { .. } => RouteKind::BuilderFactory,
        }
    }

    /// The type ultimately produced
    #[must_use]
    pub fn target(&self) -> &TypeRc {
        match self {
            ConstructionRoute::Constructor { target, .. }
            | ConstructionRoute::Factory { target, .. }
            | ConstructionRoute::BuilderConstructor { target, .. }
            | ConstructionRoute::BuilderFactory { target, .. } => target,
        }
    }

    /// The callable actually invoked to start construction
    #[must_use]
    pub fn element(&self) -> &MethodRc {
        match self {
            ConstructionRoute::Constructor { constructor, .. }
            | ConstructionRoute::BuilderConstructor { constructor, .. } => constructor,
            ConstructionRoute::Factory { factory, .. }
            | ConstructionRoute::BuilderFactory { factory, .. } => factory,
        }
    }

    /// The construction element as an [`Element`]
    #[must_use]
    pub fn as_element(&self) -> Element {
        Element::from_method(self.element())
    }

    /// The builder type, for builder routes
    #[must_use]
    pub fn builder(&self) -> Option<&TypeRc> {
        match self {
            ConstructionRoute::BuilderConstructor { builder, .. }
            | ConstructionRoute::BuilderFactory { builder, .. } => Some(builder),
            ConstructionRoute::Constructor { .. } | ConstructionRoute::Factory { .. } => None,
        }
    }

    /// The build method, for builder routes
    #[must_use]
    pub fn build_method(&self) -> Option<&MethodRc> {
        match self {
            ConstructionRoute::BuilderConstructor { build_method, .. }
            | ConstructionRoute::BuilderFactory { build_method, .. } => Some(build_method),
            ConstructionRoute::Constructor { .. } | ConstructionRoute::Factory { .. } => None,
        }
    }

    /// Returns true for the two builder shapes
    #[must_use]
    pub fn is_builder(&self) -> bool {
        self.builder().is_some()
    }

    /// Parameters of the construction element, in declaration order
    #[must_use]
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.element().params
    }

    /// Identity of the construction element, used as memoization key
    #[must_use]
    pub fn key(&self) -> MemberKey {
        self.element().key()
    }
}

impl PartialEq for ConstructionRoute {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && self.target().token == other.target().token
            && self.element().key() == other.element().key()
            && self.build_method().map(|m| m.key()) == other.build_method().map(|m| m.key())
    }
}

impl Eq for ConstructionRoute {}

impl fmt::Display for ConstructionRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.as_element())?;
        if let Some(build_method) = self.build_method() {
            write!(f, " -> {}()", build_method.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TypeBuilder, TypeRegistry, TypeSig};

    #[test]
    fn test_route_accessors() {
        let registry = TypeRegistry::new();
        let foo = TypeBuilder::class("com.example", "Foo")
            .constructor(|c| c.public().param("x", TypeSig::int()))
            .method("of", |m| {
                m.public()
                    .static_()
                    .param("x", TypeSig::int())
                    .returns(TypeSig::named("com.example.Foo"))
            })
            .build(&registry)
            .unwrap();

        let ctor = ConstructionRoute::Constructor {
            target: foo.clone(),
            constructor: foo.constructors[0].clone(),
        };
        let factory = ConstructionRoute::Factory {
            target: foo.clone(),
            factory: foo.methods[0].clone(),
        };

        assert_eq!(ctor.kind(), RouteKind::Constructor);
        assert_eq!(ctor.params().len(), 1);
        assert!(ctor.builder().is_none());
        assert!(!factory.is_builder());
        assert_ne!(ctor, factory);
        assert_eq!(ctor.clone(), ctor);
        assert_eq!(ctor.to_string(), "constructor com.example.Foo(int)");
        assert_eq!(factory.to_string(), "factory com.example.Foo.of(int)");
    }

    #[test]
    fn test_builder_route_display() {
        let registry = TypeRegistry::new();
        let foo = TypeBuilder::class("com.example", "Foo")
            .nested(
                TypeBuilder::class("", "Builder")
                    .static_()
                    .constructor(|c| c.public())
                    .method("build", |m| m.public().returns(TypeSig::named("com.example.Foo"))),
            )
            .build(&registry)
            .unwrap();
        let builder = registry.get_by_fullname("com.example.Foo.Builder").unwrap();

        let route = ConstructionRoute::BuilderConstructor {
            target: foo,
            builder: builder.clone(),
            constructor: builder.constructors[0].clone(),
            build_method: builder.methods[0].clone(),
        };

        assert!(route.is_builder());
        assert_eq!(route.build_method().unwrap().name, "build");
        assert_eq!(
            route.to_string(),
            "builder constructor com.example.Foo.Builder() -> build()"
        );
    }
}
