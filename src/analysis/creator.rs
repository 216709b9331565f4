//! Creator resolution.
//!
//! [`CreatorResolver`] enumerates every viable way of constructing a type and picks
//! exactly one through a [`SelectionPolicy`]:
//!
//! - non-private constructors of the type,
//! - non-private static methods returning the type,
//! - for every non-private static nested type with a build method producing the
//!   type: the nested type's non-private constructors, and the outer type's
//!   non-private static methods returning the nested type.
//!
//! A type whose only constructor is a non-private zero-argument one keeps it as a
//! fallback: it is used only if nothing richer is found. The same rule applies to
//! each nested builder on its own.

use crate::{
    analysis::{
        buildmethod::BuildMethodFinder,
        config::AnalysisConfig,
        diagnostics::{Diagnostic, DiagnosticKind},
        route::ConstructionRoute,
    },
    model::{
        has_annotation, Element, Members, MethodDescriptor, MethodQuery, MethodRc,
        TypeDescriptor, TypeModel, TypeModifiers, TypeRc,
    },
    Error, Result,
};

/// Outcome of a [`SelectionPolicy`]
#[derive(Debug)]
pub enum Selection {
    /// Exactly one route was chosen
    Selected(ConstructionRoute),
    /// There was nothing to choose from
    NotFound,
    /// No single route could be chosen; every candidate is kept for reporting
    Ambiguous(Vec<ConstructionRoute>),
}

/// Chooses one construction route among the enumerated candidates.
pub trait SelectionPolicy: Send + Sync {
    /// Select among `candidates`, which are in enumeration order.
    fn select(&self, model: &dyn TypeModel, candidates: Vec<ConstructionRoute>) -> Selection;
}

/// The default policy: a lone candidate wins; among several, the only one
/// carrying the marker annotation wins.
#[derive(Debug, Clone, Default)]
pub struct MarkerSelection {
    marker: Option<String>,
}

impl MarkerSelection {
    /// Creates the policy with an optional marker annotation type name.
    pub fn new(marker: Option<String>) -> Self {
        Self { marker }
    }
}

impl SelectionPolicy for MarkerSelection {
    fn select(&self, model: &dyn TypeModel, mut candidates: Vec<ConstructionRoute>) -> Selection {
        match candidates.len() {
            0 => return Selection::NotFound,
            1 => {
                if let Some(only) = candidates.pop() {
                    return Selection::Selected(only);
                }
            }
            _ => {}
        }

        if let Some(marker) = &self.marker {
            let marked: Vec<&ConstructionRoute> = candidates
                .iter()
                .filter(|route| has_annotation(&model.annotations_of(&route.as_element()), marker))
                .collect();

            if let [only] = marked.as_slice() {
                return Selection::Selected((*only).clone());
            }
        }

        Selection::Ambiguous(candidates)
    }
}

/// Resolves the construction route of a type.
pub struct CreatorResolver<'a> {
    model: &'a dyn TypeModel,
    config: &'a AnalysisConfig,
    policy: &'a dyn SelectionPolicy,
}

impl<'a> CreatorResolver<'a> {
    /// Creates a resolver.
    ///
    /// ## Arguments
    /// * 'model'  - The type model to read declarations from
    /// * 'config' - Naming conventions
    /// * 'policy' - How to choose among several candidates
    pub fn new(
        model: &'a dyn TypeModel,
        config: &'a AnalysisConfig,
        policy: &'a dyn SelectionPolicy,
    ) -> Self {
        Self {
            model,
            config,
            policy,
        }
    }

    /// Enumerates and selects the construction route of `ty`.
    ///
    /// # Errors
    /// Returns [`Error::Analysis`] with a `NoCreatorFound` entry if there is no
    /// candidate, or one `AmbiguousCreator` entry per candidate if the policy
    /// cannot choose.
    pub fn resolve(&self, ty: &TypeRc) -> Result<ConstructionRoute> {
        let finder = BuildMethodFinder::new(self.model, self.config);
        let mut candidates = Vec::new();
        let members = Members::of(self.model, ty);

        let (constructors, fallback) = self.eligible_constructors(ty);
        for constructor in constructors {
            candidates.push(ConstructionRoute::Constructor {
                target: ty.clone(),
                constructor,
            });
        }

        for factory in self.static_methods_returning(&members.methods, ty) {
            candidates.push(ConstructionRoute::Factory {
                target: ty.clone(),
                factory,
            });
        }

        for nested in &members.nested_types {
            if nested.is_private() || !nested.is_static() {
                continue;
            }

            let Some(build_method) = finder.find(nested)? else {
                log::trace!("nested type {} is not a builder", nested.fullname());
                continue;
            };
            if !self.returns_type(&build_method, ty) {
                log::trace!(
                    "nested type {} builds {}, not {}",
                    nested.fullname(),
                    build_method.returns,
                    ty.fullname()
                );
                continue;
            }

            let before = candidates.len();
            let (constructors, nested_fallback) = self.eligible_constructors(nested);
            for constructor in constructors {
                candidates.push(ConstructionRoute::BuilderConstructor {
                    target: ty.clone(),
                    builder: nested.clone(),
                    constructor,
                    build_method: build_method.clone(),
                });
            }
            for factory in self.static_methods_returning(&members.methods, nested) {
                candidates.push(ConstructionRoute::BuilderFactory {
                    target: ty.clone(),
                    builder: nested.clone(),
                    factory,
                    build_method: build_method.clone(),
                });
            }

            if candidates.len() == before {
                if let Some(constructor) = nested_fallback {
                    candidates.push(ConstructionRoute::BuilderConstructor {
                        target: ty.clone(),
                        builder: nested.clone(),
                        constructor,
                        build_method,
                    });
                }
            }
        }

        if candidates.is_empty() {
            if let Some(constructor) = fallback {
                candidates.push(ConstructionRoute::Constructor {
                    target: ty.clone(),
                    constructor,
                });
            }
        }

        self.select(ty, candidates)
    }

    /// Resolves the route of a builder type: its own constructors, and static
    /// methods of the builder or of the built type returning the builder.
    ///
    /// # Errors
    /// Returns [`Error::Analysis`] with a `NoBuildMethodFound` entry if `builder`
    /// has no usable build method, otherwise as [`CreatorResolver::resolve`].
    pub fn resolve_builder(&self, builder: &TypeRc) -> Result<ConstructionRoute> {
        let (build_method, target) = self.require_build_method(builder)?;
        let mut candidates = Vec::new();

        let (constructors, fallback) = self.eligible_constructors(builder);
        for constructor in constructors {
            candidates.push(ConstructionRoute::BuilderConstructor {
                target: target.clone(),
                builder: builder.clone(),
                constructor,
                build_method: build_method.clone(),
            });
        }

        let declared_on = [builder, &target];
        for owner in declared_on {
            let methods = Members::of(self.model, owner).methods;
            for factory in self.static_methods_returning(&methods, builder) {
                candidates.push(ConstructionRoute::BuilderFactory {
                    target: target.clone(),
                    builder: builder.clone(),
                    factory,
                    build_method: build_method.clone(),
                });
            }
        }

        if candidates.is_empty() {
            if let Some(constructor) = fallback {
                candidates.push(ConstructionRoute::BuilderConstructor {
                    target: target.clone(),
                    builder: builder.clone(),
                    constructor,
                    build_method,
                });
            }
        }

        self.select(builder, candidates)
    }

    /// Resolves the route starting from a known element.
    ///
    /// A type is enumerated (as a builder if `from_builder`); a constructor or
    /// static method is used directly as the construction element.
    ///
    /// # Errors
    /// Returns [`Error::Analysis`] with an `InvalidElementKind` entry for fields,
    /// plus the errors of the route form the element maps to.
    pub fn resolve_element(&self, element: &Element, from_builder: bool) -> Result<ConstructionRoute> {
        match (element, from_builder) {
            (Element::Type(ty), false) => self.resolve(ty),
            (Element::Type(ty), true) => self.resolve_builder(ty),
            (Element::Constructor(ctor), false) => self.constructor_route(ctor),
            (Element::Constructor(ctor), true) => self.builder_constructor_route(ctor),
            (Element::Method(method), false) => self.factory_route(method),
            (Element::Method(method), true) => self.builder_factory_route(method),
            (Element::Field(_), _) => Err(analysis_error!(
                DiagnosticKind::InvalidElementKind,
                element.clone(),
                "expected a type, constructor or static method, found field {}",
                element
            )),
        }
    }

    /// A route through a known constructor of the target type.
    ///
    /// # Errors
    /// Returns an `InvalidElementKind` diagnostic if `constructor` is a method, or
    /// [`Error::TypeNotFound`] if its owner is not in the model.
    pub fn constructor_route(&self, constructor: &MethodRc) -> Result<ConstructionRoute> {
        self.expect_constructor(constructor)?;
        Ok(ConstructionRoute::Constructor {
            target: self.owner_of(constructor)?,
            constructor: constructor.clone(),
        })
    }

    /// A route through a known static factory method.
    ///
    /// # Errors
    /// Returns an `InvalidElementKind` diagnostic if `factory` is a constructor,
    /// an instance method, or a static method whose return type is `void`, a
    /// primitive or not a declared type of the model.
    pub fn factory_route(&self, factory: &MethodRc) -> Result<ConstructionRoute> {
        Ok(ConstructionRoute::Factory {
            target: self.expect_factory(factory)?,
            factory: factory.clone(),
        })
    }

    /// A route through a known constructor of a builder type.
    ///
    /// # Errors
    /// As [`CreatorResolver::constructor_route`], plus a `NoBuildMethodFound`
    /// diagnostic if the builder has no usable build method.
    pub fn builder_constructor_route(&self, constructor: &MethodRc) -> Result<ConstructionRoute> {
        self.expect_constructor(constructor)?;
        let builder = self.owner_of(constructor)?;
        let (build_method, target) = self.require_build_method(&builder)?;
        Ok(ConstructionRoute::BuilderConstructor {
            target,
            builder,
            constructor: constructor.clone(),
            build_method,
        })
    }

    /// A route through a known static method returning a builder type.
    ///
    /// # Errors
    /// As [`CreatorResolver::factory_route`], plus a `NoBuildMethodFound`
    /// diagnostic if the returned builder has no usable build method.
    pub fn builder_factory_route(&self, factory: &MethodRc) -> Result<ConstructionRoute> {
        let builder = self.expect_factory(factory)?;
        let (build_method, target) = self.require_build_method(&builder)?;
        Ok(ConstructionRoute::BuilderFactory {
            target,
            builder,
            factory: factory.clone(),
            build_method,
        })
    }

    fn select(&self, ty: &TypeRc, candidates: Vec<ConstructionRoute>) -> Result<ConstructionRoute> {
        log::debug!("{} creator candidate(s) for {}", candidates.len(), ty.fullname());

        match self.policy.select(self.model, candidates) {
            Selection::Selected(route) => {
                log::debug!("selected {route} for {}", ty.fullname());
                Ok(route)
            }
            Selection::NotFound => Err(analysis_error!(
                DiagnosticKind::NoCreatorFound,
                Element::Type(ty.clone()),
                "no constructor, factory or builder found for {}",
                ty.fullname()
            )),
            Selection::Ambiguous(candidates) => Err(Error::Analysis(
                candidates
                    .iter()
                    .map(|route| {
                        Diagnostic::new(
                            DiagnosticKind::AmbiguousCreator,
                            format!("ambiguous creator for {}: {route}", ty.fullname()),
                        )
                        .with_element(route.as_element())
                    })
                    .collect(),
            )),
        }
    }

    /// Non-private constructors, or the held-back zero-argument fallback
    fn eligible_constructors(&self, ty: &TypeDescriptor) -> (Vec<MethodRc>, Option<MethodRc>) {
        if ty.modifiers().contains(TypeModifiers::ABSTRACT) {
            return (Vec::new(), None);
        }

        let constructors = Members::of(self.model, ty).constructors;
        if let [only] = constructors.as_slice() {
            if !only.is_private() && only.has_no_params() {
                return (Vec::new(), Some(only.clone()));
            }
        }

        let found = MethodQuery::new(&constructors).non_private().find_all();
        (found, None)
    }

    fn static_methods_returning(&self, methods: &[MethodRc], ty: &TypeDescriptor) -> Vec<MethodRc> {
        MethodQuery::new(methods)
            .non_private()
            .static_methods()
            .filter(|m| self.returns_type(m, ty))
            .find_all()
    }

    fn returns_type(&self, method: &MethodDescriptor, ty: &TypeDescriptor) -> bool {
        self.model
            .resolve_return_type(method)
            .is_some_and(|ret| self.model.types_equal(&ret, ty))
    }

    fn require_build_method(&self, builder: &TypeRc) -> Result<(MethodRc, TypeRc)> {
        let finder = BuildMethodFinder::new(self.model, self.config);
        let build_method = finder.find(builder)?;

        match build_method
            .as_ref()
            .and_then(|m| self.model.resolve_return_type(m).map(|target| (m.clone(), target)))
        {
            Some(found) => Ok(found),
            None => Err(analysis_error!(
                DiagnosticKind::NoBuildMethodFound,
                Element::Type(builder.clone()),
                "no build method found on builder {}",
                builder.fullname()
            )),
        }
    }

    fn expect_constructor(&self, method: &MethodRc) -> Result<()> {
        if method.is_constructor() {
            return Ok(());
        }

        let element = Element::from_method(method);
        Err(analysis_error!(
            DiagnosticKind::InvalidElementKind,
            element.clone(),
            "expected a constructor, found method {}",
            element
        ))
    }

    /// The type a static factory produces; anything else is the wrong kind of
    /// element, including static methods returning `void` or a primitive
    fn expect_factory(&self, method: &MethodRc) -> Result<TypeRc> {
        if !method.is_constructor() && method.is_static() {
            if let Some(produced) = self.model.resolve_return_type(method) {
                return Ok(produced);
            }
        }

        let element = Element::from_method(method);
        Err(analysis_error!(
            DiagnosticKind::InvalidElementKind,
            element.clone(),
            "expected a static factory method, found {} returning {}",
            element,
            method.returns
        ))
    }

    fn owner_of(&self, method: &MethodDescriptor) -> Result<TypeRc> {
        self.model
            .type_by_name(&method.owner)
            .ok_or_else(|| Error::TypeNotFound(method.owner.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TypeBuilder, TypeRegistry, TypeSig};
    use crate::analysis::RouteKind;

    fn resolve(registry: &TypeRegistry, ty: &TypeRc) -> Result<ConstructionRoute> {
        let config = AnalysisConfig::default();
        let policy = MarkerSelection::new(config.creator_marker.clone());
        CreatorResolver::new(registry, &config, &policy).resolve(ty)
    }

    fn foo() -> TypeSig {
        TypeSig::named("com.example.Foo")
    }

    #[test]
    fn test_single_zero_arg_constructor() {
        let registry = TypeRegistry::new();
        let ty = TypeBuilder::class("com.example", "Foo")
            .constructor(|c| c.public())
            .build(&registry)
            .unwrap();

        let route = resolve(&registry, &ty).unwrap();
        assert_eq!(route.kind(), RouteKind::Constructor);
        assert_eq!(route.element().key(), ty.constructors[0].key());
    }

    #[test]
    fn test_zero_arg_constructor_yields_to_factory() {
        let registry = TypeRegistry::new();
        let ty = TypeBuilder::class("com.example", "Foo")
            .constructor(|c| c.public())
            .method("of", |m| m.public().static_().returns(foo()))
            .build(&registry)
            .unwrap();

        let route = resolve(&registry, &ty).unwrap();
        assert_eq!(route.kind(), RouteKind::Factory);
    }

    #[test]
    fn test_constructor_and_factory_are_ambiguous() {
        let registry = TypeRegistry::new();
        let ty = TypeBuilder::class("com.example", "Foo")
            .constructor(|c| c.public().param("x", TypeSig::int()))
            .method("of", |m| {
                m.public().static_().param("x", TypeSig::int()).returns(foo())
            })
            .build(&registry)
            .unwrap();

        let error = resolve(&registry, &ty).unwrap_err();
        let diagnostics = error.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::AmbiguousCreator));
        assert!(matches!(diagnostics[0].element, Some(Element::Constructor(_))));
        assert!(matches!(diagnostics[1].element, Some(Element::Method(_))));
    }

    #[test]
    fn test_private_members_are_not_candidates() {
        let registry = TypeRegistry::new();
        let ty = TypeBuilder::class("com.example", "Foo")
            .constructor(|c| c.private().param("x", TypeSig::int()))
            .method("of", |m| m.private().static_().returns(foo()))
            .build(&registry)
            .unwrap();

        let error = resolve(&registry, &ty).unwrap_err();
        assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::NoCreatorFound);
    }

    #[test]
    fn test_nested_builder_with_factory() {
        let registry = TypeRegistry::new();
        let ty = TypeBuilder::class("com.example", "Foo")
            .constructor(|c| c.private())
            .method("builder", |m| {
                m.public()
                    .static_()
                    .returns(TypeSig::named("com.example.Foo.Builder"))
            })
            .nested(
                TypeBuilder::class("", "Builder")
                    .public()
                    .static_()
                    .constructor(|c| c.private())
                    .method("build", |m| m.public().returns(foo())),
            )
            .build(&registry)
            .unwrap();

        let route = resolve(&registry, &ty).unwrap();
        assert_eq!(route.kind(), RouteKind::BuilderFactory);
        assert_eq!(route.builder().unwrap().fullname(), "com.example.Foo.Builder");
        assert_eq!(route.build_method().unwrap().name, "build");
    }

    #[test]
    fn test_nested_builder_fallback_constructor_is_promoted() {
        let registry = TypeRegistry::new();
        let ty = TypeBuilder::class("com.example", "Foo")
            .constructor(|c| c.private())
            .nested(
                TypeBuilder::class("", "Builder")
                    .static_()
                    .constructor(|c| c.public())
                    .method("build", |m| m.public().returns(foo())),
            )
            .build(&registry)
            .unwrap();

        let route = resolve(&registry, &ty).unwrap();
        assert_eq!(route.kind(), RouteKind::BuilderConstructor);
    }

    #[test]
    fn test_non_static_nested_type_is_ignored() {
        let registry = TypeRegistry::new();
        let ty = TypeBuilder::class("com.example", "Foo")
            .constructor(|c| c.public())
            .nested(
                TypeBuilder::class("", "Builder")
                    .constructor(|c| c.public().param("x", TypeSig::int()))
                    .method("build", |m| m.public().returns(foo())),
            )
            .build(&registry)
            .unwrap();

        let route = resolve(&registry, &ty).unwrap();
        assert_eq!(route.kind(), RouteKind::Constructor);
    }

    #[test]
    fn test_marker_selects_among_candidates() {
        let registry = TypeRegistry::new();
        let marker = registry.annotation("com.example.Creator");
        let ty = TypeBuilder::class("com.example", "Foo")
            .constructor(|c| c.public().param("x", TypeSig::int()))
            .method("of", |m| {
                m.public()
                    .static_()
                    .param("x", TypeSig::int())
                    .returns(foo())
                    .annotated(marker)
            })
            .build(&registry)
            .unwrap();

        let config = AnalysisConfig::default().with_creator_marker("com.example.Creator");
        let policy = MarkerSelection::new(config.creator_marker.clone());
        let route = CreatorResolver::new(&registry, &config, &policy)
            .resolve(&ty)
            .unwrap();
        assert_eq!(route.kind(), RouteKind::Factory);
    }

    #[test]
    fn test_element_entry_points() {
        let registry = TypeRegistry::new();
        let ty = TypeBuilder::class("com.example", "Foo")
            .field("x", TypeSig::int(), |f| f.private())
            .constructor(|c| c.public().param("x", TypeSig::int()))
            .method("of", |m| m.public().static_().returns(foo()))
            .build(&registry)
            .unwrap();

        let config = AnalysisConfig::default();
        let policy = MarkerSelection::default();
        let resolver = CreatorResolver::new(&registry, &config, &policy);

        let route = resolver
            .resolve_element(&Element::Constructor(ty.constructors[0].clone()), false)
            .unwrap();
        assert_eq!(route.kind(), RouteKind::Constructor);

        let error = resolver.factory_route(&ty.constructors[0]).unwrap_err();
        assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::InvalidElementKind);

        let error = resolver
            .resolve_element(&Element::Field(ty.fields[0].clone()), false)
            .unwrap_err();
        assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::InvalidElementKind);

        let error = resolver.builder_factory_route(&ty.methods[0]).unwrap_err();
        assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::NoBuildMethodFound);
    }

    #[test]
    fn test_static_method_without_declared_result_is_not_a_factory() {
        let registry = TypeRegistry::new();
        let ty = TypeBuilder::class("com.example", "Foo")
            .method("count", |m| m.public().static_().returns(TypeSig::int()))
            .method("reset", |m| m.public().static_())
            .method("load", |m| {
                m.public()
                    .static_()
                    .returns(TypeSig::named("com.example.Missing"))
            })
            .build(&registry)
            .unwrap();

        let config = AnalysisConfig::default();
        let policy = MarkerSelection::default();
        let resolver = CreatorResolver::new(&registry, &config, &policy);

        for method in &ty.methods {
            let error = resolver.factory_route(method).unwrap_err();
            assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::InvalidElementKind);

            let error = resolver.builder_factory_route(method).unwrap_err();
            assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::InvalidElementKind);
        }
    }
}
