//! Analysis sessions.
//!
//! An [`AnalysisSession`] is the entry point of the crate. It owns the
//! configuration and the selection policy, borrows a [`TypeModel`], and memoizes
//! every resolved route and property set for its lifetime. Failures are memoized
//! as well, so asking twice yields the same diagnostics.
//!
//! # Thread Safety
//!
//! Both caches are `DashMap`s, so a session can be shared between threads and
//! [`AnalysisSession::analyze_all`] fans out over `rayon`. Two threads racing on
//! the first access to the same entry may both compute it; the analysis is
//! deterministic and the first stored result is the one every caller sees.

use dashmap::DashMap;
use rayon::prelude::*;

use crate::{
    analysis::{
        collector::PropertyCollector,
        config::AnalysisConfig,
        creator::{CreatorResolver, MarkerSelection, SelectionPolicy},
        property::Properties,
        route::{ConstructionRoute, RouteKind},
        unifier::PropertyUnifier,
    },
    model::{Element, MemberKey, MethodRc, Token, TypeModel, TypeRc},
    Result,
};

/// How a memoized route was asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Entry {
    Type,
    Builder,
    Route(RouteKind),
}

/// The route and properties of one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// How an instance is built
    pub route: ConstructionRoute,
    /// What an instance consists of
    pub properties: Properties,
}

/// Memoizing front end over [`CreatorResolver`], [`PropertyCollector`] and
/// [`PropertyUnifier`].
///
/// # Examples
///
/// ```rust
/// use valuescope::analysis::{AnalysisConfig, AnalysisSession};
/// use valuescope::model::{TypeBuilder, TypeRegistry, TypeSig};
///
/// let registry = TypeRegistry::new();
/// let money = TypeBuilder::class("com.example", "Money")
///     .method("of", |m| {
///         m.public()
///             .static_()
///             .param("amount", TypeSig::long())
///             .returns(TypeSig::named("com.example.Money"))
///     })
///     .method("amount", |m| m.public().returns(TypeSig::long()))
///     .build(&registry)?;
///
/// let session = AnalysisSession::with_config(&registry, AnalysisConfig::default());
/// let route = session.resolve_type(&money)?;
/// let properties = session.properties_of(&route)?;
///
/// assert_eq!(route.element().name, "of");
/// assert_eq!(properties.names(), vec!["amount"]);
/// # Ok::<(), valuescope::Error>(())
/// ```
pub struct AnalysisSession<'a> {
    model: &'a dyn TypeModel,
    config: AnalysisConfig,
    policy: Box<dyn SelectionPolicy + 'a>,
    routes: DashMap<(Token, Entry), Result<ConstructionRoute>>,
    properties: DashMap<(RouteKind, MemberKey), Result<Properties>>,
}

impl<'a> AnalysisSession<'a> {
    /// Creates a session with the default configuration.
    pub fn new(model: &'a dyn TypeModel) -> Self {
        Self::with_config(model, AnalysisConfig::default())
    }

    /// Creates a session with a custom configuration.
    ///
    /// The selection policy is [`MarkerSelection`] over the configured creator
    /// marker.
    pub fn with_config(model: &'a dyn TypeModel, config: AnalysisConfig) -> Self {
        let policy = Box::new(MarkerSelection::new(config.creator_marker.clone()));
        Self {
            model,
            config,
            policy,
            routes: DashMap::new(),
            properties: DashMap::new(),
        }
    }

    /// Replaces the selection policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl SelectionPolicy + 'a) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// The configuration of this session
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn resolver(&self) -> CreatorResolver<'_> {
        CreatorResolver::new(self.model, &self.config, self.policy.as_ref())
    }

    fn memoized(
        &self,
        key: (Token, Entry),
        compute: impl FnOnce() -> Result<ConstructionRoute>,
    ) -> Result<ConstructionRoute> {
        if let Some(hit) = self.routes.get(&key) {
            return hit.value().clone();
        }

        let result = compute();
        self.routes.entry(key).or_insert(result).value().clone()
    }

    /// Resolves the construction route starting from a type or a member.
    ///
    /// ## Arguments
    /// * 'element'      - A type to enumerate, or a constructor / static method to use as is
    /// * 'from_builder' - Treat the type (or the element's type) as a builder
    ///
    /// # Errors
    /// Returns [`crate::Error::Analysis`] with the diagnostics of the failed resolution.
    pub fn resolve_route(&self, element: &Element, from_builder: bool) -> Result<ConstructionRoute> {
        let entry = match (element, from_builder) {
            (Element::Type(_), false) => Entry::Type,
            (Element::Type(_), true) => Entry::Builder,
            (Element::Constructor(_), false) => Entry::Route(RouteKind::Constructor),
            (Element::Constructor(_), true) => Entry::Route(RouteKind::BuilderConstructor),
            (Element::Method(_), false) => Entry::Route(RouteKind::Factory),
            (Element::Method(_), true) => Entry::Route(RouteKind::BuilderFactory),
            (Element::Field(_), _) => return self.resolver().resolve_element(element, from_builder),
        };

        self.memoized((element.token(), entry), || {
            self.resolver().resolve_element(element, from_builder)
        })
    }

    /// Resolves the construction route of a type.
    ///
    /// # Errors
    /// Returns [`crate::Error::Analysis`] if the type has no creator or several.
    pub fn resolve_type(&self, ty: &TypeRc) -> Result<ConstructionRoute> {
        self.resolve_route(&Element::Type(ty.clone()), false)
    }

    /// A route through a known constructor.
    ///
    /// # Errors
    /// Returns an `InvalidElementKind` diagnostic if `constructor` is a method.
    pub fn route_for_constructor(&self, constructor: &MethodRc) -> Result<ConstructionRoute> {
        self.memoized((constructor.token, Entry::Route(RouteKind::Constructor)), || {
            self.resolver().constructor_route(constructor)
        })
    }

    /// A route through a known static factory.
    ///
    /// # Errors
    /// Returns an `InvalidElementKind` diagnostic if `factory` is not a static method.
    pub fn route_for_factory(&self, factory: &MethodRc) -> Result<ConstructionRoute> {
        self.memoized((factory.token, Entry::Route(RouteKind::Factory)), || {
            self.resolver().factory_route(factory)
        })
    }

    /// A route through a known builder constructor.
    ///
    /// # Errors
    /// Returns an `InvalidElementKind` diagnostic if `constructor` is a method, or
    /// `NoBuildMethodFound` if its type has no build method.
    pub fn route_for_builder_constructor(&self, constructor: &MethodRc) -> Result<ConstructionRoute> {
        self.memoized(
            (constructor.token, Entry::Route(RouteKind::BuilderConstructor)),
            || self.resolver().builder_constructor_route(constructor),
        )
    }

    /// A route through a known static method returning a builder.
    ///
    /// # Errors
    /// Returns an `InvalidElementKind` diagnostic if `factory` is not a static
    /// method, or `NoBuildMethodFound` if the builder has no build method.
    pub fn route_for_builder_factory(&self, factory: &MethodRc) -> Result<ConstructionRoute> {
        self.memoized((factory.token, Entry::Route(RouteKind::BuilderFactory)), || {
            self.resolver().builder_factory_route(factory)
        })
    }

    /// Unified properties of a resolved route.
    ///
    /// # Errors
    /// Returns [`crate::Error::Analysis`] with `DuplicateAnnotation` entries, or
    /// [`crate::Error::RecursionLimit`] for an overly deep hierarchy.
    pub fn properties_of(&self, route: &ConstructionRoute) -> Result<Properties> {
        let key = (route.kind(), route.key());
        if let Some(hit) = self.properties.get(&key) {
            return hit.value().clone();
        }

        let unifier = PropertyUnifier::new(self.model, &self.config);
        let result = PropertyCollector::new(self.model, &self.config)
            .collect(route)
            .and_then(|collected| unifier.unify(route, collected));

        self.properties.entry(key).or_insert(result).value().clone()
    }

    /// Resolves the route of `ty` and its properties.
    ///
    /// # Errors
    /// Returns the first failure of either step; no partial result is produced.
    pub fn analyze(&self, ty: &TypeRc) -> Result<Analysis> {
        let route = self.resolve_type(ty)?;
        let properties = self.properties_of(&route)?;
        Ok(Analysis { route, properties })
    }

    /// Analyzes many types in parallel.
    ///
    /// Results are in input order; one type failing does not affect the others.
    pub fn analyze_all(&self, types: &[TypeRc]) -> Vec<Result<Analysis>> {
        types.par_iter().map(|ty| self.analyze(ty)).collect()
    }

    /// Number of memoized routes, failures included
    pub fn cached_routes(&self) -> usize {
        self.routes.len()
    }

    /// Drops every memoized result
    pub fn clear(&self) {
        self.routes.clear();
        self.properties.clear();
    }
}
