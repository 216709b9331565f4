//! Collection of fields, accessors and builder setters.
//!
//! The collector walks the target type's inheritance graph in topological order,
//! every type before its own supertypes, so the first declaration of a name or
//! signature shadows any inherited one, across diamonds too. Members are read
//! through [`TypeModel::members_of`]. Platform types are walked too, but only to fill a separate
//! pool: a local member that re-declares a platform member (an override of
//! `CharSequence.length()`, a field hiding a platform field) is noise inherited
//! from the platform contract and never becomes a candidate.

use std::collections::HashSet;

use crate::{
    analysis::{config::AnalysisConfig, hierarchy, route::ConstructionRoute},
    model::{FieldRc, Members, MethodDescriptor, MethodRc, TypeDescriptor, TypeModel, TypeRc},
    Result,
};

/// Candidate members gathered for one construction route.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    /// Non-static fields, first declaration of each name
    pub fields: Vec<FieldRc>,
    /// Zero-argument accessor methods, most-derived override of each
    pub getters: Vec<MethodRc>,
    /// Single-argument builder setters, first declaration of each name
    pub setters: Vec<MethodRc>,
}

#[derive(Default)]
struct PlatformPool {
    methods: HashSet<String>,
    fields: HashSet<String>,
}

impl PlatformPool {
    fn fill(&mut self, members: &Members) {
        self.methods
            .extend(members.methods.iter().map(|m| m.override_signature()));
        self.fields.extend(members.fields.iter().map(|f| f.name.clone()));
    }
}

/// Gathers the fields, getters and builder setters of a route.
pub struct PropertyCollector<'a> {
    model: &'a dyn TypeModel,
    config: &'a AnalysisConfig,
}

impl<'a> PropertyCollector<'a> {
    /// Creates a collector over a model.
    pub fn new(model: &'a dyn TypeModel, config: &'a AnalysisConfig) -> Self {
        Self { model, config }
    }

    /// Collects the candidates of a route: fields and getters of the target type,
    /// plus setters of the builder type for builder routes.
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] if a hierarchy is too deep.
    pub fn collect(&self, route: &ConstructionRoute) -> Result<Collected> {
        let (fields, getters) = self.collect_members(route.target())?;
        let setters = match route.builder() {
            Some(builder) => self.collect_setters(builder)?,
            None => Vec::new(),
        };

        Ok(Collected {
            fields,
            getters,
            setters,
        })
    }

    /// Collects the eligible fields and accessor methods of `ty` and its supertypes.
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] if the hierarchy is too deep.
    pub fn collect_members(&self, ty: &TypeRc) -> Result<(Vec<FieldRc>, Vec<MethodRc>)> {
        let walk = hierarchy(self.model, ty)?;

        let mut pool = PlatformPool::default();
        for current in walk.iter().filter(|t| self.config.is_platform(t)) {
            pool.fill(&Members::of(self.model, current));
        }

        let mut claimed_fields = HashSet::new();
        let mut claimed_methods = HashSet::new();
        let mut fields = Vec::new();
        let mut getters = Vec::new();

        for current in walk.iter().filter(|t| !self.config.is_platform(t)) {
            let members = Members::of(self.model, current);
            for field in &members.fields {
                if field.is_static() {
                    continue;
                }
                if pool.fields.contains(&field.name) {
                    log::trace!("{}.{} hides a platform field", field.owner, field.name);
                    continue;
                }
                if !claimed_fields.insert(field.name.clone()) {
                    log::trace!("{}.{} is shadowed", field.owner, field.name);
                    continue;
                }
                fields.push(field.clone());
            }

            for method in &members.methods {
                if method.is_static() {
                    continue;
                }

                let signature = method.override_signature();
                if pool.methods.contains(&signature) {
                    log::trace!("{}.{} overrides a platform method", method.owner, signature);
                    continue;
                }
                if !claimed_methods.insert(signature) {
                    log::trace!("{}.{} is overridden", method.owner, method.name);
                    continue;
                }
                if self.is_accessor(current, method) {
                    getters.push(method.clone());
                }
            }
        }

        Ok((fields, getters))
    }

    /// Collects the setters of a builder type: non-private, non-static,
    /// single-argument methods returning the builder (or one of its supertypes,
    /// for setters inherited from a generic base builder).
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] if the hierarchy is too deep.
    pub fn collect_setters(&self, builder: &TypeRc) -> Result<Vec<MethodRc>> {
        let walk: Vec<TypeRc> = hierarchy(self.model, builder)?
            .into_iter()
            .filter(|t| !self.config.is_platform(t))
            .collect();

        let mut claimed = HashSet::new();
        let mut setters = Vec::new();

        for current in &walk {
            for method in &Members::of(self.model, current).methods {
                if method.is_private() || method.is_static() || method.params.len() != 1 {
                    continue;
                }

                let returns_builder = self
                    .model
                    .resolve_return_type(method)
                    .is_some_and(|ret| walk.iter().any(|t| self.model.types_equal(&ret, t)));
                if !returns_builder {
                    continue;
                }

                if claimed.insert(method.name.clone()) {
                    setters.push(method.clone());
                } else {
                    log::trace!("setter {}.{} is overridden", method.owner, method.name);
                }
            }
        }

        Ok(setters)
    }

    fn is_accessor(&self, owner: &TypeDescriptor, method: &MethodDescriptor) -> bool {
        let eligible = !method.is_private()
            && !method.returns.is_void()
            && method.has_no_params()
            && !method.is_synthetic()
            && !self.config.is_excluded_accessor(&method.name)
            && !self.model.is_synthetic_positional_accessor(owner, method);

        if !eligible {
            log::trace!("{}.{} is not an accessor", method.owner, method.name);
        }
        eligible
    }
}
