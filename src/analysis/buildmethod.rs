//! Build method detection for builder types.
//!
//! A builder type is only useful if exactly one of its methods materializes the
//! target value. [`BuildMethodFinder`] locates that method with a small set of
//! heuristics over the builder's (inherited) zero-argument methods.

use std::collections::HashSet;

use crate::{
    analysis::{config::AnalysisConfig, hierarchy},
    model::{Members, MethodDescriptor, MethodQuery, MethodRc, TypeDescriptor, TypeModel, TypeRc},
    Result,
};

/// Finds the method of a builder type that produces the target value.
///
/// A method is a *possible* build method if it is a non-private instance method
/// without parameters whose return type resolves to a declared type that is
/// neither the builder itself nor a platform type. Among several possible build
/// methods, the single one named with a conventional build verb wins; two or more
/// conventionally named candidates (or none at all) leave the builder unresolved.
///
/// If no method qualifies, a zero-argument method returning the builder's
/// enclosing type is accepted instead.
pub struct BuildMethodFinder<'a> {
    model: &'a dyn TypeModel,
    config: &'a AnalysisConfig,
}

impl<'a> BuildMethodFinder<'a> {
    /// Creates a finder over a model.
    pub fn new(model: &'a dyn TypeModel, config: &'a AnalysisConfig) -> Self {
        Self { model, config }
    }

    /// Finds the build method of `builder`.
    ///
    /// ## Arguments
    /// * 'builder' - The candidate builder type
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] if the builder's hierarchy is too deep.
    pub fn find(&self, builder: &TypeRc) -> Result<Option<MethodRc>> {
        let methods = self.inherited_methods(builder)?;

        let possible = MethodQuery::new(&methods)
            .non_private()
            .instance()
            .no_params()
            .filter(|m| self.is_possible_build_method(builder, m))
            .find_all();

        if !possible.is_empty() {
            return Ok(self.disambiguate(builder, possible));
        }

        let Some(enclosing) = self.model.enclosing_type_of(builder) else {
            log::debug!("no build method on {}", builder.fullname());
            return Ok(None);
        };

        let fallback = MethodQuery::new(&methods)
            .non_private()
            .instance()
            .no_params()
            .filter(|m| {
                self.model
                    .resolve_return_type(m)
                    .is_some_and(|ret| self.model.types_equal(&ret, &enclosing))
            })
            .find_all();

        if fallback.is_empty() {
            log::debug!("no build method on {}", builder.fullname());
            return Ok(None);
        }

        Ok(self.disambiguate(builder, fallback))
    }

    /// The methods of `ty` and its supertypes; an override hides the methods it
    /// overrides, including an interface method reached again through a diamond.
    fn inherited_methods(&self, ty: &TypeRc) -> Result<Vec<MethodRc>> {
        let mut seen = HashSet::new();
        let mut methods = Vec::new();

        for current in hierarchy(self.model, ty)? {
            for method in Members::of(self.model, &current).methods {
                if seen.insert(method.override_signature()) {
                    methods.push(method);
                }
            }
        }

        Ok(methods)
    }

    fn is_possible_build_method(&self, builder: &TypeDescriptor, method: &MethodDescriptor) -> bool {
        if method.returns.is_void() || method.returns.is_primitive() {
            return false;
        }

        if self.config.is_platform_sig(&method.returns) {
            return false;
        }

        match self.model.resolve_return_type(method) {
            Some(ret) => !self.model.types_equal(&ret, builder) && !self.config.is_platform(&ret),
            None => {
                log::warn!(
                    "return type {} of {}.{} cannot be resolved",
                    method.returns,
                    method.owner,
                    method.name
                );
                false
            }
        }
    }

    fn disambiguate(&self, builder: &TypeDescriptor, candidates: Vec<MethodRc>) -> Option<MethodRc> {
        if candidates.len() == 1 {
            return candidates.into_iter().next();
        }

        let conventional: Vec<MethodRc> = candidates
            .iter()
            .filter(|m| self.config.is_build_verb(&m.name))
            .cloned()
            .collect();

        if conventional.len() == 1 {
            return conventional.into_iter().next();
        }

        log::debug!(
            "{} build method candidates on {} ({} conventionally named), none selected",
            candidates.len(),
            builder.fullname(),
            conventional.len()
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TypeBuilder, TypeRegistry, TypeSig};

    fn find(registry: &TypeRegistry, builder: &TypeRc) -> Option<MethodRc> {
        let config = AnalysisConfig::default();
        BuildMethodFinder::new(registry, &config).find(builder).unwrap()
    }

    fn target(registry: &TypeRegistry) {
        TypeBuilder::class("com.example", "Target").build(registry).unwrap();
    }

    #[test]
    fn test_single_candidate_any_name() {
        let registry = TypeRegistry::new();
        target(&registry);
        let builder = TypeBuilder::class("com.example", "TargetMaker")
            .method("finish", |m| m.public().returns(TypeSig::named("com.example.Target")))
            .method("size", |m| m.public().returns(TypeSig::int()))
            .method("self_", |m| m.public().returns(TypeSig::named("com.example.TargetMaker")))
            .method("describe", |m| m.public().returns(TypeSig::named("java.lang.String")))
            .build(&registry)
            .unwrap();

        assert_eq!(find(&registry, &builder).unwrap().name, "finish");
    }

    #[test]
    fn test_build_verb_tie_break() {
        let registry = TypeRegistry::new();
        target(&registry);
        let builder = TypeBuilder::class("com.example", "TargetBuilder")
            .method("toTarget", |m| m.public().returns(TypeSig::named("com.example.Target")))
            .method("build", |m| m.public().returns(TypeSig::named("com.example.Target")))
            .build(&registry)
            .unwrap();

        assert_eq!(find(&registry, &builder).unwrap().name, "build");
    }

    #[test]
    fn test_two_conventional_names_are_ambiguous() {
        let registry = TypeRegistry::new();
        target(&registry);
        let builder = TypeBuilder::class("com.example", "TargetBuilder")
            .method("create", |m| m.public().returns(TypeSig::named("com.example.Target")))
            .method("build", |m| m.public().returns(TypeSig::named("com.example.Target")))
            .build(&registry)
            .unwrap();

        assert!(find(&registry, &builder).is_none());
    }

    #[test]
    fn test_no_conventional_name_is_ambiguous() {
        let registry = TypeRegistry::new();
        target(&registry);
        let builder = TypeBuilder::class("com.example", "TargetBuilder")
            .method("first", |m| m.public().returns(TypeSig::named("com.example.Target")))
            .method("second", |m| m.public().returns(TypeSig::named("com.example.Target")))
            .build(&registry)
            .unwrap();

        assert!(find(&registry, &builder).is_none());
    }

    #[test]
    fn test_static_private_and_parameterized_are_ignored() {
        let registry = TypeRegistry::new();
        target(&registry);
        let builder = TypeBuilder::class("com.example", "TargetBuilder")
            .method("of", |m| {
                m.public().static_().returns(TypeSig::named("com.example.Target"))
            })
            .method("hidden", |m| m.private().returns(TypeSig::named("com.example.Target")))
            .method("with", |m| {
                m.public()
                    .param("x", TypeSig::int())
                    .returns(TypeSig::named("com.example.Target"))
            })
            .build(&registry)
            .unwrap();

        assert!(find(&registry, &builder).is_none());
    }

    #[test]
    fn test_inherited_build_method() {
        let registry = TypeRegistry::new();
        target(&registry);
        TypeBuilder::class("com.example", "AbstractBuilder")
            .abstract_()
            .method("build", |m| {
                m.public().abstract_().returns(TypeSig::named("com.example.Target"))
            })
            .build(&registry)
            .unwrap();
        let builder = TypeBuilder::class("com.example", "TargetBuilder")
            .extends(TypeSig::named("com.example.AbstractBuilder"))
            .build(&registry)
            .unwrap();

        let build = find(&registry, &builder).unwrap();
        assert_eq!(build.owner, "com.example.AbstractBuilder");
    }

    #[test]
    fn test_diamond_uses_most_specific_build_method() {
        let registry = TypeRegistry::new();
        TypeBuilder::class("com.example", "Shape").build(&registry).unwrap();
        TypeBuilder::class("com.example", "Square")
            .extends(TypeSig::named("com.example.Shape"))
            .build(&registry)
            .unwrap();
        TypeBuilder::interface("com.example", "Gen")
            .method("build", |m| {
                m.public().abstract_().returns(TypeSig::named("com.example.Shape"))
            })
            .build(&registry)
            .unwrap();
        TypeBuilder::interface("com.example", "SquareGen")
            .implements(TypeSig::named("com.example.Gen"))
            .method("build", |m| {
                m.public().abstract_().returns(TypeSig::named("com.example.Square"))
            })
            .build(&registry)
            .unwrap();
        TypeBuilder::class("com.example", "AbstractGen")
            .abstract_()
            .implements(TypeSig::named("com.example.Gen"))
            .build(&registry)
            .unwrap();
        let builder = TypeBuilder::class("com.example", "SquareBuilder")
            .extends(TypeSig::named("com.example.AbstractGen"))
            .implements(TypeSig::named("com.example.SquareGen"))
            .build(&registry)
            .unwrap();

        let build = find(&registry, &builder).unwrap();
        assert_eq!(build.owner, "com.example.SquareGen");
        assert_eq!(build.returns, TypeSig::named("com.example.Square"));
    }

    #[test]
    fn test_enclosing_type_fallback() {
        let registry = TypeRegistry::new();
        // The enclosing type lives in a platform-like namespace, so its return
        // type is not a possible build method by itself.
        TypeBuilder::class("javax.example", "Outer")
            .nested(
                TypeBuilder::class("", "Builder")
                    .static_()
                    .method("get", |m| m.public().returns(TypeSig::named("javax.example.Outer"))),
            )
            .build(&registry)
            .unwrap();
        let builder = registry.get_by_fullname("javax.example.Outer.Builder").unwrap();

        assert_eq!(find(&registry, &builder).unwrap().name, "get");
    }
}
