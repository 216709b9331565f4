//! Construction route resolution and property unification for value types.
//!
//! This module is the core of the crate. Given a [`crate::model::TypeModel`] and a
//! declared type, it answers two questions a code generator needs:
//!
//! 1. **How is an instance built?** [`CreatorResolver`] enumerates the type's
//!    constructors, static factories and builders and selects exactly one
//!    [`ConstructionRoute`], using [`BuildMethodFinder`] for builder types.
//! 2. **What does an instance consist of?** [`PropertyCollector`] walks the
//!    inheritance graph for fields, accessors and builder setters, and
//!    [`PropertyUnifier`] merges them with the route's parameters into one
//!    canonical [`Properties`] list.
//!
//! [`AnalysisSession`] ties both together and memoizes the results per type.
//!
//! # Key Components
//!
//! - [`AnalysisSession`]: Entry points with memoization, serial and parallel
//! - [`AnalysisConfig`]: Naming conventions and reporting policy
//! - [`Diagnostics`]: Batch collection of [`Diagnostic`] entries
//! - [`SelectionPolicy`]: Pluggable choice among several creator candidates
//!
//! # Examples
//!
//! ```rust
//! use valuescope::analysis::{AnalysisSession, RouteKind};
//! use valuescope::model::{TypeBuilder, TypeRegistry, TypeSig};
//!
//! let registry = TypeRegistry::new();
//! let point = TypeBuilder::class("com.example", "Point")
//!     .field("x", TypeSig::int(), |f| f.private().final_())
//!     .constructor(|c| c.public().param("x", TypeSig::int()))
//!     .method("getX", |m| m.public().returns(TypeSig::int()))
//!     .build(&registry)?;
//!
//! let session = AnalysisSession::new(&registry);
//! let analysis = session.analyze(&point)?;
//!
//! assert_eq!(analysis.route.kind(), RouteKind::Constructor);
//! assert_eq!(analysis.properties.names(), vec!["x"]);
//! # Ok::<(), valuescope::Error>(())
//! ```

use std::collections::HashSet;

use crate::{
    model::{Token, TypeModel, TypeRc},
    Error, Result,
};

mod buildmethod;
mod collector;
mod config;
mod creator;
mod diagnostics;
mod property;
mod route;
mod session;
mod unifier;

pub use buildmethod::BuildMethodFinder;
pub use collector::{Collected, PropertyCollector};
pub use config::{AnalysisConfig, BeanConvention, ReportMode};
pub use creator::{CreatorResolver, MarkerSelection, Selection, SelectionPolicy};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, ErrorReporter, LogReporter};
pub use property::{Properties, Property, PropertyKey, PropertyKind};
pub use route::{ConstructionRoute, RouteKind};
pub use session::{Analysis, AnalysisSession};
pub use unifier::PropertyUnifier;

/// Maximum depth of an inheritance walk
pub const MAX_RECURSION_DEPTH: usize = 64;

/// `root` followed by all of its transitive supertypes, each type once.
///
/// The order is topological: every type precedes all of its own supertypes, even
/// where the graph is a diamond. Among unrelated branches, the superclass chain
/// comes before the interfaces in declaration order. Callers that keep the first
/// member per signature therefore always see the most specific override.
pub(crate) fn hierarchy(model: &dyn TypeModel, root: &TypeRc) -> Result<Vec<TypeRc>> {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    walk(model, root, 0, &mut visited, &mut order)?;
    order.reverse();
    Ok(order)
}

/// Postorder over the supertype graph, visiting the supertypes in reverse so that
/// the reversed result lists them in declaration order.
fn walk(
    model: &dyn TypeModel,
    ty: &TypeRc,
    depth: usize,
    visited: &mut HashSet<Token>,
    order: &mut Vec<TypeRc>,
) -> Result<()> {
    if depth > MAX_RECURSION_DEPTH {
        return Err(Error::RecursionLimit(MAX_RECURSION_DEPTH));
    }

    if !visited.insert(ty.token) {
        return Ok(());
    }

    for supertype in model.supertypes_of(ty).iter().rev() {
        walk(model, supertype, depth + 1, visited, order)?;
    }
    order.push(ty.clone());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TypeBuilder, TypeRegistry, TypeSig};

    #[test]
    fn test_hierarchy_order() {
        let registry = TypeRegistry::new();
        TypeBuilder::interface("com.example", "Named").build(&registry).unwrap();
        TypeBuilder::class("com.example", "Base").build(&registry).unwrap();
        let derived = TypeBuilder::class("com.example", "Derived")
            .extends(TypeSig::named("com.example.Base"))
            .implements(TypeSig::named("com.example.Named"))
            .build(&registry)
            .unwrap();

        let names: Vec<String> = hierarchy(&registry, &derived)
            .unwrap()
            .iter()
            .map(|t| t.fullname())
            .collect();

        assert_eq!(
            names,
            vec![
                "com.example.Derived",
                "com.example.Base",
                "java.lang.Object",
                "com.example.Named"
            ]
        );
    }

    #[test]
    fn test_hierarchy_diamond_is_topological() {
        let registry = TypeRegistry::new();
        TypeBuilder::interface("com.example", "I").build(&registry).unwrap();
        TypeBuilder::interface("com.example", "J")
            .implements(TypeSig::named("com.example.I"))
            .build(&registry)
            .unwrap();
        TypeBuilder::class("com.example", "Base")
            .implements(TypeSig::named("com.example.I"))
            .build(&registry)
            .unwrap();
        let derived = TypeBuilder::class("com.example", "Derived")
            .extends(TypeSig::named("com.example.Base"))
            .implements(TypeSig::named("com.example.J"))
            .build(&registry)
            .unwrap();

        let names: Vec<String> = hierarchy(&registry, &derived)
            .unwrap()
            .iter()
            .map(|t| t.fullname())
            .collect();

        assert_eq!(
            names,
            vec![
                "com.example.Derived",
                "com.example.Base",
                "java.lang.Object",
                "com.example.J",
                "com.example.I"
            ]
        );
    }

    #[test]
    fn test_hierarchy_cycle_terminates() {
        let registry = TypeRegistry::new();
        TypeBuilder::interface("com.example", "A")
            .implements(TypeSig::named("com.example.B"))
            .build(&registry)
            .unwrap();
        let b = TypeBuilder::interface("com.example", "B")
            .implements(TypeSig::named("com.example.A"))
            .build(&registry)
            .unwrap();

        assert_eq!(hierarchy(&registry, &b).unwrap().len(), 2);
    }

    #[test]
    fn test_hierarchy_depth_limit() {
        let registry = TypeRegistry::new();
        TypeBuilder::class("com.example", "T0").build(&registry).unwrap();
        for i in 1..=MAX_RECURSION_DEPTH + 1 {
            TypeBuilder::class("com.example", &format!("T{i}"))
                .extends(TypeSig::named(format!("com.example.T{}", i - 1)))
                .build(&registry)
                .unwrap();
        }
        let deepest = registry
            .get_by_fullname(&format!("com.example.T{}", MAX_RECURSION_DEPTH + 1))
            .unwrap();

        assert!(matches!(
            hierarchy(&registry, &deepest),
            Err(Error::RecursionLimit(MAX_RECURSION_DEPTH))
        ));
    }
}
