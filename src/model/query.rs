//! Composable query system for methods and constructors.
//!
//! Instead of writing manual iteration loops with nested conditionals, the
//! analysis composes readable filter chains over a type's members.
//!
//! # Examples
//!
//! ```rust
//! use valuescope::model::{MethodQuery, TypeBuilder, TypeRegistry, TypeSig};
//!
//! let registry = TypeRegistry::new();
//! let foo = TypeBuilder::class("com.example", "Foo")
//!     .method("of", |m| m.public().static_().param("x", TypeSig::int()))
//!     .method("size", |m| m.public().returns(TypeSig::int()))
//!     .build(&registry)?;
//!
//! let factories = MethodQuery::new(&foo.methods).non_private().static_methods().find_all();
//! assert_eq!(factories.len(), 1);
//! # Ok::<(), valuescope::Error>(())
//! ```

use crate::model::{
    member::{MethodDescriptor, MethodRc},
    signature::TypeSig,
};

/// A boxed filter predicate over [`MethodDescriptor`] references.
type MethodFilter<'a> = Box<dyn Fn(&MethodDescriptor) -> bool + 'a>;

/// A composable query builder for filtering methods or constructors.
///
/// Each fluent method consumes and returns `Self`, allowing chained calls.
/// Terminal methods like [`MethodQuery::find_all`] execute the query and return
/// results in declaration order.
pub struct MethodQuery<'a> {
    methods: &'a [MethodRc],
    filters: Vec<MethodFilter<'a>>,
}

impl<'a> MethodQuery<'a> {
    /// Creates a new `MethodQuery` over a list of methods.
    pub fn new(methods: &'a [MethodRc]) -> Self {
        Self {
            methods,
            filters: Vec::new(),
        }
    }

    /// Filters to methods that are not private.
    #[must_use]
    pub fn non_private(mut self) -> Self {
        self.filters.push(Box::new(|m| !m.is_private()));
        self
    }

    /// Filters to static methods.
    #[must_use]
    pub fn static_methods(mut self) -> Self {
        self.filters.push(Box::new(MethodDescriptor::is_static));
        self
    }

    /// Filters to instance (non-static) methods.
    #[must_use]
    pub fn instance(mut self) -> Self {
        self.filters.push(Box::new(|m| !m.is_static()));
        self
    }

    /// Filters to methods without parameters.
    #[must_use]
    pub fn no_params(mut self) -> Self {
        self.filters.push(Box::new(MethodDescriptor::has_no_params));
        self
    }

    /// Filters to methods with exactly `n` parameters.
    #[must_use]
    pub fn param_count(mut self, n: usize) -> Self {
        self.filters.push(Box::new(move |m| m.params.len() == n));
        self
    }

    /// Filters to methods with the exact name.
    #[must_use]
    pub fn name(mut self, name: &'a str) -> Self {
        self.filters.push(Box::new(move |m| m.name == name));
        self
    }

    /// Filters to methods whose return type satisfies `predicate`.
    #[must_use]
    pub fn returning(mut self, predicate: impl Fn(&TypeSig) -> bool + 'a) -> Self {
        self.filters.push(Box::new(move |m| predicate(&m.returns)));
        self
    }

    /// Applies a custom filter predicate.
    #[must_use]
    pub fn filter(mut self, f: impl Fn(&MethodDescriptor) -> bool + 'a) -> Self {
        self.filters.push(Box::new(f));
        self
    }

    /// Returns all matching methods.
    #[must_use]
    pub fn find_all(&self) -> Vec<MethodRc> {
        self.iter().collect()
    }

    /// Returns the first matching method, short-circuiting iteration.
    #[must_use]
    pub fn find_first(&self) -> Option<MethodRc> {
        self.iter().next()
    }

    /// Returns the count of matching methods.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if any method matches (short-circuits).
    #[must_use]
    pub fn exists(&self) -> bool {
        self.iter().next().is_some()
    }

    /// Returns a lazy iterator over matching methods.
    pub fn iter(&self) -> impl Iterator<Item = MethodRc> + '_ {
        self.methods
            .iter()
            .filter(move |m| self.filters.iter().all(|f| f(m)))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodBuilder, TypeBuilder, TypeRc, TypeRegistry};

    fn sample() -> TypeRc {
        let registry = TypeRegistry::new();
        TypeBuilder::class("com.example", "Foo")
            .method("of", |m| {
                m.public()
                    .static_()
                    .param("x", TypeSig::int())
                    .returns(TypeSig::named("com.example.Foo"))
            })
            .method("hidden", |m| m.private().static_().returns(TypeSig::named("com.example.Foo")))
            .method("size", |m| m.public().returns(TypeSig::int()))
            .method("reset", MethodBuilder::public)
            .build(&registry)
            .unwrap()
    }

    #[test]
    fn test_query_static_non_private() {
        let foo = sample();
        let found = MethodQuery::new(&foo.methods)
            .non_private()
            .static_methods()
            .find_all();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "of");
    }

    #[test]
    fn test_query_instance_no_params() {
        let foo = sample();
        let query = MethodQuery::new(&foo.methods).instance().no_params();
        assert_eq!(query.count(), 2);
        assert!(query.exists());
    }

    #[test]
    fn test_query_returning() {
        let foo = sample();
        let non_void = MethodQuery::new(&foo.methods)
            .instance()
            .returning(|sig| !sig.is_void())
            .find_first()
            .unwrap();
        assert_eq!(non_void.name, "size");
    }

    #[test]
    fn test_query_param_count_and_name() {
        let foo = sample();
        assert_eq!(MethodQuery::new(&foo.methods).param_count(1).count(), 1);
        assert!(MethodQuery::new(&foo.methods).name("reset").exists());
        assert!(!MethodQuery::new(&foo.methods).name("missing").exists());
    }
}
