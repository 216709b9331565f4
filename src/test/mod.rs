//! Shared fixtures for unit tests.
//!
//! Each helper declares a small, realistic value type into the given registry and
//! returns its descriptor. Names live under `com.example`.

use crate::model::{TypeBuilder, TypeRc, TypeRegistry, TypeSig, STRING_TYPE};

/// Namespace of every fixture type
pub const FIXTURE_NAMESPACE: &str = "com.example";

/// Full name of a fixture type
pub fn fixture_name(name: &str) -> String {
    format!("{FIXTURE_NAMESPACE}.{name}")
}

/// `Person` with a static `builder()` factory, a nested `Builder` with setters for
/// `name` and `age`, private fields and bean getters.
pub fn person_with_builder(registry: &TypeRegistry) -> TypeRc {
    let builder_sig = TypeSig::named(fixture_name("Person.Builder"));
    let setter_sig = builder_sig.clone();

    TypeBuilder::class(FIXTURE_NAMESPACE, "Person")
        .public()
        .final_()
        .field("name", TypeSig::named(STRING_TYPE), |f| f.private().final_())
        .field("age", TypeSig::int(), |f| f.private().final_())
        .constructor(|c| c.private())
        .method("builder", |m| m.public().static_().returns(builder_sig))
        .method("getName", |m| m.public().returns(TypeSig::named(STRING_TYPE)))
        .method("getAge", |m| m.public().returns(TypeSig::int()))
        .nested(
            TypeBuilder::class("", "Builder")
                .public()
                .static_()
                .constructor(|c| c.private())
                .method("name", |m| {
                    m.public()
                        .param("name", TypeSig::named(STRING_TYPE))
                        .returns(setter_sig.clone())
                })
                .method("age", |m| {
                    m.public()
                        .param("age", TypeSig::int())
                        .returns(setter_sig.clone())
                })
                .method("build", |m| {
                    m.public().returns(TypeSig::named(fixture_name("Person")))
                }),
        )
        .build(registry)
        .unwrap()
}

/// `Point` with one public constructor taking `x` and `y`, private fields and
/// un-prefixed accessors.
pub fn point(registry: &TypeRegistry) -> TypeRc {
    TypeBuilder::class(FIXTURE_NAMESPACE, "Point")
        .public()
        .final_()
        .field("x", TypeSig::int(), |f| f.private().final_())
        .field("y", TypeSig::int(), |f| f.private().final_())
        .constructor(|c| {
            c.public()
                .param("x", TypeSig::int())
                .param("y", TypeSig::int())
        })
        .method("x", |m| m.public().returns(TypeSig::int()))
        .method("y", |m| m.public().returns(TypeSig::int()))
        .build(registry)
        .unwrap()
}

/// An empty class with an implicit public no-argument constructor.
pub fn empty(registry: &TypeRegistry, name: &str) -> TypeRc {
    TypeBuilder::class(FIXTURE_NAMESPACE, name)
        .public()
        .constructor(|c| c.public())
        .build(registry)
        .unwrap()
}
