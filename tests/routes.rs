//! Integration tests for construction route resolution.
//!
//! Each test declares a small value type into a fresh registry and checks which
//! constructor, factory or builder the session settles on, or which diagnostics it
//! reports when it cannot settle on one.

use valuescope::prelude::*;

const NS: &str = "com.example";

fn sig(name: &str) -> TypeSig {
    TypeSig::named(format!("{NS}.{name}"))
}

/// A public no-argument constructor is a valid route on its own.
#[test]
fn test_zero_arg_constructor_route() -> Result<()> {
    let registry = TypeRegistry::new();
    let marker = TypeBuilder::class(NS, "Marker")
        .public()
        .constructor(|c| c.public())
        .build(&registry)?;

    let session = AnalysisSession::new(&registry);
    let analysis = session.analyze(&marker)?;

    assert_eq!(analysis.route.kind(), RouteKind::Constructor);
    assert!(analysis.route.params().is_empty());
    assert!(analysis.properties.is_empty());
    Ok(())
}

/// The no-argument fallback only wins when nothing richer exists.
#[test]
fn test_zero_arg_constructor_yields_to_factory() -> Result<()> {
    let registry = TypeRegistry::new();
    let money = TypeBuilder::class(NS, "Money")
        .public()
        .constructor(|c| c.public())
        .method("of", |m| {
            m.public()
                .static_()
                .param("cents", TypeSig::long())
                .returns(sig("Money"))
        })
        .method("cents", |m| m.public().returns(TypeSig::long()))
        .build(&registry)?;

    let session = AnalysisSession::new(&registry);
    let analysis = session.analyze(&money)?;

    assert_eq!(analysis.route.kind(), RouteKind::Factory);
    assert_eq!(analysis.route.element().name, "of");
    assert_eq!(analysis.properties.names(), vec!["cents"]);
    Ok(())
}

/// A constructor and a factory of equal standing are ambiguous, and both are
/// reported in one batch.
#[test]
fn test_constructor_and_factory_are_ambiguous() -> Result<()> {
    let registry = TypeRegistry::new();
    let id = TypeBuilder::class(NS, "Id")
        .public()
        .constructor(|c| c.public().param("value", TypeSig::long()))
        .method("of", |m| {
            m.public()
                .static_()
                .param("value", TypeSig::long())
                .returns(sig("Id"))
        })
        .build(&registry)?;

    let session = AnalysisSession::new(&registry);
    let error = session.analyze(&id).unwrap_err();
    let diagnostics = error.diagnostics();

    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::AmbiguousCreator));
    assert!(diagnostics
        .iter()
        .any(|d| matches!(d.element, Some(Element::Constructor(_)))));
    assert!(diagnostics
        .iter()
        .any(|d| matches!(&d.element, Some(Element::Method(m)) if m.name == "of")));
    Ok(())
}

/// A creator marker annotation breaks the tie.
#[test]
fn test_creator_marker_selects_candidate() -> Result<()> {
    let registry = TypeRegistry::new();
    let creator = registry.annotation("com.example.Creator");
    let id = TypeBuilder::class(NS, "Id")
        .public()
        .constructor(|c| c.public().param("value", TypeSig::long()))
        .method("of", |m| {
            m.public()
                .static_()
                .param("value", TypeSig::long())
                .returns(sig("Id"))
                .annotated(creator)
        })
        .build(&registry)?;

    let config = AnalysisConfig::default().with_creator_marker("com.example.Creator");
    let session = AnalysisSession::with_config(&registry, config);
    let route = session.resolve_type(&id)?;

    assert_eq!(route.kind(), RouteKind::Factory);
    Ok(())
}

/// A type without any usable creator is reported against the type itself.
#[test]
fn test_no_creator_found() -> Result<()> {
    let registry = TypeRegistry::new();
    let hidden = TypeBuilder::class(NS, "Hidden")
        .public()
        .constructor(|c| c.private().param("value", TypeSig::int()))
        .build(&registry)?;

    let session = AnalysisSession::new(&registry);
    let error = session.resolve_type(&hidden).unwrap_err();

    assert_eq!(error.diagnostics().len(), 1);
    assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::NoCreatorFound);
    Ok(())
}

/// A builder with exactly one possible build method uses it whatever its name.
#[test]
fn test_single_build_method_with_any_name() -> Result<()> {
    let registry = TypeRegistry::new();
    let order = TypeBuilder::class(NS, "Order")
        .public()
        .constructor(|c| c.private())
        .method("getQuantity", |m| m.public().returns(TypeSig::int()))
        .nested(
            TypeBuilder::class("", "Builder")
                .public()
                .static_()
                .constructor(|c| c.public())
                .method("quantity", |m| {
                    m.public()
                        .param("quantity", TypeSig::int())
                        .returns(sig("Order.Builder"))
                })
                .method("assemble", |m| m.public().returns(sig("Order"))),
        )
        .build(&registry)?;

    let session = AnalysisSession::new(&registry);
    let analysis = session.analyze(&order)?;

    assert_eq!(analysis.route.kind(), RouteKind::BuilderConstructor);
    assert_eq!(analysis.route.build_method().map(|m| m.name.as_str()), Some("assemble"));
    assert_eq!(analysis.properties.names(), vec!["quantity"]);
    assert_eq!(
        analysis.properties.get("quantity").map(Property::kind),
        Some(PropertyKind::BuilderParam)
    );
    Ok(())
}

fn order_with_build_methods(registry: &TypeRegistry, names: &[&str]) -> Result<TypeRc> {
    TypeBuilder::class(NS, "Receipt")
        .public()
        .build(registry)?;

    let mut builder = TypeBuilder::class("", "Builder")
        .public()
        .static_()
        .constructor(|c| c.public());
    for (index, name) in names.iter().enumerate() {
        let returns = if index == 0 { sig("Order") } else { sig("Receipt") };
        builder = builder.method(name, |m| m.public().returns(returns));
    }

    TypeBuilder::class(NS, "Order")
        .public()
        .constructor(|c| c.private())
        .nested(builder)
        .build(registry)
}

/// Among several possible build methods, the only conventionally named one wins.
#[test]
fn test_build_verb_breaks_tie() -> Result<()> {
    let registry = TypeRegistry::new();
    let order = order_with_build_methods(&registry, &["build", "receipt"])?;

    let session = AnalysisSession::new(&registry);
    let route = session.resolve_type(&order)?;

    assert_eq!(route.build_method().map(|m| m.name.as_str()), Some("build"));
    Ok(())
}

/// Two conventional names leave the builder unresolved.
#[test]
fn test_two_build_verbs_fail() -> Result<()> {
    let registry = TypeRegistry::new();
    let order = order_with_build_methods(&registry, &["build", "createReceipt"])?;

    let session = AnalysisSession::new(&registry);
    let error = session.resolve_type(&order).unwrap_err();

    assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::NoCreatorFound);
    Ok(())
}

/// No conventional name among several candidates leaves the builder unresolved.
#[test]
fn test_no_build_verb_fails() -> Result<()> {
    let registry = TypeRegistry::new();
    let order = order_with_build_methods(&registry, &["finish", "receipt"])?;

    let session = AnalysisSession::new(&registry);
    let builder = registry
        .type_by_name("com.example.Order.Builder")
        .ok_or_else(|| Error::TypeNotFound("com.example.Order.Builder".to_string()))?;

    assert!(session.resolve_type(&order).is_err());
    let error = session
        .resolve_route(&Element::Type(builder), true)
        .unwrap_err();
    assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::NoBuildMethodFound);
    Ok(())
}

/// Starting from a known static method that returns a builder.
#[test]
fn test_route_for_builder_factory() -> Result<()> {
    let registry = TypeRegistry::new();
    let order = order_with_build_methods(&registry, &["build"])?;
    let factory = TypeBuilder::class(NS, "Orders")
        .public()
        .method("newOrder", |m| {
            m.public().static_().returns(sig("Order.Builder"))
        })
        .build(&registry)?;

    let session = AnalysisSession::new(&registry);
    let route = session.route_for_builder_factory(&factory.methods[0])?;

    assert_eq!(route.kind(), RouteKind::BuilderFactory);
    assert_eq!(route.target().fullname(), order.fullname());
    assert_eq!(route.to_string(), "builder factory com.example.Orders.newOrder() -> build()");
    Ok(())
}

/// A static method producing a primitive or nothing is not a factory.
#[test]
fn test_route_for_non_factory_static_method() -> Result<()> {
    let registry = TypeRegistry::new();
    let counter = TypeBuilder::class(NS, "Counter")
        .public()
        .constructor(|c| c.public())
        .method("count", |m| m.public().static_().returns(TypeSig::int()))
        .method("reset", |m| m.public().static_())
        .build(&registry)?;

    let session = AnalysisSession::new(&registry);
    for method in &counter.methods {
        let error = session.route_for_factory(method).unwrap_err();
        assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::InvalidElementKind);
        assert!(error.diagnostics()[0].element.is_some());
    }

    let error = session.route_for_builder_factory(&counter.methods[0]).unwrap_err();
    assert_eq!(error.diagnostics()[0].kind, DiagnosticKind::InvalidElementKind);
    Ok(())
}

/// A builder reaching the same generator interface twice builds through the
/// most specific override.
#[test]
fn test_builder_diamond_selects_specific_build_method() -> Result<()> {
    let registry = TypeRegistry::new();
    TypeBuilder::class(NS, "Shape").public().abstract_().build(&registry)?;
    TypeBuilder::interface(NS, "Gen")
        .public()
        .method("build", |m| m.public().abstract_().returns(sig("Shape")))
        .build(&registry)?;
    TypeBuilder::interface(NS, "SquareGen")
        .public()
        .implements(sig("Gen"))
        .method("build", |m| m.public().abstract_().returns(sig("Square")))
        .build(&registry)?;
    TypeBuilder::class(NS, "AbstractGen")
        .public()
        .abstract_()
        .implements(sig("Gen"))
        .build(&registry)?;
    let square = TypeBuilder::class(NS, "Square")
        .public()
        .extends(sig("Shape"))
        .constructor(|c| c.private())
        .nested(
            TypeBuilder::class("", "Builder")
                .public()
                .static_()
                .extends(sig("AbstractGen"))
                .implements(sig("SquareGen"))
                .constructor(|c| c.public()),
        )
        .build(&registry)?;

    let route = AnalysisSession::new(&registry).resolve_type(&square)?;
    let build_method = route.build_method();

    assert_eq!(route.kind(), RouteKind::BuilderConstructor);
    assert_eq!(route.builder().map(|b| b.fullname()), Some(format!("{NS}.Square.Builder")));
    assert_eq!(build_method.map(|m| m.owner.as_str()), Some("com.example.SquareGen"));
    assert_eq!(build_method.map(|m| &m.returns), Some(&sig("Square")));
    Ok(())
}

/// Resolution is deterministic: the same input yields equal routes, fresh or cached.
#[test]
fn test_resolution_is_deterministic() -> Result<()> {
    let registry = TypeRegistry::new();
    let order = order_with_build_methods(&registry, &["build", "receipt"])?;

    let first = AnalysisSession::new(&registry).analyze(&order)?;
    let session = AnalysisSession::new(&registry);
    let second = session.analyze(&order)?;
    let cached = session.analyze(&order)?;

    assert_eq!(first, second);
    assert_eq!(second, cached);
    Ok(())
}
