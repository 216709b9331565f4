// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # valuescope
//!
//! Structural analysis of value types for code generators.
//!
//! Given the reflected declaration of a type meant to be treated as immutable data,
//! `valuescope` derives the two artifacts a generator needs:
//!
//! - the unique **construction route**: a constructor, a static factory, or a
//!   builder reached through either, together with the builder's build method;
//! - the canonical **properties**: one deduplicated, ordered list merged from the
//!   route's parameters, the type's fields, its accessor methods and its builder
//!   setters, with annotations merged across every declaration of a property.
//!
//! The crate never parses source text. Declarations come from a
//! [`model::TypeModel`], either a host-provided implementation or the in-memory
//! [`model::TypeRegistry`].
//!
//! ## Features
//!
//! - **Disambiguation** - Constructors, factories and nested builders are enumerated
//!   and reduced to exactly one route, or every candidate is reported at once
//! - **Inheritance aware** - Overrides, shadowed fields and platform members are
//!   resolved across the whole supertype graph
//! - **Configurable conventions** - Accessor prefixes, build verbs and platform
//!   namespaces are policy, see [`analysis::AnalysisConfig`]
//! - **Concurrent** - Sessions memoize in lock-free maps and analyze many types in
//!   parallel
//!
//! ## Quick Start
//!
//! ```rust
//! use valuescope::prelude::*;
//!
//! let registry = TypeRegistry::new();
//! let user = TypeBuilder::class("com.example", "User")
//!     .public()
//!     .field("name", TypeSig::named(STRING_TYPE), |f| f.private().final_())
//!     .field("admin", TypeSig::boolean(), |f| f.private().final_())
//!     .method("builder", |m| {
//!         m.public().static_().returns(TypeSig::named("com.example.User.Builder"))
//!     })
//!     .method("getName", |m| m.public().returns(TypeSig::named(STRING_TYPE)))
//!     .method("isAdmin", |m| m.public().returns(TypeSig::boolean()))
//!     .nested(
//!         TypeBuilder::class("", "Builder")
//!             .public()
//!             .static_()
//!             .constructor(|c| c.private())
//!             .method("name", |m| {
//!                 m.public()
//!                     .param("name", TypeSig::named(STRING_TYPE))
//!                     .returns(TypeSig::named("com.example.User.Builder"))
//!             })
//!             .method("build", |m| m.public().returns(TypeSig::named("com.example.User"))),
//!     )
//!     .build(&registry)?;
//!
//! let session = AnalysisSession::new(&registry);
//! let analysis = session.analyze(&user)?;
//!
//! assert_eq!(analysis.route.kind(), RouteKind::BuilderFactory);
//! assert_eq!(analysis.properties.names(), vec!["name", "admin"]);
//! # Ok::<(), valuescope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`model`] - The type model: descriptors, the [`model::TypeModel`] trait and the
//!   in-memory registry
//! - [`analysis`] - Route resolution, property collection and unification
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Analysis failures are never a single opaque error: [`Error::Analysis`] carries
//! every diagnostic of the failed type, each pointing at the offending
//! declaration, so an ambiguity lists all candidates in one pass. Resolution is
//! all-or-nothing per type, and one type failing never affects another.

#[macro_use]
pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// ```rust
/// use valuescope::prelude::*;
///
/// let registry = TypeRegistry::new();
/// let session = AnalysisSession::new(&registry);
/// assert_eq!(session.cached_routes(), 0);
/// ```
pub mod prelude;

/// The structural type model consumed by the analysis.
///
/// See [`model::TypeModel`] for the provider seam and [`model::TypeBuilder`] for
/// declaring types by hand.
pub mod model;

/// Construction route resolution and property unification.
///
/// Start with [`analysis::AnalysisSession`].
pub mod analysis;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use valuescope::{model::{TypeBuilder, TypeRc, TypeRegistry}, Result};
///
/// fn declare(registry: &TypeRegistry) -> Result<TypeRc> {
///     TypeBuilder::class("com.example", "Empty").build(registry)
/// }
/// # declare(&TypeRegistry::new()).unwrap();
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The error type of every fallible operation in this crate.
///
/// Model errors (unknown or duplicate types, inconsistent declarations, overly deep
/// hierarchies) and analysis failures carrying a batch of diagnostics.
pub use error::Error;

/// Entry point of the analysis, see [`analysis::AnalysisSession`].
pub use analysis::{Analysis, AnalysisSession};
