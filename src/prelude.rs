//! # valuescope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the valuescope library. Import this module to get quick access to the essential
//! types for declaring a type model and analyzing it.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all valuescope operations
pub use crate::Error;

/// The result type used throughout valuescope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Memoizing analysis entry point and its combined result
pub use crate::analysis::{Analysis, AnalysisSession};

/// Analysis configuration
pub use crate::analysis::{AnalysisConfig, BeanConvention, ReportMode};

// ================================================================================================
// Type Model
// ================================================================================================

/// The provider seam and the in-memory implementation
pub use crate::model::{TypeModel, TypeRegistry, OBJECT_TYPE, STRING_TYPE};

/// Declaring types by hand
pub use crate::model::{FieldBuilder, MethodBuilder, TypeBuilder};

/// Descriptors handed out by a model
pub use crate::model::{
    Annotation, AnnotationList, AnnotationRc, Element, FieldDescriptor, FieldRc, Members,
    MethodDescriptor, MethodRc, ParamDescriptor, Token, TypeDescriptor, TypeRc, TypeSig,
    TypeSource,
};

/// Annotation lookup by type name
pub use crate::model::has_annotation;

// ================================================================================================
// Analysis Results
// ================================================================================================

/// Construction routes
pub use crate::analysis::{ConstructionRoute, RouteKind};

/// Unified properties
pub use crate::analysis::{Properties, Property, PropertyKind};

// ================================================================================================
// Diagnostics
// ================================================================================================

/// Diagnostics and reporting
pub use crate::analysis::{Diagnostic, DiagnosticKind, ErrorReporter, LogReporter};

/// Creator selection
pub use crate::analysis::{MarkerSelection, Selection, SelectionPolicy};
