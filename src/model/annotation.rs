//! Annotation instances attached to types and members.
//!
//! Each attached annotation is a distinct instance carrying its own [`Token`].
//! Two annotations of the same type on different members are different
//! instances; the same instance attached to two members is the same `Arc`
//! (and the same token). Property unification relies on this identity to spot
//! annotations that were declared twice for one logical property.

use std::fmt;
use std::sync::Arc;

use crate::model::token::Token;

/// A reference-counted pointer to an `Annotation`
pub type AnnotationRc = Arc<Annotation>;
/// The annotations attached to one declaration, in declaration order
pub type AnnotationList = Vec<AnnotationRc>;

/// A single annotation argument value
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationArgument {
    /// Boolean value
    Bool(bool),
    /// Integral value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Type literal, by full name
    Type(String),
    /// Enum constant (enum type full name, constant name)
    Enum(String, String),
    /// Array of values
    Array(Vec<AnnotationArgument>),
}

/// One attached annotation instance
#[derive(Debug, Clone)]
pub struct Annotation {
    /// Identity of this instance
    pub token: Token,
    /// Full name of the annotation type
    pub type_name: String,
    /// Named arguments, in declaration order
    pub args: Vec<(String, AnnotationArgument)>,
}

impl Annotation {
    /// Create a new annotation instance without arguments
    pub fn new(token: Token, type_name: impl Into<String>) -> Self {
        Annotation {
            token,
            type_name: type_name.into(),
            args: Vec::new(),
        }
    }

    /// Add a named argument
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: AnnotationArgument) -> Self {
        self.args.push((name.into(), value));
        self
    }

    /// Look up a named argument
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&AnnotationArgument> {
        self.args
            .iter()
            .find(|(arg_name, _)| arg_name == name)
            .map(|(_, value)| value)
    }

    /// Returns true if this instance is of the given annotation type
    #[must_use]
    pub fn is(&self, type_name: &str) -> bool {
        self.type_name == type_name
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for Annotation {}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.type_name)?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            for (i, (name, value)) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{name} = {value:?}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Returns true if any annotation in `list` is of type `type_name`
#[must_use]
pub fn has_annotation(list: &[AnnotationRc], type_name: &str) -> bool {
    list.iter().any(|annotation| annotation.is(type_name))
}
