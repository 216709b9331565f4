//! Logical properties of a value type.
//!
//! A [`Property`] wraps exactly one underlying declaration: a field, an accessor
//! method, a parameter of the construction element, or the parameter of a builder
//! setter. Its identity is the identity of that declaration ([`PropertyKey`]), so
//! two properties with the same name but different origins are never equal.

use std::fmt;
use std::hash::{Hash, Hasher};

use strum::{EnumCount, EnumIter};

use crate::model::{AnnotationList, Element, FieldRc, MemberKey, MethodRc, TypeSig};

static VOID: TypeSig = TypeSig::Void;

/// The four origins of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum PropertyKind {
    /// A readable field
    Field,
    /// An accessor method
    Getter,
    /// A parameter of the construction element
    ConstructorParam,
    /// The parameter of a single-argument builder setter
    BuilderParam,
}

/// Explicit identity of a property
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyKey {
    /// Origin
    pub kind: PropertyKind,
    /// Identity of the underlying declaration
    pub member: MemberKey,
    /// Parameter position, for parameter properties
    pub index: Option<usize>,
}

/// A named, typed attribute of a value type.
#[derive(Debug, Clone)]
pub enum Property {
    /// A readable field
    Field {
        /// The field
        field: FieldRc,
        /// Merged annotations of this logical property
        annotations: AnnotationList,
    },
    /// An accessor method
    Getter {
        /// The accessor
        method: MethodRc,
        /// Logical name, with the accessor prefix stripped if the set follows a
        /// naming convention
        name: String,
        /// Merged annotations of this logical property
        annotations: AnnotationList,
    },
    /// A parameter of the construction element
    ConstructorParam {
        /// The constructor or factory
        element: MethodRc,
        /// Position in its parameter list
        index: usize,
        /// Merged annotations of this logical property
        annotations: AnnotationList,
    },
    /// The parameter of a builder setter; named after the setter
    BuilderParam {
        /// The setter
        setter: MethodRc,
        /// Merged annotations of this logical property
        annotations: AnnotationList,
    },
}

impl Property {
    /// A field property carrying the field's own annotations
    pub fn field(field: FieldRc) -> Self {
        let annotations = field.annotations.clone();
        Property::Field { field, annotations }
    }

    /// A getter property named `name`
    pub fn getter(method: MethodRc, name: String) -> Self {
        let annotations = method.annotations.clone();
        Property::Getter {
            method,
            name,
            annotations,
        }
    }

    /// The `index`-th parameter of a constructor or factory.
    ///
    /// The caller guarantees `index` is in range.
    pub fn constructor_param(element: MethodRc, index: usize) -> Self {
        let annotations = element
            .params
            .get(index)
            .map(|p| p.annotations.clone())
            .unwrap_or_default();
        Property::ConstructorParam {
            element,
            index,
            annotations,
        }
    }

    /// The parameter of a single-argument setter
    pub fn builder_param(setter: MethodRc) -> Self {
        let annotations = setter
            .params
            .first()
            .map(|p| p.annotations.clone())
            .unwrap_or_default();
        Property::BuilderParam {
            setter,
            annotations,
        }
    }

    /// Origin of this property
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self {
            Property::Field { .. } => PropertyKind::Field,
            Property::Getter { .. } => PropertyKind::Getter,
            Property::ConstructorParam { .. } => PropertyKind::ConstructorParam,
            Property::BuilderParam { .. } => PropertyKind::BuilderParam,
        }
    }

    /// Logical, normalized name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Property::Field { field, .. } => &field.name,
            Property::Getter { name, .. } => name,
            Property::ConstructorParam { element, index, .. } => element
                .params
                .get(*index)
                .map_or("", |p| p.name.as_str()),
            Property::BuilderParam { setter, .. } => &setter.name,
        }
    }

    /// Name of the underlying declaration, as written
    #[must_use]
    pub fn callable_name(&self) -> &str {
        match self {
            Property::Getter { method, .. } => &method.name,
            Property::Field { .. }
            | Property::ConstructorParam { .. }
            | Property::BuilderParam { .. } => self.name(),
        }
    }

    /// Declared type
    #[must_use]
    pub fn declared_type(&self) -> &TypeSig {
        match self {
            Property::Field { field, .. } => &field.signature,
            Property::Getter { method, .. } => &method.returns,
            Property::ConstructorParam { element, index, .. } => element
                .params
                .get(*index)
                .map_or(&VOID, |p| &p.signature),
            Property::BuilderParam { setter, .. } => {
                setter.params.first().map_or(&VOID, |p| &p.signature)
            }
        }
    }

    /// Merged annotations of this logical property
    #[must_use]
    pub fn annotations(&self) -> &AnnotationList {
        match self {
            Property::Field { annotations, .. }
            | Property::Getter { annotations, .. }
            | Property::ConstructorParam { annotations, .. }
            | Property::BuilderParam { annotations, .. } => annotations,
        }
    }

    pub(crate) fn set_annotations(&mut self, merged: AnnotationList) {
        match self {
            Property::Field { annotations, .. }
            | Property::Getter { annotations, .. }
            | Property::ConstructorParam { annotations, .. }
            | Property::BuilderParam { annotations, .. } => *annotations = merged,
        }
    }

    /// The declaration this property wraps
    #[must_use]
    pub fn element(&self) -> Element {
        match self {
            Property::Field { field, .. } => Element::Field(field.clone()),
            Property::Getter { method, .. } => Element::Method(method.clone()),
            Property::ConstructorParam { element, .. } => Element::from_method(element),
            Property::BuilderParam { setter, .. } => Element::Method(setter.clone()),
        }
    }

    /// Returns true for constructor and builder parameters
    #[must_use]
    pub fn is_param(&self) -> bool {
        matches!(
            self,
            Property::ConstructorParam { .. } | Property::BuilderParam { .. }
        )
    }

    /// Identity of this property
    #[must_use]
    pub fn key(&self) -> PropertyKey {
        let (member, index) = match self {
            Property::Field { field, .. } => (field.key(), None),
            Property::Getter { method, .. } => (method.key(), None),
            Property::ConstructorParam { element, index, .. } => (element.key(), Some(*index)),
            Property::BuilderParam { setter, .. } => (setter.key(), Some(0)),
        };

        PropertyKey {
            kind: self.kind(),
            member,
            index,
        }
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Property {}

impl Hash for Property {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.declared_type())
    }
}

/// The unified properties of a value type.
///
/// [`Properties::all`] is the canonical, deduplicated sequence: every parameter in
/// order, then the fields not represented by a parameter, then the getters not
/// represented by either. The sub-lists hold every surviving property of their
/// kind, including those shadowed in `all` by a same-named parameter, so callers
/// can still locate the accessor that reads a parameter back.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    pub(crate) all: Vec<Property>,
    pub(crate) constructor_params: Vec<Property>,
    pub(crate) builder_params: Vec<Property>,
    pub(crate) fields: Vec<Property>,
    pub(crate) getters: Vec<Property>,
}

impl Properties {
    /// The canonical ordered sequence
    #[must_use]
    pub fn all(&self) -> &[Property] {
        &self.all
    }

    /// Constructor parameters followed by builder parameters
    #[must_use]
    pub fn params(&self) -> Vec<&Property> {
        self.constructor_params
            .iter()
            .chain(self.builder_params.iter())
            .collect()
    }

    /// Parameters of the construction element
    #[must_use]
    pub fn constructor_params(&self) -> &[Property] {
        &self.constructor_params
    }

    /// Parameters of builder setters
    #[must_use]
    pub fn builder_params(&self) -> &[Property] {
        &self.builder_params
    }

    /// Readable fields
    #[must_use]
    pub fn fields(&self) -> &[Property] {
        &self.fields
    }

    /// Accessor methods
    #[must_use]
    pub fn getters(&self) -> &[Property] {
        &self.getters
    }

    /// Finds a property of the canonical sequence by logical name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.all.iter().find(|p| p.name() == name)
    }

    /// Logical names of the canonical sequence, in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.all.iter().map(Property::name).collect()
    }

    /// Number of properties in the canonical sequence
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns true if the type has no property
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Iterates the canonical sequence
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.all.iter()
    }
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.all.len() == other.all.len()
            && self.all.iter().zip(other.all.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for Properties {}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.all.iter()
    }
}
