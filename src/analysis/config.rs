//! Configuration for the analysis.
//!
//! Every naming heuristic the analysis relies on (accessor prefixes, build verbs,
//! platform namespaces, universal object methods) is policy, not law: the values
//! observed in the Java ecosystem are the defaults and can be replaced per session.

use crate::model::{TypeDescriptor, TypeSig, TypeSource};

/// An accessor naming convention, e.g. `getName()` or `isEnabled()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanConvention {
    /// Prefix in front of the logical property name.
    pub prefix: String,

    /// Only accessors returning a boolean follow this convention.
    pub boolean_only: bool,
}

impl BeanConvention {
    /// Creates a convention applying to accessors of any return type.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            boolean_only: false,
        }
    }

    /// Creates a convention restricted to boolean accessors.
    pub fn boolean(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            boolean_only: true,
        }
    }

    /// Strips this convention's prefix from an accessor name.
    ///
    /// Returns `None` when the accessor does not follow the convention: wrong
    /// prefix, wrong return type, fewer than `min_len` characters left after the
    /// prefix, or a remainder that does not start with an uppercase letter.
    ///
    /// # Arguments
    ///
    /// * `name` - Accessor name as declared
    /// * `returns` - Declared return type of the accessor
    /// * `min_len` - Minimum number of characters after the prefix
    #[must_use]
    pub fn strip(&self, name: &str, returns: &TypeSig, min_len: usize) -> Option<String> {
        if self.boolean_only && !returns.is_boolean() {
            return None;
        }

        let rest = name.strip_prefix(self.prefix.as_str())?;
        if rest.chars().count() < min_len.max(1) {
            return None;
        }

        let mut chars = rest.chars();
        let first = chars.next()?;
        if !first.is_uppercase() {
            return None;
        }

        let mut stripped: String = first.to_lowercase().collect();
        stripped.push_str(chars.as_str());
        Some(stripped)
    }
}

/// How [`crate::analysis::Diagnostics`] reacts to a reported problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Fail on the first reported diagnostic.
    FailFast,

    /// Collect every diagnostic and fail once at the end.
    #[default]
    Batch,
}

/// Configuration for an [`crate::analysis::AnalysisSession`].
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Accessor naming conventions, tried in order (default: `is` for booleans, `get`).
    pub bean_conventions: Vec<BeanConvention>,

    /// Characters required after an accessor prefix (default: 1).
    pub min_stripped_len: usize,

    /// Name prefixes marking a conventional build method (default: `build`, `create`).
    pub build_verbs: Vec<String>,

    /// Namespaces of the base/platform library (default: `java.`, `javax.`, `kotlin.`).
    pub platform_prefixes: Vec<String>,

    /// Universal object methods that are never accessors.
    pub excluded_accessors: Vec<String>,

    /// Annotation selecting one creator among several candidates.
    pub creator_marker: Option<String>,

    /// Fail-fast or batch reporting (default: batch).
    pub report_mode: ReportMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bean_conventions: vec![BeanConvention::boolean("is"), BeanConvention::new("get")],
            min_stripped_len: 1,
            build_verbs: vec!["build".to_string(), "create".to_string()],
            platform_prefixes: vec![
                "java.".to_string(),
                "javax.".to_string(),
                "kotlin.".to_string(),
            ],
            excluded_accessors: ["hashCode", "toString", "clone", "getClass", "finalize"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            creator_marker: None,
            report_mode: ReportMode::Batch,
        }
    }
}

impl AnalysisConfig {
    /// Creates a configuration with the default conventions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the accessor naming conventions.
    #[must_use]
    pub fn with_bean_conventions(mut self, conventions: Vec<BeanConvention>) -> Self {
        self.bean_conventions = conventions;
        self
    }

    /// Sets the minimum number of characters after an accessor prefix.
    #[must_use]
    pub fn with_min_stripped_len(mut self, len: usize) -> Self {
        self.min_stripped_len = len;
        self
    }

    /// Replaces the conventional build verbs.
    #[must_use]
    pub fn with_build_verbs<S: Into<String>>(mut self, verbs: impl IntoIterator<Item = S>) -> Self {
        self.build_verbs = verbs.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the platform namespaces.
    #[must_use]
    pub fn with_platform_prefixes<S: Into<String>>(
        mut self,
        prefixes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.platform_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the list of universal object methods excluded from accessors.
    #[must_use]
    pub fn with_excluded_accessors<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.excluded_accessors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the annotation that selects a creator among several candidates.
    ///
    /// # Arguments
    ///
    /// * `annotation` - Full name of the marker annotation type
    #[must_use]
    pub fn with_creator_marker(mut self, annotation: impl Into<String>) -> Self {
        self.creator_marker = Some(annotation.into());
        self
    }

    /// Sets the report mode.
    #[must_use]
    pub fn with_report_mode(mut self, mode: ReportMode) -> Self {
        self.report_mode = mode;
        self
    }

    /// Returns true if a full type name belongs to the platform library
    pub fn is_platform_name(&self, fullname: &str) -> bool {
        self.platform_prefixes
            .iter()
            .any(|prefix| fullname.starts_with(prefix.as_str()))
    }

    /// Returns true if a type belongs to the platform library
    pub fn is_platform(&self, ty: &TypeDescriptor) -> bool {
        ty.source == TypeSource::Platform || self.is_platform_name(&ty.fullname())
    }

    /// Returns true if a declared type names a platform type
    pub fn is_platform_sig(&self, sig: &TypeSig) -> bool {
        sig.fullname().is_some_and(|name| self.is_platform_name(name))
    }

    /// Returns true if a method name starts with a conventional build verb
    pub fn is_build_verb(&self, name: &str) -> bool {
        self.build_verbs
            .iter()
            .any(|verb| name.starts_with(verb.as_str()))
    }

    /// Returns true if the method name is a universal object method
    pub fn is_excluded_accessor(&self, name: &str) -> bool {
        self.excluded_accessors.iter().any(|n| n == name)
    }
}
