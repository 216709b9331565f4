use thiserror::Error;

use crate::analysis::{Diagnostic, ErrorReporter};

macro_rules! analysis_error {
    // Single diagnostic without an element
    ($kind:expr, $msg:expr) => {
        crate::Error::Analysis(vec![crate::analysis::Diagnostic::new($kind, $msg)])
    };

    // Single diagnostic pointing at an element
    ($kind:expr, $element:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::Analysis(vec![crate::analysis::Diagnostic::new($kind, format!($fmt, $($arg)*))
            .with_element($element)])
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Analysis Errors
/// - [`Error::Analysis`] - Route resolution or property unification failed; carries every
///   diagnostic collected for the type, so ambiguities list all candidates at once
///
/// ## Model Errors
/// - [`Error::TypeNotFound`] - A type could not be resolved through the model
/// - [`Error::TypeInsert`] - A type with the same full name is already registered
/// - [`Error::Builder`] - A type declaration is inconsistent
/// - [`Error::RecursionLimit`] - The inheritance walk exceeded the maximum depth
///
/// # Examples
///
/// ```rust
/// use valuescope::{analysis::AnalysisSession, model::{TypeBuilder, TypeRegistry}, Error};
///
/// let registry = TypeRegistry::new();
/// let empty = TypeBuilder::class("com.example", "Empty").build(&registry)?;
/// let session = AnalysisSession::new(&registry);
///
/// match session.resolve_type(&empty) {
///     Ok(route) => println!("resolved: {route}"),
///     Err(Error::Analysis(diagnostics)) => {
///         for diagnostic in &diagnostics {
///             eprintln!("{diagnostic}");
///         }
///     }
///     Err(e) => eprintln!("model error: {e}"),
/// }
/// # Ok::<(), valuescope::Error>(())
/// ```
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Resolution failed with one or more diagnostics.
    ///
    /// The list is never empty. Ambiguous creators contribute one entry per
    /// candidate, each pointing at the offending element.
    #[error("{}", render(.0))]
    Analysis(Vec<Diagnostic>),

    /// Failed to find a type in the model.
    ///
    /// The associated value is the full name that could not be resolved.
    #[error("Failed to find type - {0}")]
    TypeNotFound(String),

    /// Failed to insert a new type into the registry.
    ///
    /// The associated value is the full name that is already taken.
    #[error("Failed to insert new type into TypeRegistry - {0}")]
    TypeInsert(String),

    /// A type declaration handed to the builder is inconsistent.
    #[error("Invalid type declaration - {0}")]
    Builder(String),

    /// Recursion limit reached.
    ///
    /// Inheritance walks are bounded in depth; a deeper hierarchy aborts the
    /// analysis of that type. Cyclic declarations are cut short by the walk and
    /// never raise this. The associated value is the limit.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}

fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl Error {
    /// The diagnostics carried by an analysis failure; empty for model errors
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Analysis(diagnostics) => diagnostics,
            _ => &[],
        }
    }

    /// Replay this error to a reporter, one call per diagnostic.
    ///
    /// Model errors are reported as a single message without an element.
    pub fn report_to(&self, reporter: &mut dyn ErrorReporter) {
        match self {
            Error::Analysis(diagnostics) => {
                for diagnostic in diagnostics {
                    reporter.report(&diagnostic.message, diagnostic.element.as_ref());
                }
            }
            other => reporter.report(&other.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DiagnosticKind;
    use crate::model::Element;

    struct Collect(Vec<(String, bool)>);

    impl ErrorReporter for Collect {
        fn report(&mut self, message: &str, element: Option<&Element>) {
            self.0.push((message.to_string(), element.is_some()));
        }
    }

    #[test]
    fn test_error_display_lists_every_diagnostic() {
        let error = Error::Analysis(vec![
            Diagnostic::new(DiagnosticKind::AmbiguousCreator, "first"),
            Diagnostic::new(DiagnosticKind::AmbiguousCreator, "second"),
        ]);
        let rendered = error.to_string();
        assert!(rendered.contains("first"));
        assert!(rendered.contains("second"));
        assert_eq!(rendered.lines().count(), 2);
        assert_eq!(error.diagnostics().len(), 2);
    }

    #[test]
    fn test_error_report_to() {
        let mut reporter = Collect(Vec::new());
        analysis_error!(DiagnosticKind::NoCreatorFound, "nothing").report_to(&mut reporter);
        Error::TypeNotFound("com.example.Missing".to_string()).report_to(&mut reporter);

        assert_eq!(reporter.0.len(), 2);
        assert_eq!(reporter.0[0], ("nothing".to_string(), false));
        assert!(reporter.0[1].0.contains("com.example.Missing"));
    }

    #[test]
    fn test_model_errors_have_no_diagnostics() {
        assert!(Error::RecursionLimit(64).diagnostics().is_empty());
    }
}
