//! Diagnostics collection for route resolution and property unification.
//!
//! The analysis never writes output itself. Problems found while analyzing a type
//! are recorded as [`Diagnostic`] entries, each optionally pointing at the offending
//! declaration, and handed back to the caller as one batch inside
//! [`crate::Error::Analysis`]. Callers render the batch through an
//! [`ErrorReporter`], e.g. against a build log.
//!
//! # Key Components
//!
//! - [`Diagnostics`] - Lock-free container for diagnostic entries
//! - [`Diagnostic`] - Individual entry with kind, message and optional element
//! - [`DiagnosticKind`] - What went wrong
//! - [`ErrorReporter`] - Caller-side sink for `(message, element)` pairs
//! - [`LogReporter`] - Reporter forwarding every entry to the `log` facade
//!
//! # Reporting Modes
//!
//! With [`ReportMode::Batch`] every entry is collected and the analysis fails once,
//! at [`Diagnostics::finish`]. With [`ReportMode::FailFast`] the first reported
//! entry aborts. A creator ambiguity is a single report of several entries (one per
//! candidate), so it is listed in full in both modes.
//!
//! # Thread Safety
//!
//! [`Diagnostics`] uses `boxcar::Vec` internally, so entries can be appended through a
//! shared reference from parallel analyses.

use std::fmt::{self, Write};

use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::{analysis::config::ReportMode, model::Element, Error, Result};

/// Kind of problem a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum DiagnosticKind {
    /// The type exposes no eligible constructor, factory or builder.
    NoCreatorFound,

    /// More than one creator candidate remains after selection.
    ///
    /// One entry is reported per candidate.
    AmbiguousCreator,

    /// A builder type does not resolve to a usable build method.
    NoBuildMethodFound,

    /// The same annotation instance appears twice on one logical property.
    DuplicateAnnotation,

    /// An entry point was invoked with a member of the wrong kind.
    InvalidElementKind,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::NoCreatorFound => write!(f, "NoCreatorFound"),
            DiagnosticKind::AmbiguousCreator => write!(f, "AmbiguousCreator"),
            DiagnosticKind::NoBuildMethodFound => write!(f, "NoBuildMethodFound"),
            DiagnosticKind::DuplicateAnnotation => write!(f, "DuplicateAnnotation"),
            DiagnosticKind::InvalidElementKind => write!(f, "InvalidElementKind"),
        }
    }
}

/// A single diagnostic entry.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,

    /// Human-readable description of the issue.
    pub message: String,

    /// The declaration the issue is reported against, if any.
    pub element: Option<Element>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry.
    ///
    /// # Arguments
    ///
    /// * `kind` - What went wrong
    /// * `message` - Human-readable description
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            element: None,
        }
    }

    /// Points the diagnostic at a declaration.
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;

        if let Some(element) = &self.element {
            write!(f, " (at {element})")?;
        }

        Ok(())
    }
}

/// Accepts rendered diagnostics on the caller's side.
///
/// The analysis only builds the batch; an implementation decides where it goes.
pub trait ErrorReporter {
    /// Report one message, optionally against the offending declaration.
    fn report(&mut self, message: &str, element: Option<&Element>);
}

/// Forwards every diagnostic to `log::error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&mut self, message: &str, element: Option<&Element>) {
        match element {
            Some(element) => log::error!("{message} (at {element})"),
            None => log::error!("{message}"),
        }
    }
}

/// Thread-safe container collecting the diagnostics of one analysis.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
    mode: ReportMode,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty container in batch mode.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(ReportMode::Batch)
    }

    /// Creates a new empty container with the given report mode.
    #[must_use]
    pub fn with_mode(mode: ReportMode) -> Self {
        Self {
            entries: boxcar::Vec::new(),
            mode,
        }
    }

    /// The report mode of this container
    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    /// Adds a diagnostic entry without consulting the report mode.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Reports a diagnostic.
    ///
    /// # Errors
    ///
    /// In [`ReportMode::FailFast`], returns [`Error::Analysis`] carrying this entry.
    pub fn report(&self, diagnostic: Diagnostic) -> Result<()> {
        self.report_all(vec![diagnostic])
    }

    /// Reports several entries describing a single problem, e.g. every candidate
    /// of an ambiguity.
    ///
    /// # Errors
    ///
    /// In [`ReportMode::FailFast`], returns [`Error::Analysis`] carrying the whole
    /// batch.
    pub fn report_all(&self, batch: Vec<Diagnostic>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        for diagnostic in &batch {
            self.entries.push(diagnostic.clone());
        }

        match self.mode {
            ReportMode::FailFast => Err(Error::Analysis(batch)),
            ReportMode::Batch => Ok(()),
        }
    }

    /// Returns true if any diagnostics have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns the total number of diagnostics.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns an iterator over all diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns diagnostics filtered by kind.
    pub fn by_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|(_, d)| d.kind == kind)
            .map(|(_, d)| d)
            .collect()
    }

    /// Replays every entry to a reporter.
    pub fn report_to(&self, reporter: &mut dyn ErrorReporter) {
        for diagnostic in self.iter() {
            reporter.report(&diagnostic.message, diagnostic.element.as_ref());
        }
    }

    /// Completes the analysis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Analysis`] carrying every collected entry if there is any.
    pub fn finish(self) -> Result<()> {
        if !self.has_any() {
            return Ok(());
        }

        Err(Error::Analysis(self.iter().cloned().collect()))
    }

    /// Formats a summary of all diagnostics for display, grouped by kind.
    pub fn summary(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Diagnostics: {} issue(s)", self.count());

        for kind in DiagnosticKind::iter() {
            let entries = self.by_kind(kind);
            if entries.is_empty() {
                continue;
            }

            let _ = writeln!(output, "\n{kind} ({}):", entries.len());
            for diag in entries {
                let _ = writeln!(output, "  {diag}");
            }
        }

        output
    }

    /// Per-kind counts, indexed in declaration order of [`DiagnosticKind`].
    pub fn counts(&self) -> [usize; DiagnosticKind::COUNT] {
        let mut counts = [0; DiagnosticKind::COUNT];
        for (slot, kind) in DiagnosticKind::iter().enumerate() {
            counts[slot] = self.entries.iter().filter(|(_, d)| d.kind == kind).count();
        }
        counts
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
