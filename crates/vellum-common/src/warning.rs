//! Conversion warnings with colored terminal output.
//!
//! Recoverable problems (unknown shape classes, unreadable images, orphaned
//! layer records) never abort a conversion. They are collected here instead,
//! deduplicated so that the same message is only reported once per run.

use std::collections::HashSet;

use owo_colors::OwoColorize;
use strum_macros::Display;

/// The class of a recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum WarningKind {
    /// An unrecognized shape class, layer kind, or attribute key.
    #[strum(to_string = "unknown feature")]
    UnknownFeature,
    /// An image could not be decoded or re-encoded.
    #[strum(to_string = "resource failure")]
    ResourceFailure,
    /// A layer record refers to a parent that does not exist, or repeats an id.
    #[strum(to_string = "dangling reference")]
    DanglingReference,
    /// A recognized feature that the converter does not render.
    #[strum(to_string = "unsupported")]
    Unsupported,
}

/// A single recoverable problem reported during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Warning {
    /// What went wrong.
    pub kind: WarningKind,
    /// The component that raised the warning (e.g. `"path"`, `"layer"`).
    pub component: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.component, self.kind, self.message)
    }
}

/// Warning sink owned by a single conversion run.
///
/// Identical `(component, message)` pairs are recorded once; the order of
/// first occurrence is preserved.
#[derive(Debug, Default)]
pub struct Diagnostics {
    seen: HashSet<(&'static str, String)>,
    warnings: Vec<Warning>,
    echo: bool,
}

impl Diagnostics {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that also prints each new warning to stderr.
    #[must_use]
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    /// Record a warning (prints once per unique message when echoing).
    ///
    /// # Example
    /// ```ignore
    /// diagnostics.warn(WarningKind::UnknownFeature, "shape", "unknown class 'Star'");
    /// ```
    pub fn warn(&mut self, kind: WarningKind, component: &'static str, message: impl Into<String>) {
        let message = message.into();
        if !self.seen.insert((component, message.clone())) {
            return;
        }

        let warning = Warning {
            kind,
            component,
            message,
        };
        if self.echo {
            print_warning(&warning);
        }
        self.warnings.push(warning);
    }

    /// All warnings recorded so far, in first-seen order.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Whether no warning has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of distinct warnings recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Whether any warning of `kind` has been recorded.
    #[must_use]
    pub fn has_kind(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    /// Consume the sink, returning the recorded warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// Print a warning to stderr in yellow.
pub fn print_warning(warning: &Warning) {
    let line = format!(
        "[vellum {}] ⚠ {}: {}",
        warning.component, warning.kind, warning.message
    );
    eprintln!("{}", line.yellow());
}
