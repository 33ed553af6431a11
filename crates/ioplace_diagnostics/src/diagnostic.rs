//! Structured diagnostic messages with severity, code, location, and notes.

use crate::code::DiagnosticCode;
use crate::location::Location;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Where in the input the issue was detected, when it came from a file.
    pub location: Option<Location>,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
    /// Actionable suggestions (e.g., "help: ...").
    pub help: Vec<String>,
}

impl Diagnostic {
    fn with_severity(severity: Severity, code: DiagnosticCode, message: String) -> Self {
        Self {
            severity,
            code,
            message,
            location: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, code, message.into())
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, code, message.into())
    }

    /// Creates a new note diagnostic.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Note, code, message.into())
    }

    /// Attaches an input location.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Def, 101);
        let diag = Diagnostic::error(code, "expected `;`");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "expected `;`");
        assert_eq!(diag.code.to_string(), "D101");
        assert!(diag.location.is_none());
    }

    #[test]
    fn create_warning_and_note() {
        let code = DiagnosticCode::new(Category::Lef, 201);
        assert_eq!(
            Diagnostic::warning(code, "skipped section").severity,
            Severity::Warning
        );
        assert_eq!(Diagnostic::note(code, "fallback").severity, Severity::Note);
    }

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Placement, 3);
        let diag = Diagnostic::warning(code, "layer `metal3` is VERTICAL")
            .at(Location::new("tech.lef", 40, 3))
            .with_note("it was listed as a horizontal placement layer")
            .with_help("move it to --ver-layers");
        assert_eq!(diag.location.as_ref().unwrap().line, 40);
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }
}
