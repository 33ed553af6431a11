//! Diagnostic rendering for terminal output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[D004]: pin `resp_val` has no net
///   --> gcd.def:57:5
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let code = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{code}m{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        let header = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(diag.severity, &header),
            diag.message
        ));

        if let Some(loc) = &diag.location {
            out.push_str(&format!("  --> {loc}\n"));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}
