//! Diagnostic severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a diagnostic message.
///
/// Ordered from least severe (`Note`) to most severe (`Error`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Informational context, e.g. which fallback a reader chose.
    Note,
    /// Input was accepted but something in it looks wrong.
    Warning,
    /// Input was rejected or a guarantee does not hold.
    Error,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
