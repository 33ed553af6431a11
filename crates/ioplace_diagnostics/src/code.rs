//! Diagnostic codes with category prefixes for structured error identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The subsystem a diagnostic code belongs to, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Technology (LEF) reading, prefixed with `L`.
    Lef,
    /// Design (DEF) reading and writing, prefixed with `D`.
    Def,
    /// Pin placement and placement checking, prefixed with `P`.
    Placement,
    /// Run configuration, prefixed with `C`.
    Config,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Lef => 'L',
            Category::Def => 'D',
            Category::Placement => 'P',
            Category::Config => 'C',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the prefix followed by a zero-padded 3-digit number, e.g. `D101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Lef.prefix(), 'L');
        assert_eq!(Category::Def.prefix(), 'D');
        assert_eq!(Category::Placement.prefix(), 'P');
        assert_eq!(Category::Config.prefix(), 'C');
    }

    #[test]
    fn display_format() {
        assert_eq!(DiagnosticCode::new(Category::Def, 101).to_string(), "D101");
        assert_eq!(DiagnosticCode::new(Category::Lef, 3).to_string(), "L003");
        assert_eq!(DiagnosticCode::new(Category::Placement, 42).to_string(), "P042");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Placement, 7);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
