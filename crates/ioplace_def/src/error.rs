//! Error types for design loading and writing.

use ioplace_common::TokenError;
use std::path::{Path, PathBuf};

/// Errors that stop a DEF file from loading or being written.
#[derive(Debug, thiserror::Error)]
pub enum DefError {
    /// The file could not be read or written.
    #[error("failed to access design file {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not well-formed DEF.
    #[error("{path}:{line}:{col}: {message}")]
    Syntax {
        /// The file being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: u32,
        /// 1-based column number.
        col: u32,
        /// What went wrong.
        message: String,
    },

    /// The file has no `DESIGN` statement.
    #[error("{0}: no DESIGN statement")]
    MissingDesignName(PathBuf),
}

impl DefError {
    pub(crate) fn syntax(path: &Path, err: TokenError) -> Self {
        DefError::Syntax {
            path: path.to_path_buf(),
            line: err.line,
            col: err.col,
            message: err.message,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        DefError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_display() {
        let err = DefError::syntax(
            Path::new("gcd.def"),
            TokenError {
                line: 30,
                col: 7,
                message: "expected `(`, found `x`".to_string(),
            },
        );
        assert_eq!(err.to_string(), "gcd.def:30:7: expected `(`, found `x`");
    }

    #[test]
    fn missing_design_display() {
        let err = DefError::MissingDesignName(PathBuf::from("empty.def"));
        assert_eq!(err.to_string(), "empty.def: no DESIGN statement");
    }
}
