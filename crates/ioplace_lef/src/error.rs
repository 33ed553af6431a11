//! Error types for technology loading.

use ioplace_common::TokenError;
use std::path::PathBuf;

/// Errors that stop a LEF file from loading.
#[derive(Debug, thiserror::Error)]
pub enum LefError {
    /// The file could not be read.
    #[error("failed to read technology file {path}: {source}")]
    Io {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not well-formed LEF.
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
}

impl LefError {
    pub(crate) fn syntax(path: &std::path::Path, err: TokenError) -> Self {
        LefError::Syntax {
            path: path.to_path_buf(),
            line: err.line,
            col: err.col,
            message: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn syntax_display() {
        let err = LefError::syntax(
            Path::new("tech.lef"),
            TokenError {
                line: 4,
                col: 9,
                message: "expected a number, found `x`".to_string(),
            },
        );
        assert_eq!(err.to_string(), "tech.lef:4:9: expected a number, found `x`");
    }

    #[test]
    fn io_display() {
        let err = LefError::Io {
            path: PathBuf::from("missing.lef"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err
            .to_string()
            .starts_with("failed to read technology file missing.lef"));
    }
}
