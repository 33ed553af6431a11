//! Golden-file comparison for the ioplace regression flow.
//!
//! A result file matches its golden only if the two are byte-for-byte
//! identical. On a mismatch the first differing line is reported together
//! with the content hashes of both files.

#![warn(missing_docs)]

use ioplace_common::ContentHash;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that prevent a comparison from being made.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The golden file could not be read.
    #[error("cannot read golden file {path}: {source}")]
    Golden {
        /// The golden file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The result file could not be read.
    #[error("cannot read result file {path}: {source}")]
    Result {
        /// The result file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The golden file could not be overwritten.
    #[error("cannot write golden file {path}: {source}")]
    Bless {
        /// The golden file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// The first place two files differ.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// 1-based number of the first differing line.
    pub line: usize,
    /// That line in the golden file, without its terminator; `None` past the end.
    pub expected: Option<String>,
    /// That line in the result file, without its terminator; `None` past the end.
    pub actual: Option<String>,
}

/// The outcome of comparing a result against its golden.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOutcome {
    /// Hash of the golden content.
    pub golden_hash: ContentHash,
    /// Hash of the result content.
    pub result_hash: ContentHash,
    /// Where the files first differ, or `None` when they are identical.
    pub mismatch: Option<Mismatch>,
}

impl DiffOutcome {
    /// Returns `true` if the files are identical.
    pub fn is_match(&self) -> bool {
        self.mismatch.is_none()
    }
}

fn line_text(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Compares two byte buffers.
pub fn diff_bytes(golden: &[u8], result: &[u8]) -> DiffOutcome {
    let golden_hash = ContentHash::from_bytes(golden);
    let result_hash = ContentHash::from_bytes(result);
    if golden == result {
        return DiffOutcome {
            golden_hash,
            result_hash,
            mismatch: None,
        };
    }

    let mut expected = golden.split_inclusive(|&b| b == b'\n');
    let mut actual = result.split_inclusive(|&b| b == b'\n');
    let mut line = 1;
    let mismatch = loop {
        match (expected.next(), actual.next()) {
            (Some(e), Some(a)) if e == a => line += 1,
            (e, a) => {
                break Mismatch {
                    line,
                    expected: e.map(line_text),
                    actual: a.map(line_text),
                }
            }
        }
    };
    DiffOutcome {
        golden_hash,
        result_hash,
        mismatch: Some(mismatch),
    }
}

/// Compares a result file against a golden file.
///
/// A missing file on either side is an error, not a mismatch.
pub fn diff_files(golden: &Path, result: &Path) -> Result<DiffOutcome, DiffError> {
    let expected = fs::read(golden).map_err(|source| DiffError::Golden {
        path: golden.to_path_buf(),
        source,
    })?;
    let actual = fs::read(result).map_err(|source| DiffError::Result {
        path: result.to_path_buf(),
        source,
    })?;
    Ok(diff_bytes(&expected, &actual))
}

/// Overwrites the golden file with the result file's content.
pub fn bless(golden: &Path, result: &Path) -> Result<(), DiffError> {
    let content = fs::read(result).map_err(|source| DiffError::Result {
        path: result.to_path_buf(),
        source,
    })?;
    if let Some(parent) = golden.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DiffError::Bless {
            path: golden.to_path_buf(),
            source,
        })?;
    }
    fs::write(golden, content).map_err(|source| DiffError::Bless {
        path: golden.to_path_buf(),
        source,
    })
}
