//! Common result and error types for the ioplace toolchain.

/// The standard result type for operations that can only fail on a bug.
///
/// User-facing problems (malformed LEF/DEF, impossible constraints) have
/// their own error enums in the crate that detects them. `Err` here means an
/// invariant inside ioplace was broken.
pub type IoplaceResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in ioplace, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
