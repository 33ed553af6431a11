//! Content hashing for golden-file comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit content hash computed using XXH3.
///
/// The differ reports the hash of both sides of a comparison so that a
/// regression log shows at a glance whether two outputs are identical.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the first eight hex digits, enough to tell two files apart in a log line.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({}..)", self.short())
    }
}
