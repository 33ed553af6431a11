//! Shared foundational types used across the ioplace toolchain.
//!
//! This crate provides integer layout geometry (points, rectangles, DEF
//! orientations, die edges), the whitespace tokenizer shared by the LEF and
//! DEF readers, content hashing for golden-file comparison, and the common
//! internal error type.

#![warn(missing_docs)]

pub mod geom;
pub mod hash;
pub mod result;
pub mod tokens;

pub use geom::{Dbu, Edge, Orient, Point, Rect};
pub use hash::ContentHash;
pub use result::{InternalError, IoplaceResult};
pub use tokens::{Token, TokenError, TokenStream};
