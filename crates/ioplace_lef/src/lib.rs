//! Technology (LEF) reader for the ioplace toolchain.
//!
//! Reads the subset of a LEF technology/library file that pin placement
//! needs: database units, manufacturing grid, routing layers with their
//! direction, pitch, offset, width, spacing and minimum area, and macro
//! sizes. Everything else is skipped with a diagnostic.
//!
//! # Usage
//!
//! ```ignore
//! use ioplace_lef::read_lef;
//!
//! let tech = read_lef(Path::new("Nangate45.lef"), &sink)?;
//! let metal2 = tech.layer("metal2").unwrap();
//! assert!(metal2.is_vertical());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod types;

pub use error::LefError;
pub use reader::{parse_lef, read_lef};
pub use types::{to_dbu, Layer, LayerDirection, LayerType, MacroDef, Technology};
