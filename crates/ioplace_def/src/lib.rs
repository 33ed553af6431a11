//! Design (DEF) reader and writer for the ioplace toolchain.
//!
//! Covers the parts of DEF a pin placement flow reads and must write back:
//! header statements, die area, rows, tracks, gcell grids, components, pins
//! and net connectivity. Sections outside that subset are skipped with a
//! warning and are not written back.
//!
//! # Usage
//!
//! ```ignore
//! use ioplace_def::{read_def, write_def};
//!
//! let mut design = read_def(Path::new("gcd.def"), &sink)?;
//! let unplaced = design.unplaced_pins().count();
//! design.write_to_file(Path::new("results/out.def"))?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::DefError;
pub use reader::{parse_def, read_def};
pub use types::{
    Component, Design, GcellGrid, Net, NetConnection, Pin, PinDirection, PinShape, Placement,
    PlacementStatus, Row, SignalUse, TrackAxis, Tracks,
};
pub use writer::write_def;
