//! I/O pin placement for the ioplace toolchain.
//!
//! Places the unplaced I/O pins of a [`Design`](ioplace_def::Design) on the
//! die boundary, on the routing tracks of the layers the caller allows.
//!
//! # Pipeline
//!
//! 1. **Layers**: resolve the horizontal and vertical layer names against
//!    the technology and the design's `TRACKS`
//! 2. **Slots**: enumerate legal positions counter-clockwise around the die,
//!    dropping corners and blocking around pins that are already placed
//! 3. **Groups**: give each pin to the first constraint that matches it
//! 4. **Assign**: seeded shuffle (randomized mode) or Hungarian matching on
//!    wirelength (deterministic mode), group by group
//! 5. **Apply**: write shape, location and orientation back to the design
//!
//! # Usage
//!
//! ```ignore
//! use ioplace_ppl::{Constraint, PinPlacer};
//!
//! let mut placer = PinPlacer::new(&tech, &sink);
//! placer.add_constraint(Constraint::parse("INPUT:top:*")?);
//! placer.add_constraint(Constraint::parse("OUTPUT:bottom:*")?);
//! let report = placer.place_pins(&mut design, &["metal3".into()], &["metal2".into()], true)?;
//! ```

#![warn(missing_docs)]

mod assign;
pub mod checker;
pub mod constraint;
pub mod error;
mod layers;
pub mod params;
pub mod placer;
pub mod region;
pub mod report;
mod slots;

#[cfg(test)]
mod test_fixtures;

pub use checker::{check_placement, Violation};
pub use constraint::{Constraint, PinTarget};
pub use error::PlacementError;
pub use params::{PlacerParams, DEFAULT_SEED};
pub use placer::{pin_edge, PinPlacer};
pub use region::Region;
pub use report::{GroupReport, PlacedPin, PlacementMode, PlacementReport};
