//! Summary of a placement run, serializable to JSON.

use ioplace_common::{Dbu, Edge, Point};
use serde::{Deserialize, Serialize};

/// How pins were matched to slots.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Seeded shuffle spread evenly over the free slots.
    Random,
    /// Hungarian matching minimizing wirelength.
    MinCost,
}

/// One constraint group as it was placed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    /// The constraint, or `*` for pins no constraint matched.
    pub constraint: String,
    /// Pins placed in the group.
    pub pins: usize,
    /// Free slots the group could choose from.
    pub free_slots: usize,
}

/// A pin placed by the run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPin {
    /// Pin name.
    pub name: String,
    /// Edge the pin was placed on.
    pub edge: Edge,
    /// Layer of the pin shape.
    pub layer: String,
    /// Pin location on the die boundary.
    pub location: Point,
}

/// What a call to [`PinPlacer::place_pins`](crate::PinPlacer::place_pins) did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    /// Design name.
    pub design: String,
    /// Assignment mode.
    pub mode: PlacementMode,
    /// Seed used, in randomized mode.
    pub seed: Option<u64>,
    /// Slots generated on the allowed layers.
    pub total_slots: usize,
    /// Slots blocked by pins that were already placed.
    pub blocked_slots: usize,
    /// Groups in placement order.
    pub groups: Vec<GroupReport>,
    /// Placed pins in placement order.
    pub pins: Vec<PlacedPin>,
    /// Summed half-perimeter wirelength from each placed pin to its net.
    pub wirelength: Dbu,
}

impl PlacementReport {
    /// Number of pins placed.
    pub fn placed_count(&self) -> usize {
        self.pins.len()
    }

    /// Looks up where a pin was placed.
    pub fn pin(&self, name: &str) -> Option<&PlacedPin> {
        self.pins.iter().find(|p| p.name == name)
    }
}
