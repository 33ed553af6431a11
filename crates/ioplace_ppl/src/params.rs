//! Tunable placement parameters.

use ioplace_common::Dbu;
use serde::{Deserialize, Serialize};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Parameters shared by every placement run of a [`PinPlacer`](crate::PinPlacer).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacerParams {
    /// Seed of the random generator used in randomized mode.
    pub seed: u64,
    /// Distance from each die corner, in database units, kept free of pins.
    pub corner_avoidance: Dbu,
    /// Minimum distance between same-layer pins on an edge. `None` or zero
    /// means one track pitch.
    pub min_distance: Option<Dbu>,
    /// Interpret `min_distance` as a number of tracks instead of database units.
    pub min_distance_in_tracks: bool,
    /// How far pin shapes extend outward past the die boundary.
    pub pin_extension: Dbu,
}

impl Default for PlacerParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            corner_avoidance: 0,
            min_distance: None,
            min_distance_in_tracks: false,
            pin_extension: 0,
        }
    }
}

impl PlacerParams {
    /// The minimum same-layer distance for a layer whose track pitch is `pitch`.
    pub fn min_distance_for(&self, pitch: Dbu) -> Dbu {
        let configured = self.min_distance.filter(|&d| d > 0);
        match (configured, self.min_distance_in_tracks) {
            (Some(tracks), true) => tracks * pitch,
            (Some(distance), false) => distance,
            (None, _) => pitch,
        }
    }
}
