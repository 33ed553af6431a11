//! Placement checking.
//!
//! Verifies a design after placement: every signal pin is placed on the die
//! boundary with its shape inside the region of the first constraint that
//! matches it, and no two pins on the same layer and edge collide, sit
//! closer than the minimum distance or break the layer's `SPACING` rule.

use crate::constraint::Constraint;
use crate::error::PlacementError;
use ioplace_common::{Dbu, Edge, Point};
use ioplace_def::Design;
use ioplace_lef::{to_dbu, Technology};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A broken placement rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A signal pin has no placement.
    Unplaced {
        /// Pin name.
        pin: String,
    },
    /// A pin is not located on the die boundary.
    OffBoundary {
        /// Pin name.
        pin: String,
        /// Where it is.
        location: Point,
    },
    /// A pin lies outside the region its constraint requires.
    OutsideRegion {
        /// Pin name.
        pin: String,
        /// The constraint it breaks.
        constraint: String,
    },
    /// Two pins share a coordinate on the same layer and edge.
    Overlap {
        /// Shared layer.
        layer: String,
        /// First pin in boundary order.
        first: String,
        /// Second pin.
        second: String,
    },
    /// Two same-layer pins on an edge are closer than the minimum distance.
    TooClose {
        /// Shared layer.
        layer: String,
        /// First pin in boundary order.
        first: String,
        /// Second pin.
        second: String,
        /// Their distance along the edge.
        distance: Dbu,
    },
    /// The shapes of two same-layer pins on an edge are closer than the
    /// layer's spacing rule.
    Spacing {
        /// Shared layer.
        layer: String,
        /// First pin in boundary order.
        first: String,
        /// Second pin.
        second: String,
        /// Edge-to-edge gap between the shapes.
        gap: Dbu,
        /// The layer's `SPACING` in database units.
        required: Dbu,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Unplaced { pin } => write!(f, "pin `{pin}` is not placed"),
            Violation::OffBoundary { pin, location } => {
                write!(f, "pin `{pin}` at {location} is not on the die boundary")
            }
            Violation::OutsideRegion { pin, constraint } => {
                write!(f, "pin `{pin}` is outside the region of `{constraint}`")
            }
            Violation::Overlap {
                layer,
                first,
                second,
            } => write!(f, "pins `{first}` and `{second}` overlap on {layer}"),
            Violation::TooClose {
                layer,
                first,
                second,
                distance,
            } => write!(
                f,
                "pins `{first}` and `{second}` on {layer} are only {distance} apart"
            ),
            Violation::Spacing {
                layer,
                first,
                second,
                gap,
                required,
            } => write!(
                f,
                "pins `{first}` and `{second}` on {layer} are {gap} apart edge to edge, {layer} needs {required}"
            ),
        }
    }
}

/// Checks the pin placement of `design`.
///
/// `min_distance` is the smallest allowed center distance between same-layer
/// pins on an edge; zero checks only for overlaps. With a technology, pin
/// shapes must also keep each layer's `SPACING` apart.
pub fn check_placement(
    design: &Design,
    tech: Option<&Technology>,
    constraints: &[Constraint],
    min_distance: Dbu,
) -> Result<Vec<Violation>, PlacementError> {
    let die = design
        .die_rect()
        .ok_or_else(|| PlacementError::NoDieArea(design.name.clone()))?;
    let dbu = design.dbu();
    let mut violations = Vec::new();
    let mut by_track: BTreeMap<(Edge, &str), Vec<(Dbu, &str, Dbu, Dbu)>> = BTreeMap::new();

    for pin in design.pins.iter().filter(|p| !p.is_supply()) {
        let (Some(shape), Some(placement), Some(rect)) =
            (&pin.shape, &pin.placement, pin.absolute_rect())
        else {
            violations.push(Violation::Unplaced {
                pin: pin.name.clone(),
            });
            continue;
        };
        let location = placement.location;
        let Some(edge) = Edge::of_point(&die, location) else {
            violations.push(Violation::OffBoundary {
                pin: pin.name.clone(),
                location,
            });
            continue;
        };
        let (along, lo, hi) = if edge.runs_along_x() {
            (location.x, rect.lo.x, rect.hi.x)
        } else {
            (location.y, rect.lo.y, rect.hi.y)
        };

        if let Some(c) = constraints.iter().find(|c| c.matches(pin)) {
            let (begin, end) = c.region.span(&die, dbu)?;
            if edge != c.region.edge || lo < begin || hi > end {
                violations.push(Violation::OutsideRegion {
                    pin: pin.name.clone(),
                    constraint: c.to_string(),
                });
            }
        }

        by_track
            .entry((edge, shape.layer.as_str()))
            .or_default()
            .push((along, pin.name.as_str(), lo, hi));
    }

    for ((_, layer), mut pins) in by_track {
        let required = tech
            .and_then(|t| t.layer(layer))
            .and_then(|l| l.spacing)
            .map_or(0, |s| to_dbu(s, dbu));
        pins.sort_unstable();
        for pair in pins.windows(2) {
            let ((a_pos, a, _, a_hi), (b_pos, b, b_lo, _)) = (pair[0], pair[1]);
            let distance = b_pos - a_pos;
            if distance == 0 {
                violations.push(Violation::Overlap {
                    layer: layer.to_string(),
                    first: a.to_string(),
                    second: b.to_string(),
                });
                continue;
            }
            if distance < min_distance {
                violations.push(Violation::TooClose {
                    layer: layer.to_string(),
                    first: a.to_string(),
                    second: b.to_string(),
                    distance,
                });
            }
            let gap = b_lo - a_hi;
            if gap < required {
                violations.push(Violation::Spacing {
                    layer: layer.to_string(),
                    first: a.to_string(),
                    second: b.to_string(),
                    gap,
                    required,
                });
            }
        }
    }
    Ok(violations)
}
