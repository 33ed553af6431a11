//! The pin placer session: registered constraints plus the placement run.

use crate::assign::{hpwl, min_cost_assignment, pin_anchor, random_assignment};
use crate::constraint::Constraint;
use crate::error::PlacementError;
use crate::layers::resolve_layers;
use crate::params::PlacerParams;
use crate::report::{GroupReport, PlacedPin, PlacementMode, PlacementReport};
use crate::slots::SlotPool;
use ioplace_common::{Edge, Rect};
use ioplace_def::{Design, PinShape, Placement, PlacementStatus};
use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use ioplace_lef::Technology;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

const PIN_WITHOUT_NET: DiagnosticCode = DiagnosticCode::new(Category::Placement, 2);
const UNUSED_CONSTRAINT: DiagnosticCode = DiagnosticCode::new(Category::Placement, 3);

/// Places the unplaced I/O pins of a design on its boundary.
///
/// Constraints are registered up front with [`add_constraint`](Self::add_constraint);
/// the first constraint matching a pin decides its region, and constraint
/// groups are placed in registration order before the unconstrained pins.
pub struct PinPlacer<'a> {
    tech: &'a Technology,
    sink: &'a DiagnosticSink,
    params: PlacerParams,
    constraints: Vec<Constraint>,
}

struct Group<'c> {
    constraint: Option<&'c Constraint>,
    pins: Vec<String>,
}

impl<'a> PinPlacer<'a> {
    /// Creates a placer with default parameters and no constraints.
    pub fn new(tech: &'a Technology, sink: &'a DiagnosticSink) -> Self {
        Self {
            tech,
            sink,
            params: PlacerParams::default(),
            constraints: Vec::new(),
        }
    }

    /// Replaces the placement parameters.
    pub fn with_params(mut self, params: PlacerParams) -> Self {
        self.params = params;
        self
    }

    /// The placement parameters.
    pub fn params(&self) -> &PlacerParams {
        &self.params
    }

    /// Appends a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// The registered constraints in registration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Places every unplaced signal pin of `design`.
    ///
    /// Vertical layers host pins on the bottom and top edges, horizontal
    /// layers on the left and right edges. With `random` set, pins are
    /// shuffled with the configured seed; otherwise they are matched to the
    /// slots closest to their nets. On error the design is not modified.
    pub fn place_pins(
        &self,
        design: &mut Design,
        hor_layers: &[String],
        ver_layers: &[String],
        random: bool,
    ) -> Result<PlacementReport, PlacementError> {
        let die = design
            .die_rect()
            .ok_or_else(|| PlacementError::NoDieArea(design.name.clone()))?;
        let layers = resolve_layers(
            self.tech,
            design,
            &die,
            hor_layers,
            ver_layers,
            &self.params,
            self.sink,
        )?;
        let mut pool = SlotPool::build(&layers, die, &self.params);
        let blocked = pool.block_placed_pins(&layers, design);

        let dbu = design.dbu();
        let mut regions = Vec::with_capacity(self.constraints.len());
        for c in &self.constraints {
            let (begin, end) = c.region.span(&die, dbu)?;
            let slots = pool.in_region(Some((c.region.edge, begin, end)));
            if slots.is_empty() {
                return Err(PlacementError::NoSlotsInRegion {
                    region: c.region.to_string(),
                });
            }
            regions.push(slots);
        }

        let groups = self.group_pins(design);
        let anchors: HashMap<String, Option<Rect>> = groups
            .iter()
            .flat_map(|g| g.pins.iter())
            .map(|p| (p.clone(), pin_anchor(design, self.tech, p)))
            .collect();
        let anchor = |pin: &str| anchors.get(pin).copied().flatten();

        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let mut report = PlacementReport {
            design: design.name.clone(),
            mode: if random {
                PlacementMode::Random
            } else {
                PlacementMode::MinCost
            },
            seed: random.then_some(self.params.seed),
            total_slots: pool.slots().len(),
            blocked_slots: blocked,
            groups: Vec::new(),
            pins: Vec::new(),
            wirelength: 0,
        };
        let mut assigned = Vec::new();

        for (index, group) in groups.iter().enumerate() {
            let label = group
                .constraint
                .map_or_else(|| "*".to_string(), |c| c.to_string());
            if group.pins.is_empty() {
                if group.constraint.is_some() {
                    self.sink.emit(Diagnostic::note(
                        UNUSED_CONSTRAINT,
                        format!("constraint `{label}` matches no unplaced pins"),
                    ));
                }
                continue;
            }
            let candidates = match regions.get(index) {
                Some(slots) if group.constraint.is_some() => pool.free(slots),
                _ => pool.free(&pool.in_region(None)),
            };
            if candidates.len() < group.pins.len() {
                return Err(PlacementError::InsufficientSlots {
                    region: group
                        .constraint
                        .map_or_else(|| "*".to_string(), |c| c.region.to_string()),
                    needed: group.pins.len(),
                    available: candidates.len(),
                });
            }
            let chosen = if random {
                random_assignment(&group.pins, &candidates, &mut rng)
            } else {
                min_cost_assignment(&group.pins, &candidates, &pool, anchor)?
            };
            for (pin, slot) in chosen {
                let slot = pool.take(slot)?;
                assigned.push((pin, slot));
            }
            report.groups.push(GroupReport {
                constraint: label,
                pins: group.pins.len(),
                free_slots: candidates.len(),
            });
        }

        for (name, slot) in assigned {
            let layer = &layers[slot.layer];
            let location = pool.location(&slot);
            report.wirelength += hpwl(anchor(&name).as_ref(), location);
            report.pins.push(PlacedPin {
                name: name.clone(),
                edge: slot.edge,
                layer: layer.name.clone(),
                location,
            });
            if let Some(pin) = design.pin_mut(&name) {
                pin.shape = Some(PinShape {
                    layer: layer.name.clone(),
                    rect: layer.local_rect(self.params.pin_extension),
                });
                pin.placement = Some(Placement {
                    status: PlacementStatus::Placed,
                    location,
                    orient: slot.edge.pin_orient(),
                });
            }
        }
        Ok(report)
    }

    /// Splits the unplaced pins into one group per constraint plus a final
    /// unconstrained group.
    fn group_pins(&self, design: &Design) -> Vec<Group<'_>> {
        let mut groups: Vec<Group<'_>> = self
            .constraints
            .iter()
            .map(|c| Group {
                constraint: Some(c),
                pins: Vec::new(),
            })
            .collect();
        groups.push(Group {
            constraint: None,
            pins: Vec::new(),
        });
        let unconstrained = groups.len() - 1;

        for pin in design.unplaced_pins() {
            if pin.net.is_none() {
                self.sink.emit(
                    Diagnostic::warning(
                        PIN_WITHOUT_NET,
                        format!("pin `{}` is not connected to a net", pin.name),
                    )
                    .with_note("it is placed without a wirelength preference"),
                );
            }
            let index = self
                .constraints
                .iter()
                .position(|c| c.matches(pin))
                .unwrap_or(unconstrained);
            groups[index].pins.push(pin.name.clone());
        }
        groups
    }
}

/// Returns the edge of the die a placed pin's location lies on.
pub fn pin_edge(die: &Rect, design: &Design, pin: &str) -> Option<Edge> {
    let placement = design.pin(pin)?.placement?;
    Edge::of_point(die, placement.location)
}
