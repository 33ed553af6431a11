//! Slot generation: the legal pin positions around the die boundary.
//!
//! Slots are kept in one vector in counter-clockwise order starting at the
//! lower-left corner, so "earlier slot" and "evenly spaced through the free
//! slots" both follow the boundary walk.

use crate::layers::PinLayer;
use crate::params::PlacerParams;
use ioplace_common::{Dbu, Edge, InternalError, IoplaceResult, Point, Rect};
use ioplace_def::Design;

/// A legal pin position: an edge, a layer and a coordinate along the edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Slot {
    pub edge: Edge,
    /// Index into the resolved layer list.
    pub layer: usize,
    /// Coordinate along the edge's running axis.
    pub pos: Dbu,
    pub used: bool,
}

/// Every slot of a placement run with its occupancy.
#[derive(Debug)]
pub(crate) struct SlotPool {
    slots: Vec<Slot>,
    /// Pin width per layer index.
    widths: Vec<Dbu>,
    die: Rect,
}

fn walk_key(edge: Edge, pos: Dbu) -> Dbu {
    match edge {
        Edge::Bottom | Edge::Right => pos,
        Edge::Top | Edge::Left => -pos,
    }
}

impl SlotPool {
    /// Generates the slots of every layer on every edge it serves.
    pub fn build(layers: &[PinLayer], die: Rect, params: &PlacerParams) -> Self {
        let mut slots = Vec::new();
        for edge in Edge::ALL {
            let (lo, hi) = edge.span(&die);
            let (lo, hi) = (lo + params.corner_avoidance, hi - params.corner_avoidance);
            let start = slots.len();
            for (index, layer) in layers.iter().enumerate() {
                if !layer.serves(edge) {
                    continue;
                }
                let half = layer.width / 2;
                let mut last: Option<Dbu> = None;
                for &pos in &layer.tracks {
                    if pos - half < lo || pos + (layer.width - half) > hi {
                        continue;
                    }
                    if last.is_some_and(|l| pos - l < layer.min_distance) {
                        continue;
                    }
                    last = Some(pos);
                    slots.push(Slot {
                        edge,
                        layer: index,
                        pos,
                        used: false,
                    });
                }
            }
            slots[start..].sort_by_key(|s| (walk_key(edge, s.pos), s.layer));
        }
        let widths = layers.iter().map(|l| l.width).collect();
        Self { slots, widths, die }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The die point a slot's pin is located at.
    pub fn location(&self, slot: &Slot) -> Point {
        slot.edge.point_at(&self.die, slot.pos)
    }

    /// Marks slots too close to pins the design already has placed as used.
    /// Returns how many slots were blocked.
    pub fn block_placed_pins(&mut self, layers: &[PinLayer], design: &Design) -> usize {
        let mut blocked = 0;
        for pin in design.pins.iter().filter(|p| p.is_placed()) {
            let (Some(shape), Some(placement)) = (&pin.shape, &pin.placement) else {
                continue;
            };
            let Some(edge) = Edge::of_point(&self.die, placement.location) else {
                continue;
            };
            let along = if edge.runs_along_x() {
                placement.location.x
            } else {
                placement.location.y
            };
            for slot in self.slots.iter_mut().filter(|s| !s.used && s.edge == edge) {
                let layer = &layers[slot.layer];
                if layer.name == shape.layer && (slot.pos - along).abs() < layer.min_distance {
                    slot.used = true;
                    blocked += 1;
                }
            }
        }
        blocked
    }

    /// Indices of the slots on `edge` whose pin shape fits within
    /// `[begin, end]`, used or not. `None` selects the whole boundary.
    pub fn in_region(&self, region: Option<(Edge, Dbu, Dbu)>) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| match region {
                None => true,
                Some((edge, begin, end)) => {
                    let width = self.widths[s.layer];
                    let half = width / 2;
                    s.edge == edge && s.pos - half >= begin && s.pos + (width - half) <= end
                }
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of the free slots among `indices`.
    pub fn free(&self, indices: &[usize]) -> Vec<usize> {
        indices
            .iter()
            .copied()
            .filter(|&i| !self.slots[i].used)
            .collect()
    }

    /// Claims a slot for a pin.
    pub fn take(&mut self, index: usize) -> IoplaceResult<Slot> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| InternalError::new(format!("slot {index} does not exist")))?;
        if slot.used {
            return Err(InternalError::new(format!(
                "slot {index} on {} at {} is already taken",
                slot.edge, slot.pos
            )));
        }
        slot.used = true;
        Ok(*slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ioplace_common::Orient;
    use ioplace_def::{Pin, PinShape, Placement, PlacementStatus};

    fn layer(name: &str, vertical: bool, tracks: Vec<Dbu>) -> PinLayer {
        PinLayer {
            name: name.to_string(),
            vertical,
            width: 70,
            depth: 70,
            min_distance: 200,
            tracks,
        }
    }

    fn die() -> Rect {
        Rect::from_coords(0, 0, 1000, 1000)
    }

    fn tracks() -> Vec<Dbu> {
        vec![100, 300, 500, 700, 900]
    }

    #[test]
    fn counter_clockwise_order() {
        let layers = vec![layer("m2", true, tracks()), layer("m3", false, tracks())];
        let pool = SlotPool::build(&layers, die(), &PlacerParams::default());
        let walk: Vec<(Edge, Dbu)> = pool.slots().iter().map(|s| (s.edge, s.pos)).collect();
        assert_eq!(walk.len(), 20);
        assert!(walk[..5].iter().all(|w| w.0 == Edge::Bottom));
        let bottom: Vec<Dbu> = walk[..5].iter().map(|w| w.1).collect();
        assert_eq!(bottom, vec![100, 300, 500, 700, 900]);
        assert_eq!(walk[5], (Edge::Right, 100));
        assert_eq!(walk[10], (Edge::Top, 900));
        assert_eq!(walk[15], (Edge::Left, 900));
        assert_eq!(walk[19], (Edge::Left, 100));
        assert_eq!(pool.location(&pool.slots()[10]), Point::new(900, 1000));
        assert_eq!(pool.location(&pool.slots()[5]), Point::new(1000, 100));
    }

    #[test]
    fn corner_avoidance_and_shape_overhang() {
        let layers = vec![layer("m2", true, vec![0, 20, 100, 500, 980])];
        let pool = SlotPool::build(&layers, die(), &PlacerParams::default());
        let bottom: Vec<Dbu> = pool
            .slots()
            .iter()
            .filter(|s| s.edge == Edge::Bottom)
            .map(|s| s.pos)
            .collect();
        // 0 and 20 overhang the corner, 980 overhangs the far corner.
        assert_eq!(bottom, vec![100, 500]);

        let params = PlacerParams {
            corner_avoidance: 200,
            ..PlacerParams::default()
        };
        let pool = SlotPool::build(&layers, die(), &params);
        assert!(pool.slots().iter().all(|s| s.pos == 500));
    }

    #[test]
    fn decimates_to_min_distance() {
        let mut m2 = layer("m2", true, vec![100, 200, 300, 400, 500, 600]);
        m2.min_distance = 250;
        let pool = SlotPool::build(&[m2], die(), &PlacerParams::default());
        let bottom: Vec<Dbu> = pool
            .slots()
            .iter()
            .filter(|s| s.edge == Edge::Bottom)
            .map(|s| s.pos)
            .collect();
        assert_eq!(bottom, vec![100, 400]);
    }

    #[test]
    fn regions_and_taking() {
        let layers = vec![layer("m2", true, tracks())];
        let mut pool = SlotPool::build(&layers, die(), &PlacerParams::default());
        let top = pool.in_region(Some((Edge::Top, 200, 800)));
        assert_eq!(top.len(), 3);
        assert_eq!(pool.in_region(None).len(), 10);
        assert_eq!(pool.take(top[0]).unwrap().pos, 700);
        assert_eq!(pool.free(&top).len(), 2);
        assert!(pool.take(top[0]).is_err());
        assert!(pool.take(99).is_err());
    }

    #[test]
    fn region_bounds_the_whole_shape() {
        let layers = vec![layer("m2", true, tracks())];
        let pool = SlotPool::build(&layers, die(), &PlacerParams::default());
        let positions = |begin, end| -> Vec<Dbu> {
            pool.in_region(Some((Edge::Bottom, begin, end)))
                .into_iter()
                .map(|i| pool.slots()[i].pos)
                .collect()
        };
        // 300 reaches 265..335, 700 reaches 665..735.
        assert_eq!(positions(265, 735), vec![300, 500, 700]);
        assert_eq!(positions(266, 734), vec![500]);
        assert_eq!(positions(300, 700), vec![500]);
    }

    #[test]
    fn placed_pins_block_neighbours() {
        let layers = vec![layer("m2", true, tracks()), layer("m3", false, tracks())];
        let mut pool = SlotPool::build(&layers, die(), &PlacerParams::default());
        let mut design = Design::new("t");
        design.die_area = vec![Point::new(0, 0), Point::new(1000, 1000)];
        design.add_pin(Pin {
            shape: Some(PinShape {
                layer: "m2".to_string(),
                rect: Rect::from_coords(-35, 0, 35, 70),
            }),
            placement: Some(Placement {
                status: PlacementStatus::Fixed,
                location: Point::new(400, 0),
                orient: Orient::N,
            }),
            ..Pin::new("fixed")
        });
        // 300 and 500 are both within 200 of 400.
        assert_eq!(pool.block_placed_pins(&layers, &design), 2);
        let bottom = pool.in_region(Some((Edge::Bottom, 0, 1000)));
        let free: Vec<Dbu> = pool
            .free(&bottom)
            .into_iter()
            .map(|i| pool.slots()[i].pos)
            .collect();
        assert_eq!(free, vec![100, 700, 900]);
    }
}
