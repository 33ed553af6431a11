//! Pin-to-slot assignment within one constraint group.
//!
//! Randomized mode shuffles the pins with a seeded generator and spreads
//! them over the free slots. Deterministic mode minimizes total wirelength
//! with a Hungarian matching on a pin-by-slot cost matrix.

mod cost;
mod hungarian;
mod random;

use crate::slots::SlotPool;
use ioplace_common::{IoplaceResult, Rect};

pub(crate) use cost::{hpwl, pin_anchor};
pub(crate) use random::random_assignment;

/// Pairs each pin with one of `free` slots minimizing the summed
/// half-perimeter wirelength to each pin's anchor box.
pub(crate) fn min_cost_assignment(
    pins: &[String],
    free: &[usize],
    pool: &SlotPool,
    anchor: impl Fn(&str) -> Option<Rect>,
) -> IoplaceResult<Vec<(String, usize)>> {
    let mut order: Vec<&String> = pins.iter().collect();
    order.sort();

    let locations: Vec<_> = free
        .iter()
        .map(|&i| pool.location(&pool.slots()[i]))
        .collect();
    let cost: Vec<Vec<i64>> = order
        .iter()
        .map(|pin| {
            let anchor = anchor(pin.as_str());
            locations.iter().map(|&p| hpwl(anchor.as_ref(), p)).collect()
        })
        .collect();

    let matching = hungarian::min_cost_matching(&cost)?;
    Ok(order
        .into_iter()
        .zip(matching)
        .map(|(pin, column)| (pin.clone(), free[column]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::PinLayer;
    use crate::params::PlacerParams;
    use ioplace_common::Point;

    fn pool() -> SlotPool {
        let m2 = PinLayer {
            name: "m2".to_string(),
            vertical: true,
            width: 70,
            depth: 70,
            min_distance: 200,
            tracks: vec![100, 300, 500, 700, 900],
        };
        SlotPool::build(&[m2], Rect::from_coords(0, 0, 1000, 1000), &PlacerParams::default())
    }

    #[test]
    fn pins_go_near_their_nets() {
        let pool = pool();
        let free = pool.in_region(None);
        let pins = vec!["a".to_string(), "b".to_string()];
        let result = min_cost_assignment(&pins, &free, &pool, |pin| {
            let p = match pin {
                "a" => Point::new(880, 50),
                _ => Point::new(120, 950),
            };
            Some(Rect::new(p, p))
        })
        .unwrap();
        let located: Vec<(String, Point)> = result
            .into_iter()
            .map(|(pin, i)| (pin, pool.location(&pool.slots()[i])))
            .collect();
        assert_eq!(
            located,
            vec![
                ("a".to_string(), Point::new(900, 0)),
                ("b".to_string(), Point::new(100, 1000)),
            ]
        );
    }

    #[test]
    fn unanchored_pins_take_earliest_slots() {
        let pool = pool();
        let free = pool.in_region(None);
        let pins = vec!["y".to_string(), "x".to_string()];
        let result = min_cost_assignment(&pins, &free, &pool, |_| None).unwrap();
        let mut slots: Vec<usize> = result.iter().map(|(_, s)| *s).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![free[0], free[1]]);
    }
}
