//! Randomized assignment.
//!
//! Pins are shuffled from a name-sorted order, so the result depends only on
//! the seed and the set of pins, never on their order in the input file.

use rand::seq::SliceRandom;
use rand::Rng;

/// Pairs each pin with one of `free` slots, spreading the pins evenly over
/// the free slots in boundary order. `free.len()` must be at least
/// `pins.len()`.
pub(crate) fn random_assignment(
    pins: &[String],
    free: &[usize],
    rng: &mut impl Rng,
) -> Vec<(String, usize)> {
    let mut order: Vec<&String> = pins.iter().collect();
    order.sort();
    order.shuffle(rng);

    let (n, m) = (order.len(), free.len());
    order
        .into_iter()
        .enumerate()
        .map(|(k, pin)| (pin.clone(), free[k * m / n]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn pins(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("p{i}")).collect()
    }

    #[test]
    fn spreads_over_free_slots() {
        let free: Vec<usize> = (100..120).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = random_assignment(&pins(4), &free, &mut rng);
        let mut slots: Vec<usize> = result.iter().map(|(_, s)| *s).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![100, 105, 110, 115]);
        let names: HashSet<&str> = result.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn same_seed_same_result() {
        let free: Vec<usize> = (0..50).collect();
        let a = random_assignment(&pins(10), &free, &mut ChaCha8Rng::seed_from_u64(7));
        let b = random_assignment(&pins(10), &free, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn input_order_does_not_matter() {
        let free: Vec<usize> = (0..50).collect();
        let mut reversed = pins(10);
        reversed.reverse();
        let a = random_assignment(&pins(10), &free, &mut ChaCha8Rng::seed_from_u64(7));
        let b = random_assignment(&reversed, &free, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn exact_fit_uses_every_slot() {
        let free = vec![3, 8, 9];
        let result = random_assignment(&pins(3), &free, &mut ChaCha8Rng::seed_from_u64(1));
        let mut slots: Vec<usize> = result.iter().map(|(_, s)| *s).collect();
        slots.sort_unstable();
        assert_eq!(slots, free);
    }
}
