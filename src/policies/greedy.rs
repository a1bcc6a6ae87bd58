use crate::policy::{Policy, argmax_random};
use crate::table::ValueRow;

/// Greedy policy - always exploits the highest estimate
///
/// Ties among maximal estimates are broken uniformly at random so that equally
/// good actions are explored without bias.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Greedy;

impl Policy for Greedy {
    fn select(&self, row: &ValueRow, rng: &mut dyn rand::RngCore) -> usize {
        argmax_random(row.estimates(), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_greedy_strict_maximum() {
        let row = ValueRow::from_parts(vec![0.2, -1.0, 0.7, 0.1], vec![1, 1, 1, 1]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(Greedy.select(&row, &mut rng), 2);
        }
    }

    #[test]
    fn test_greedy_ties_are_uniform() {
        let row = ValueRow::from_parts(vec![1.0, 0.0, 1.0], vec![0; 3]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(123);
        let trials = 20_000;
        let mut picks = [0usize; 3];
        for _ in 0..trials {
            picks[Greedy.select(&row, &mut rng)] += 1;
        }
        assert_eq!(picks[1], 0);
        let share = picks[0] as f64 / trials as f64;
        assert!((share - 0.5).abs() < 0.02, "share of action 0 was {share}");
    }

    #[test]
    fn test_greedy_starts_from_zero() {
        assert_eq!(Greedy.initial_value(), 0.0);
    }
}
