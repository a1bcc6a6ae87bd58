//! Policy trait definition for action selection

use std::hash::Hash;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::{ActionValueTable, ValueRow};

/// Decides which action to take from the current value estimates.
///
/// Policies are pure decision functions: they read one [`ValueRow`] and draw
/// from the caller's random source, but never mutate the table. The random
/// source is `dyn rand::RngCore` so that `Box<dyn Policy>` stays usable.
pub trait Policy {
    /// Selects an action index in `[0, row.len())`.
    fn select(&self, row: &ValueRow, rng: &mut dyn rand::RngCore) -> usize;

    /// Value that every table slot starts from under this policy.
    fn initial_value(&self) -> f64 {
        0.0
    }

    /// Checks the policy parameters; called once when an agent is built.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Selects an action for `state`, materializing its row first.
    fn select_action<S>(
        &self,
        table: &mut ActionValueTable<S>,
        state: &S,
        rng: &mut dyn rand::RngCore,
    ) -> usize
    where
        S: Clone + Eq + Hash,
        Self: Sized,
    {
        self.select(table.row(state), rng)
    }
}

impl<P> Policy for Box<P>
where
    P: Policy + ?Sized,
{
    fn select(&self, row: &ValueRow, rng: &mut dyn rand::RngCore) -> usize {
        (**self).select(row, rng)
    }

    fn initial_value(&self) -> f64 {
        (**self).initial_value()
    }

    fn validate(&self) -> Result<()> {
        (**self).validate()
    }
}

/// How to choose among actions sharing the maximal score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Uniformly at random among all maximal entries.
    #[default]
    Random,
    /// Lowest index wins.
    FirstIndex,
}

impl TieBreak {
    pub(crate) fn pick(self, scores: &[f64], rng: &mut dyn rand::RngCore) -> usize {
        match self {
            TieBreak::Random => argmax_random(scores, rng),
            TieBreak::FirstIndex => argmax_first(scores),
        }
    }
}

/// Uniform draw over `n` actions.
pub(crate) fn uniform_action(n_actions: usize, rng: &mut dyn rand::RngCore) -> usize {
    rng.random_range(0..n_actions)
}

/// Index of the maximal score, ties broken uniformly at random.
pub(crate) fn argmax_random(scores: &[f64], rng: &mut dyn rand::RngCore) -> usize {
    let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ties: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score == best)
        .map(|(action, _)| action)
        .collect();

    match ties.as_slice() {
        [] => uniform_action(scores.len(), rng),
        [only] => *only,
        _ => ties[rng.random_range(0..ties.len())],
    }
}

/// Index of the first maximal score.
pub(crate) fn argmax_first(scores: &[f64]) -> usize {
    let mut best = 0;
    for (action, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = action;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_argmax_first_prefers_lowest_index() {
        assert_eq!(argmax_first(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax_first(&[f64::INFINITY, f64::INFINITY]), 0);
        assert_eq!(argmax_first(&[0.0]), 0);
    }

    #[test]
    fn test_argmax_random_unique_max() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(argmax_random(&[0.1, 0.9, 0.3], &mut rng), 1);
        }
    }

    #[test]
    fn test_argmax_random_covers_all_ties() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut seen = [0usize; 4];
        for _ in 0..1000 {
            seen[argmax_random(&[2.0, 1.0, 2.0, 2.0], &mut rng)] += 1;
        }
        assert_eq!(seen[1], 0);
        assert!(seen[0] > 250 && seen[2] > 250 && seen[3] > 250);
    }

    #[test]
    fn test_argmax_random_nan_row_falls_back_to_uniform() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let choice = argmax_random(&[f64::NAN, f64::NAN], &mut rng);
        assert!(choice < 2);
    }

    #[test]
    fn test_tie_break_pick() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        assert_eq!(TieBreak::FirstIndex.pick(&[5.0, 5.0], &mut rng), 0);
        assert!(TieBreak::Random.pick(&[5.0, 5.0], &mut rng) < 2);
    }
}
