use rand::Rng;
use tracing::trace;

use crate::error::{Error, Result};
use crate::policy::{Policy, argmax_random, uniform_action};
use crate::table::ValueRow;

/// Epsilon-greedy policy - explores with probability epsilon, exploits otherwise
///
/// The explore branch draws uniformly from *all* actions, the current best
/// included. With `epsilon == 0` no exploration draw is made at all, so the
/// policy consumes the random source exactly like [`Greedy`](super::Greedy).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    /// Creates a new EpsilonGreedy policy with the given epsilon
    pub fn new(epsilon: f64) -> Result<Self> {
        check_epsilon(epsilon)?;
        Ok(Self { epsilon })
    }

    pub(crate) fn unchecked(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Gets the epsilon value
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Sets the epsilon value
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        check_epsilon(epsilon)?;
        self.epsilon = epsilon;
        Ok(())
    }

    /// Flips the exploration coin.
    pub(crate) fn explores(&self, rng: &mut dyn rand::RngCore) -> bool {
        self.epsilon > 0.0 && rng.random::<f64>() < self.epsilon
    }
}

pub(crate) fn check_epsilon(epsilon: f64) -> Result<()> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(())
    } else {
        Err(Error::config(format!(
            "epsilon must be between 0 and 1, got {epsilon}"
        )))
    }
}

impl Policy for EpsilonGreedy {
    fn select(&self, row: &ValueRow, rng: &mut dyn rand::RngCore) -> usize {
        if self.explores(rng) {
            let action = uniform_action(row.len(), rng);
            trace!(action, "explore");
            action
        } else {
            argmax_random(row.estimates(), rng)
        }
    }
}
