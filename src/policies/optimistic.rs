use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::table::ValueRow;

use super::EpsilonGreedy;

/// Optimistic initial values with epsilon-greedy selection
///
/// Decides exactly like [`EpsilonGreedy`], but asks for every table slot to
/// start at `initial_value` instead of zero. Untried actions keep their
/// inflated estimate until played, which pulls early selections toward them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Optimistic {
    inner: EpsilonGreedy,
    initial_value: f64,
}

impl Optimistic {
    /// Creates an optimistic policy, e.g. `Optimistic::new(0.0, 5.0)`.
    pub fn new(epsilon: f64, initial_value: f64) -> Result<Self> {
        if !initial_value.is_finite() {
            return Err(Error::config(format!(
                "optimistic initial value must be finite, got {initial_value}"
            )));
        }
        Ok(Self {
            inner: EpsilonGreedy::new(epsilon)?,
            initial_value,
        })
    }

    pub(crate) fn unchecked(epsilon: f64, initial_value: f64) -> Self {
        Self {
            inner: EpsilonGreedy::unchecked(epsilon),
            initial_value,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.inner.epsilon()
    }
}

impl Policy for Optimistic {
    fn select(&self, row: &ValueRow, rng: &mut dyn rand::RngCore) -> usize {
        self.inner.select(row, rng)
    }

    fn initial_value(&self) -> f64 {
        self.initial_value
    }
}
