use tracing::trace;

use crate::error::{Error, Result};
use crate::policy::{Policy, TieBreak, uniform_action};
use crate::table::ValueRow;

use super::EpsilonGreedy;

/// Upper Confidence Bound policy with an epsilon exploration floor
///
/// Scores each action as `estimate + c * sqrt(ln(t) / n)`, where `t` is the
/// total number of plays recorded in the row and `n` the plays of the action.
/// Untried actions score `+inf` and are always preferred. Before any play at
/// all the choice is uniform. With probability `epsilon` the policy still
/// explores uniformly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ucb {
    exploration: EpsilonGreedy,
    /// Confidence parameter
    c: f64,
    tie_break: TieBreak,
}

impl Ucb {
    /// Creates a new UCB policy with the given exploration rate and confidence parameter
    ///
    /// # Arguments
    /// * `epsilon` - Probability of a uniform exploratory pick
    /// * `c` - Confidence parameter; higher values encourage more exploration
    pub fn new(epsilon: f64, c: f64) -> Result<Self> {
        check_confidence(c)?;
        Ok(Self {
            exploration: EpsilonGreedy::new(epsilon)?,
            c,
            tie_break: TieBreak::default(),
        })
    }

    pub(crate) fn unchecked(epsilon: f64, c: f64) -> Self {
        Self {
            exploration: EpsilonGreedy::unchecked(epsilon),
            c,
            tie_break: TieBreak::default(),
        }
    }

    /// Chooses how exact score ties are resolved.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon()
    }

    /// Gets the confidence parameter
    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// UCB score of every action in `row`.
    pub fn scores(&self, row: &ValueRow) -> Vec<f64> {
        let log_total = (row.total_visits() as f64).ln();
        row.estimates()
            .iter()
            .zip(row.counts())
            .map(|(&estimate, &pulls)| {
                if pulls == 0 {
                    f64::INFINITY
                } else {
                    estimate + self.c * (log_total / pulls as f64).sqrt()
                }
            })
            .collect()
    }
}

pub(crate) fn check_confidence(c: f64) -> Result<()> {
    if c.is_finite() && c >= 0.0 {
        Ok(())
    } else {
        Err(Error::config(format!(
            "confidence parameter must be finite and non-negative, got {c}"
        )))
    }
}

impl Policy for Ucb {
    fn select(&self, row: &ValueRow, rng: &mut dyn rand::RngCore) -> usize {
        if self.exploration.explores(rng) {
            let action = uniform_action(row.len(), rng);
            trace!(action, "explore");
            return action;
        }
        if row.total_visits() == 0 {
            return uniform_action(row.len(), rng);
        }
        self.tie_break.pick(&self.scores(row), rng)
    }
}
