//! Action-value tables and the rules that update them.
//!
//! A table holds one [`ValueRow`] per state. Stateless bandits use the unit
//! state `()` and therefore a single row; grid-world agents key rows by an
//! immutable state snapshot. Rows are created lazily the first time a state is
//! looked up, and never removed short of [`ActionValueTable::reset`].

use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};

/// Estimates and visit counts for every action of one state.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueRow {
    estimates: Vec<f64>,
    counts: Vec<u64>,
}

impl ValueRow {
    pub(crate) fn new(n_actions: usize, initial_value: f64) -> Self {
        Self {
            estimates: vec![initial_value; n_actions],
            counts: vec![0; n_actions],
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(estimates: Vec<f64>, counts: Vec<u64>) -> Self {
        assert_eq!(estimates.len(), counts.len());
        Self { estimates, counts }
    }

    /// Number of action slots.
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// Current estimate of `action`.
    pub fn estimate(&self, action: usize) -> Result<f64> {
        Error::check_action(action, self.len())?;
        Ok(self.estimates[action])
    }

    /// Number of updates applied to `action`.
    pub fn count(&self, action: usize) -> Result<u64> {
        Error::check_action(action, self.len())?;
        Ok(self.counts[action])
    }

    pub fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum of the visit counts over all actions.
    pub fn total_visits(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Largest estimate in the row.
    pub fn max_value(&self) -> f64 {
        self.estimates
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every action whose estimate equals the row maximum, in index order.
    pub fn greedy_actions(&self) -> Vec<usize> {
        let best = self.max_value();
        self.estimates
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == best)
            .map(|(action, _)| action)
            .collect()
    }

    fn record_sample(&mut self, action: usize, target: f64) {
        self.counts[action] += 1;
        let step = 1.0 / self.counts[action] as f64;
        self.estimates[action] += (target - self.estimates[action]) * step;
    }

    fn blend(&mut self, action: usize, target: f64, step_size: f64) {
        self.counts[action] += 1;
        self.estimates[action] = (1.0 - step_size) * self.estimates[action] + step_size * target;
    }
}

/// How observed rewards are folded into the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum UpdateRule {
    /// `value += (target - value) / count`; converges to the mean reward of a
    /// stationary arm. Old samples are weighted 1/count, so this rule adapts
    /// slowly when the reward distribution drifts.
    #[default]
    SampleAverage,
    /// One-step Q-learning:
    /// `value = (1 - α)·value + α·(reward + γ·max(next row))`.
    QLearning { step_size: f64, discount: f64 },
}

impl UpdateRule {
    /// Creates a validated Q-learning rule.
    pub fn q_learning(step_size: f64, discount: f64) -> Result<Self> {
        let rule = UpdateRule::QLearning {
            step_size,
            discount,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Checks α ∈ (0, 1] and γ ∈ [0, 1].
    pub fn validate(&self) -> Result<()> {
        match *self {
            UpdateRule::SampleAverage => Ok(()),
            UpdateRule::QLearning {
                step_size,
                discount,
            } => {
                if !(step_size > 0.0 && step_size <= 1.0) {
                    return Err(Error::config(format!(
                        "step size must be in (0, 1], got {step_size}"
                    )));
                }
                if !(0.0..=1.0).contains(&discount) {
                    return Err(Error::config(format!(
                        "discount must be in [0, 1], got {discount}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Lazily populated mapping from state to a fixed-width [`ValueRow`].
///
/// Every row has exactly `n_actions` slots. Rows keep insertion order so that
/// iteration is reproducible under a fixed seed.
#[derive(Clone, Debug)]
pub struct ActionValueTable<S = ()> {
    rows: IndexMap<S, ValueRow>,
    n_actions: usize,
    initial_value: f64,
}

impl<S> ActionValueTable<S>
where
    S: Clone + Eq + Hash,
{
    /// Creates an empty table whose rows start at `initial_value`.
    pub fn new(n_actions: usize, initial_value: f64) -> Result<Self> {
        if n_actions == 0 {
            return Err(Error::config("a table needs at least one action"));
        }
        if !initial_value.is_finite() {
            return Err(Error::config(format!(
                "initial value must be finite, got {initial_value}"
            )));
        }
        Ok(Self {
            rows: IndexMap::new(),
            n_actions,
            initial_value,
        })
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Number of materialized states.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, state: &S) -> bool {
        self.rows.contains_key(state)
    }

    /// Returns the row for `state`, materializing a default row if unseen.
    pub fn row(&mut self, state: &S) -> &ValueRow {
        self.row_mut(state)
    }

    /// Returns the estimate of `action` in `state`, materializing the row if unseen.
    pub fn estimate(&mut self, state: &S, action: usize) -> Result<f64> {
        Error::check_action(action, self.n_actions)?;
        self.row_mut(state).estimate(action)
    }

    /// Reads an estimate without materializing anything; unseen states report
    /// the initial value.
    pub fn peek(&self, state: &S, action: usize) -> Result<f64> {
        Error::check_action(action, self.n_actions)?;
        match self.rows.get(state) {
            Some(row) => row.estimate(action),
            None => Ok(self.initial_value),
        }
    }

    /// Largest estimate in `state`, materializing the row if unseen.
    pub fn max_value(&mut self, state: &S) -> f64 {
        self.row_mut(state).max_value()
    }

    /// Applies `rule` to the transition `(state, action, reward, next_state)`.
    ///
    /// `next_state` is only consulted by [`UpdateRule::QLearning`].
    pub fn update(
        &mut self,
        rule: &UpdateRule,
        state: &S,
        action: usize,
        reward: f64,
        next_state: &S,
    ) -> Result<()> {
        match *rule {
            UpdateRule::SampleAverage => self.update_sample_average(state, action, reward),
            UpdateRule::QLearning {
                step_size,
                discount,
            } => self.update_q_learning(state, action, reward, next_state, step_size, discount),
        }
    }

    /// Incremental sample-average update toward `target`.
    pub fn update_sample_average(&mut self, state: &S, action: usize, target: f64) -> Result<()> {
        Error::check_action(action, self.n_actions)?;
        self.row_mut(state).record_sample(action, target);
        Ok(())
    }

    /// One-step Q-learning update. Both rows are materialized before the
    /// target is computed.
    pub fn update_q_learning(
        &mut self,
        state: &S,
        action: usize,
        reward: f64,
        next_state: &S,
        step_size: f64,
        discount: f64,
    ) -> Result<()> {
        Error::check_action(action, self.n_actions)?;
        self.row_mut(state);
        let target = reward + discount * self.max_value(next_state);
        self.row_mut(state).blend(action, target, step_size);
        Ok(())
    }

    /// Iterates over materialized rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, &ValueRow)> {
        self.rows.iter()
    }

    /// Drops every row.
    pub fn reset(&mut self) {
        self.rows.clear();
    }

    fn row_mut(&mut self, state: &S) -> &mut ValueRow {
        let index = match self.rows.get_index_of(state) {
            Some(index) => index,
            None => {
                let (index, _) = self
                    .rows
                    .insert_full(state.clone(), ValueRow::new(self.n_actions, self.initial_value));
                trace!(rows = self.rows.len(), "materialized value row");
                index
            }
        };
        &mut self.rows[index]
    }
}

// Convenience methods for stateless bandits
impl ActionValueTable<()> {
    /// Estimate of `action` in the single bandit row.
    pub fn value(&mut self, action: usize) -> Result<f64> {
        self.estimate(&(), action)
    }

    /// Sample-average update of the single bandit row.
    pub fn record(&mut self, action: usize, reward: f64) -> Result<()> {
        self.update_sample_average(&(), action, reward)
    }
}
