//! Environments that turn actions into rewards.

mod arm;
mod bandit;
mod grid;

use std::hash::Hash;

pub use arm::Arm;
pub use bandit::StationaryBandit;
pub use grid::{Cell, Direction, GridWorld, Position, RewardMode, Snapshot, TARGET_BONUS, WRAP_PENALTY};

use crate::error::Result;

/// An environment producing a scalar reward for each action.
///
/// Environments own their simulation state; agents only see it through
/// [`RewardSource::state`] snapshots and the rewards returned by
/// [`RewardSource::play`].
pub trait RewardSource {
    /// State key handed to the agent; `()` for stateless bandits.
    type State: Clone + Eq + Hash;

    /// Number of available actions.
    fn n_actions(&self) -> usize;

    /// Captures the current state.
    fn state(&self) -> Self::State;

    /// Applies `action` and returns its reward.
    fn play(&mut self, action: usize) -> Result<f64>;
}
