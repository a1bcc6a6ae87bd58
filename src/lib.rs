//! qbandit: action selection and value learning for bandits and tabular Q-learning.
//!
//! The crate separates three concerns:
//!
//! - an [`ActionValueTable`] holding per-state estimates and visit counts,
//!   updated by sample averaging or one-step Q-learning ([`UpdateRule`]);
//! - a [`Policy`] deciding which action to take from those estimates
//!   ([`Greedy`](policies::Greedy), [`EpsilonGreedy`](policies::EpsilonGreedy),
//!   [`Optimistic`](policies::Optimistic), [`Ucb`](policies::Ucb));
//! - environments implementing [`RewardSource`](env::RewardSource): the
//!   Gaussian [`StationaryBandit`](env::StationaryBandit) and the toroidal
//!   [`GridWorld`](env::GridWorld).
//!
//! An [`Agent`] composes one policy with one table. All randomness comes from
//! seedable sources owned by the agent and the environment.
//!
//! # Quick Start
//!
//! ```
//! use qbandit::prelude::*;
//!
//! let mut agent: Agent<EpsilonGreedy> = Agent::seeded(
//!     10,
//!     EpsilonGreedy::new(0.1).unwrap(),
//!     UpdateRule::SampleAverage,
//!     42,
//! )
//! .unwrap();
//! let mut bandit = StationaryBandit::seeded(10, 7).unwrap();
//!
//! for _ in 0..100 {
//!     let action = agent.act_simple();
//!     let reward = bandit.play(action).unwrap();
//!     agent.observe_simple(action, reward).unwrap();
//! }
//! ```

// #![warn(missing_docs)]

mod agent;
pub mod env;
mod error;
pub mod experiment;
pub mod policies;
mod policy;
mod table;

// Re-export main types
pub use agent::{Agent, AgentBuilder, AgentConfig};
pub use error::{Error, Result};
pub use policy::{Policy, TieBreak};
pub use table::{ActionValueTable, UpdateRule, ValueRow};

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use qbandit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::env::{Direction, GridWorld, RewardSource, Snapshot, StationaryBandit};
    pub use crate::policies::{EpsilonGreedy, Greedy, LearningPolicy, Optimistic, Ucb};
    pub use crate::{
        ActionValueTable, Agent, AgentConfig, Error, Policy, Result, TieBreak, UpdateRule,
    };
}
