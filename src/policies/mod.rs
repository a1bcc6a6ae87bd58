mod epsilon_greedy;
mod greedy;
mod optimistic;
mod ucb;

use serde::{Deserialize, Serialize};

pub use epsilon_greedy::EpsilonGreedy;
pub use greedy::Greedy;
pub use optimistic::Optimistic;
pub use ucb::Ucb;

use crate::error::Result;
use crate::policy::{Policy, TieBreak};
use crate::table::ValueRow;

/// Closed set of selection strategies, usable as plain configuration data.
///
/// Each variant dispatches to the matching policy type, so an agent can be
/// configured from a file without naming the concrete policy in its type.
///
/// ```
/// use qbandit::policies::LearningPolicy;
///
/// let policy = LearningPolicy::Ucb { epsilon: 0.0, c: 2.0, tie_break: Default::default() };
/// assert!(policy.check().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LearningPolicy {
    Greedy,
    EpsilonGreedy {
        epsilon: f64,
    },
    Optimistic {
        epsilon: f64,
        initial_value: f64,
    },
    Ucb {
        epsilon: f64,
        c: f64,
        #[serde(default)]
        tie_break: TieBreak,
    },
}

impl LearningPolicy {
    /// Checks every parameter of the variant.
    pub fn check(&self) -> Result<()> {
        match *self {
            LearningPolicy::Greedy => Ok(()),
            LearningPolicy::EpsilonGreedy { epsilon } => EpsilonGreedy::new(epsilon).map(|_| ()),
            LearningPolicy::Optimistic {
                epsilon,
                initial_value,
            } => Optimistic::new(epsilon, initial_value).map(|_| ()),
            LearningPolicy::Ucb { epsilon, c, .. } => Ucb::new(epsilon, c).map(|_| ()),
        }
    }

    /// Exploration probability of the variant; zero for [`LearningPolicy::Greedy`].
    pub fn epsilon(&self) -> f64 {
        match *self {
            LearningPolicy::Greedy => 0.0,
            LearningPolicy::EpsilonGreedy { epsilon }
            | LearningPolicy::Optimistic { epsilon, .. }
            | LearningPolicy::Ucb { epsilon, .. } => epsilon,
        }
    }

    /// Validates the variant and boxes the concrete policy behind it.
    pub fn into_boxed(self) -> Result<Box<dyn Policy>> {
        self.check()?;
        Ok(match self.resolve() {
            Resolved::Greedy(p) => Box::new(p),
            Resolved::EpsilonGreedy(p) => Box::new(p),
            Resolved::Optimistic(p) => Box::new(p),
            Resolved::Ucb(p) => Box::new(p),
        })
    }

    fn resolve(&self) -> Resolved {
        match *self {
            LearningPolicy::Greedy => Resolved::Greedy(Greedy),
            LearningPolicy::EpsilonGreedy { epsilon } => {
                Resolved::EpsilonGreedy(EpsilonGreedy::unchecked(epsilon))
            }
            LearningPolicy::Optimistic {
                epsilon,
                initial_value,
            } => Resolved::Optimistic(Optimistic::unchecked(epsilon, initial_value)),
            LearningPolicy::Ucb {
                epsilon,
                c,
                tie_break,
            } => Resolved::Ucb(Ucb::unchecked(epsilon, c).with_tie_break(tie_break)),
        }
    }
}

impl Default for LearningPolicy {
    fn default() -> Self {
        LearningPolicy::EpsilonGreedy { epsilon: 0.1 }
    }
}

// Selection does not re-check parameters: agents validate once at construction.
impl Policy for LearningPolicy {
    fn select(&self, row: &ValueRow, rng: &mut dyn rand::RngCore) -> usize {
        self.resolve().select(row, rng)
    }

    fn initial_value(&self) -> f64 {
        match *self {
            LearningPolicy::Optimistic { initial_value, .. } => initial_value,
            _ => 0.0,
        }
    }

    fn validate(&self) -> Result<()> {
        self.check()
    }
}

enum Resolved {
    Greedy(Greedy),
    EpsilonGreedy(EpsilonGreedy),
    Optimistic(Optimistic),
    Ucb(Ucb),
}

impl Resolved {
    fn select(&self, row: &ValueRow, rng: &mut dyn rand::RngCore) -> usize {
        match self {
            Resolved::Greedy(p) => p.select(row, rng),
            Resolved::EpsilonGreedy(p) => p.select(row, rng),
            Resolved::Optimistic(p) => p.select(row, rng),
            Resolved::Ucb(p) => p.select(row, rng),
        }
    }
}
