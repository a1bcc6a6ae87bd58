//! Instrumented runs of agents against environments.
//!
//! These helpers only record what happened; plotting and reporting are left
//! to the caller.

use rand::RngCore;
use rayon::prelude::*;
use tracing::debug;

use crate::agent::Agent;
use crate::env::{RewardSource, StationaryBandit};
use crate::error::{Error, Result};
use crate::policy::Policy;

/// What happened on one bandit step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    /// 1-based step number
    pub step: usize,
    pub action: usize,
    pub reward: f64,
    /// Whether `action` was the arm with the highest true mean
    pub optimal: bool,
}

/// Plays `steps` rounds of `agent` against `bandit`.
pub fn run_bandit<P, R, B>(
    agent: &mut Agent<P, (), R>,
    bandit: &mut StationaryBandit<B>,
    steps: usize,
) -> Result<Vec<StepOutcome>>
where
    P: Policy,
    R: RngCore,
    B: RngCore,
{
    let best = bandit.optimal_action();
    (1..=steps)
        .map(|step| -> Result<StepOutcome> {
            let action = agent.act_simple();
            let reward = bandit.play(action)?;
            agent.observe_simple(action, reward)?;
            Ok(StepOutcome {
                step,
                action,
                reward,
                optimal: action == best,
            })
        })
        .collect()
}

/// Runs `agent` against any environment for `steps` transitions and returns
/// the reward of each step.
pub fn run_episode<P, E, R>(
    agent: &mut Agent<P, E::State, R>,
    env: &mut E,
    steps: usize,
) -> Result<Vec<f64>>
where
    P: Policy,
    E: RewardSource,
    R: RngCore,
{
    let mut rewards = Vec::with_capacity(steps);
    for _ in 0..steps {
        let state = env.state();
        let action = agent.act(&state);
        let reward = env.play(action)?;
        let next_state = env.state();
        agent.observe(&state, action, reward, &next_state)?;
        rewards.push(reward);
    }
    Ok(rewards)
}

/// Runs `n_runs` independent bandit experiments in parallel.
///
/// `make` receives a per-run seed derived from `seed` and must build a fresh
/// agent and bandit from it, so runs share no random state.
pub fn run_many<P, F>(n_runs: usize, steps: usize, seed: u64, make: F) -> Result<Vec<Vec<StepOutcome>>>
where
    P: Policy,
    F: Fn(u64) -> Result<(Agent<P>, StationaryBandit)> + Sync,
{
    debug!(n_runs, steps, seed, "starting runs");
    (0..n_runs)
        .into_par_iter()
        .map(|run| -> Result<Vec<StepOutcome>> {
            let (mut agent, mut bandit) = make(run_seed(seed, run))?;
            run_bandit(&mut agent, &mut bandit, steps)
        })
        .collect()
}

fn run_seed(seed: u64, run: usize) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(run as u64)
}

/// Per-step averages across runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    /// Mean reward at each step
    pub average_reward: Vec<f64>,
    /// Share of runs choosing the optimal arm at each step, in percent
    pub percent_optimal: Vec<f64>,
}

impl Curve {
    /// Averages equally long runs step by step.
    pub fn from_runs(runs: &[Vec<StepOutcome>]) -> Result<Self> {
        let Some(first) = runs.first() else {
            return Ok(Self::default());
        };
        let steps = first.len();
        if let Some(run) = runs.iter().find(|run| run.len() != steps) {
            return Err(Error::config(format!(
                "runs must have equal length, got {steps} and {}",
                run.len()
            )));
        }

        let mut reward_sums = vec![0.0; steps];
        let mut optimal_counts = vec![0usize; steps];
        for run in runs {
            for (i, outcome) in run.iter().enumerate() {
                reward_sums[i] += outcome.reward;
                optimal_counts[i] += usize::from(outcome.optimal);
            }
        }

        let n = runs.len() as f64;
        Ok(Self {
            average_reward: reward_sums.into_iter().map(|sum| sum / n).collect(),
            percent_optimal: optimal_counts
                .into_iter()
                .map(|count| 100.0 * count as f64 / n)
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.average_reward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.average_reward.is_empty()
    }

    /// `(step, average_reward, percent_optimal)` triples, steps starting at 1.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        self.average_reward
            .iter()
            .zip(&self.percent_optimal)
            .enumerate()
            .map(|(i, (&reward, &optimal))| (i + 1, reward, optimal))
    }
}
