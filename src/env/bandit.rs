use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

use crate::env::{Arm, RewardSource};
use crate::error::{Error, Result};
use crate::policy::argmax_first;

/// An n-armed test bed with fixed Gaussian arms
///
/// Each arm's true mean is drawn once from `N(0, 1)` at construction and every
/// play returns a sample from `N(mean, 1)`. The best arm is exposed for
/// measuring the optimal-action rate; agents never see it.
///
/// Any [`RngCore`] can drive the rewards; `R` defaults to [`StdRng`].
#[derive(Clone, Debug)]
pub struct StationaryBandit<R = StdRng> {
    arms: Vec<Arm>,
    best: usize,
    rng: R,
}

impl StationaryBandit {
    /// Creates `n_arms` random arms from a seed.
    pub fn seeded(n_arms: usize, seed: u64) -> Result<Self> {
        Self::new(n_arms, StdRng::seed_from_u64(seed))
    }
}

impl<R> StationaryBandit<R>
where
    R: RngCore,
{
    /// Creates `n_arms` arms with random means, drawing from `rng`.
    pub fn new(n_arms: usize, mut rng: R) -> Result<Self> {
        let arms: Vec<Arm> = (0..n_arms).map(|_| Arm::random(&mut rng)).collect();
        Self::from_arms(arms, rng)
    }

    /// Creates arms with known true means.
    pub fn with_means<I>(means: I, rng: R) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let arms: Vec<Arm> = means.into_iter().map(Arm::with_mean).collect();
        if let Some(arm) = arms.iter().find(|arm| !arm.mean().is_finite()) {
            return Err(Error::config(format!(
                "arm means must be finite, got {}",
                arm.mean()
            )));
        }
        Self::from_arms(arms, rng)
    }

    fn from_arms(arms: Vec<Arm>, rng: R) -> Result<Self> {
        if arms.is_empty() {
            return Err(Error::config("a bandit needs at least one arm"));
        }
        let means: Vec<f64> = arms.iter().map(Arm::mean).collect();
        let best = argmax_first(&means);
        debug!(n_arms = arms.len(), best, best_mean = means[best], "created bandit");
        Ok(Self { arms, best, rng })
    }

    /// Number of arms.
    pub fn n_arms(&self) -> usize {
        self.arms.len()
    }

    pub fn arms(&self) -> &[Arm] {
        &self.arms
    }

    /// Index of the arm with the highest true mean (first one on ties).
    pub fn optimal_action(&self) -> usize {
        self.best
    }

    /// True mean of `action`.
    pub fn mean(&self, action: usize) -> Result<f64> {
        Error::check_action(action, self.arms.len())?;
        Ok(self.arms[action].mean())
    }

    pub fn means(&self) -> Vec<f64> {
        self.arms.iter().map(Arm::mean).collect()
    }

    /// Gap between the best true mean and the true mean of `action`.
    pub fn regret(&self, action: usize) -> Result<f64> {
        Ok(self.arms[self.best].mean() - self.mean(action)?)
    }

    /// Pulls `action` and returns the sampled reward.
    pub fn pull(&mut self, action: usize) -> Result<f64> {
        Error::check_action(action, self.arms.len())?;
        Ok(self.arms[action].sample(&mut self.rng))
    }
}

impl<R> RewardSource for StationaryBandit<R>
where
    R: RngCore,
{
    type State = ();

    fn n_actions(&self) -> usize {
        self.arms.len()
    }

    fn state(&self) -> Self::State {}

    fn play(&mut self, action: usize) -> Result<f64> {
        self.pull(action)
    }
}
