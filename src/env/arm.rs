//! A single Gaussian bandit arm.

use rand::Rng;
use rand_distr::StandardNormal;

/// An arm paying normally distributed rewards with unit variance.
///
/// # Examples
///
/// ```
/// use qbandit::env::Arm;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let arm = Arm::with_mean(1.5);
/// let reward = arm.sample(&mut rng);
/// assert!(reward.is_finite());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arm {
    mean: f64,
}

impl Arm {
    /// Draws the arm's true mean from a standard normal distribution.
    pub fn random(rng: &mut dyn rand::RngCore) -> Self {
        Self {
            mean: rng.sample(StandardNormal),
        }
    }

    /// Creates an arm with a known true mean.
    pub fn with_mean(mean: f64) -> Self {
        Self { mean }
    }

    /// True mean reward of the arm.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Samples one reward from `N(mean, 1)`.
    pub fn sample(&self, rng: &mut dyn rand::RngCore) -> f64 {
        let noise: f64 = rng.sample(StandardNormal);
        self.mean + noise
    }
}
