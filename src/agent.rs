use std::hash::Hash;
use std::marker::PhantomData;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::policies::LearningPolicy;
use crate::policy::Policy;
use crate::table::{ActionValueTable, UpdateRule};

fn build_rng<R: SeedableRng>(seed: Option<u64>) -> R {
    match seed {
        Some(seed) => R::seed_from_u64(seed),
        None => R::from_rng(&mut rand::rng()),
    }
}

/// A learning agent: one selection policy over one action-value table
///
/// The agent owns its random source and its table and nothing else. `S` is
/// the state key; it defaults to `()` for stateless bandits, which also get
/// the `*_simple` convenience methods. `R` is the random source, [`StdRng`]
/// unless a portable generator is wanted.
#[derive(Clone, Debug)]
pub struct Agent<P, S = (), R = StdRng> {
    policy: P,
    table: ActionValueTable<S>,
    rule: UpdateRule,
    rng: R,
}

impl<P, S> Agent<P, S>
where
    P: Policy,
    S: Clone + Eq + Hash,
{
    /// Creates an agent with a seeded [`StdRng`].
    pub fn seeded(n_actions: usize, policy: P, rule: UpdateRule, seed: u64) -> Result<Self> {
        Self::new(n_actions, policy, rule, StdRng::seed_from_u64(seed))
    }
}

impl<P, S, R> Agent<P, S, R>
where
    P: Policy,
    S: Clone + Eq + Hash,
    R: RngCore,
{
    /// Creates an agent whose table starts at the policy's initial value.
    pub fn new(n_actions: usize, policy: P, rule: UpdateRule, rng: R) -> Result<Self> {
        policy.validate()?;
        rule.validate()?;
        let table = ActionValueTable::new(n_actions, policy.initial_value())?;
        debug!(
            n_actions,
            initial_value = table.initial_value(),
            ?rule,
            "created agent"
        );
        Ok(Self {
            policy,
            table,
            rule,
            rng,
        })
    }

    /// Chooses an action for `state`.
    pub fn act(&mut self, state: &S) -> usize {
        self.policy
            .select_action(&mut self.table, state, &mut self.rng)
    }

    /// Feeds back the reward observed after taking `action` in `state`.
    ///
    /// `next_state` is only read by the Q-learning rule.
    pub fn observe(&mut self, state: &S, action: usize, reward: f64, next_state: &S) -> Result<()> {
        self.table
            .update(&self.rule, state, action, reward, next_state)
    }

    /// Current estimate of `action` in `state`.
    pub fn estimate(&mut self, state: &S, action: usize) -> Result<f64> {
        self.table.estimate(state, action)
    }

    pub fn n_actions(&self) -> usize {
        self.table.n_actions()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn rule(&self) -> &UpdateRule {
        &self.rule
    }

    pub fn table(&self) -> &ActionValueTable<S> {
        &self.table
    }

    /// Forgets everything learned; the random source keeps its position.
    pub fn reset(&mut self) {
        self.table.reset();
    }
}

// Convenience methods for stateless bandits
impl<P, R> Agent<P, (), R>
where
    P: Policy,
    R: RngCore,
{
    pub fn act_simple(&mut self) -> usize {
        self.act(&())
    }

    pub fn observe_simple(&mut self, action: usize, reward: f64) -> Result<()> {
        self.observe(&(), action, reward, &())
    }
}

impl<S, R> Agent<LearningPolicy, S, R>
where
    S: Clone + Eq + Hash,
    R: RngCore + SeedableRng,
{
    /// Builds an agent from plain configuration data.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config.n_actions,
            config.policy,
            config.update,
            build_rng(config.seed),
        )
    }
}

/// Serializable description of an agent.
///
/// ```
/// use qbandit::AgentConfig;
/// use qbandit::policies::LearningPolicy;
///
/// let config = AgentConfig::new(10, LearningPolicy::EpsilonGreedy { epsilon: 0.1 }).with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Number of actions available in every state
    pub n_actions: usize,
    /// Selection strategy
    pub policy: LearningPolicy,
    /// Value-update rule
    #[serde(default)]
    pub update: UpdateRule,
    /// Random seed for reproducibility; `None` seeds from the thread RNG
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Uses the sample-average rule and no fixed seed.
    pub fn new(n_actions: usize, policy: LearningPolicy) -> Self {
        Self {
            n_actions,
            policy,
            update: UpdateRule::default(),
            seed: None,
        }
    }

    pub fn with_update(mut self, update: UpdateRule) -> Self {
        self.update = update;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every field.
    pub fn validate(&self) -> Result<()> {
        if self.n_actions == 0 {
            return Err(Error::config("an agent needs at least one action"));
        }
        self.policy.check()?;
        self.update.validate()
    }
}

/// Builder for creating agents with a fluent API
pub struct AgentBuilder<P, S = (), R = StdRng> {
    n_actions: Option<usize>,
    policy: Option<P>,
    rule: UpdateRule,
    rng: Option<R>,
    _phantom: PhantomData<fn() -> S>,
}

impl<P, S, R> Default for AgentBuilder<P, S, R> {
    fn default() -> Self {
        Self {
            n_actions: None,
            policy: None,
            rule: UpdateRule::default(),
            rng: None,
            _phantom: PhantomData,
        }
    }
}

impl<P, S, R> AgentBuilder<P, S, R>
where
    P: Policy,
    S: Clone + Eq + Hash,
    R: RngCore + SeedableRng,
{
    /// Set the number of actions
    pub fn n_actions(mut self, n_actions: usize) -> Self {
        self.n_actions = Some(n_actions);
        self
    }

    /// Set the selection policy
    pub fn policy(mut self, policy: P) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set the value-update rule
    pub fn update_rule(mut self, rule: UpdateRule) -> Self {
        self.rule = rule;
        self
    }

    /// Seed the random source
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(R::seed_from_u64(seed));
        self
    }

    /// Use an existing random source
    pub fn rng(mut self, rng: R) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<Agent<P, S, R>> {
        let n_actions = self
            .n_actions
            .ok_or_else(|| Error::config("number of actions not specified"))?;
        let policy = self
            .policy
            .ok_or_else(|| Error::config("policy not specified"))?;
        let rng = self.rng.unwrap_or_else(|| build_rng(None));
        Agent::new(n_actions, policy, self.rule, rng)
    }
}

impl<P, S, R> Agent<P, S, R> {
    /// Create a new builder for constructing an agent
    pub fn builder() -> AgentBuilder<P, S, R> {
        AgentBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::{EpsilonGreedy, Greedy, Optimistic};

    #[test]
    fn test_agent_builder() {
        let agent = Agent::<Greedy>::builder()
            .n_actions(3)
            .policy(Greedy)
            .seed(1)
            .build()
            .unwrap();
        assert_eq!(agent.n_actions(), 3);
        assert_eq!(*agent.rule(), UpdateRule::SampleAverage);

        let missing = Agent::<Greedy>::builder().policy(Greedy).build();
        assert!(matches!(missing, Err(Error::InvalidConfiguration { .. })));

        let missing = Agent::<Greedy>::builder().n_actions(2).build();
        assert!(matches!(missing, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_agent_rejects_bad_rule() {
        let rule = UpdateRule::QLearning {
            step_size: 0.0,
            discount: 0.5,
        };
        assert!(Agent::<Greedy>::seeded(4, Greedy, rule, 0).is_err());
    }

    #[test]
    fn test_optimistic_agent_seeds_table() {
        let mut agent = Agent::<Optimistic>::seeded(
            3,
            Optimistic::new(0.0, 5.0).unwrap(),
            UpdateRule::SampleAverage,
            0,
        )
        .unwrap();
        assert_eq!(agent.estimate(&(), 2).unwrap(), 5.0);
    }

    #[test]
    fn test_simple_act_and_observe() {
        let mut agent = Agent::<EpsilonGreedy>::seeded(
            3,
            EpsilonGreedy::new(0.0).unwrap(),
            UpdateRule::SampleAverage,
            42,
        )
        .unwrap();

        agent.observe_simple(1, 2.0).unwrap();
        for _ in 0..20 {
            assert_eq!(agent.act_simple(), 1);
        }
        assert_eq!(agent.estimate(&(), 1).unwrap(), 2.0);

        assert!(matches!(
            agent.observe_simple(3, 1.0),
            Err(Error::InvalidAction {
                action: 3,
                n_actions: 3
            })
        ));

        agent.reset();
        assert!(agent.table().is_empty());
    }

    #[test]
    fn test_stateful_agent_learns_per_state() {
        let rule = UpdateRule::q_learning(1.0, 0.0).unwrap();
        let mut agent = Agent::<Greedy, u8>::seeded(2, Greedy, rule, 3).unwrap();

        agent.observe(&0, 1, 5.0, &1).unwrap();
        agent.observe(&1, 0, 2.0, &0).unwrap();
        assert_eq!(agent.act(&0), 1);
        assert_eq!(agent.act(&1), 0);
        assert_eq!(agent.table().len(), 2);
    }

    #[test]
    fn test_agent_from_config() {
        let config = AgentConfig::new(
            4,
            LearningPolicy::Optimistic {
                epsilon: 0.1,
                initial_value: 5.0,
            },
        )
        .with_seed(9)
        .with_update(UpdateRule::q_learning(0.1, 0.5).unwrap());

        let mut agent = Agent::<LearningPolicy, u32>::from_config(&config).unwrap();
        assert_eq!(agent.estimate(&17, 0).unwrap(), 5.0);

        let bad = AgentConfig::new(0, LearningPolicy::Greedy);
        assert!(Agent::<LearningPolicy>::from_config(&bad).is_err());

        let bad = AgentConfig::new(3, LearningPolicy::EpsilonGreedy { epsilon: -1.0 });
        assert!(Agent::<LearningPolicy>::from_config(&bad).is_err());
    }

    #[test]
    fn test_config_from_json() {
        let config: AgentConfig = serde_json::from_str(
            r#"{
                "n_actions": 4,
                "policy": {"kind": "epsilon_greedy", "epsilon": 0.1},
                "update": {"rule": "q_learning", "step_size": 0.1, "discount": 0.5},
                "seed": 42
            }"#,
        )
        .unwrap();
        assert_eq!(config.n_actions, 4);
        assert_eq!(config.seed, Some(42));
        assert_eq!(
            config.update,
            UpdateRule::QLearning {
                step_size: 0.1,
                discount: 0.5
            }
        );

        let minimal: AgentConfig =
            serde_json::from_str(r#"{"n_actions": 10, "policy": {"kind": "greedy"}}"#).unwrap();
        assert_eq!(minimal.update, UpdateRule::SampleAverage);
        assert_eq!(minimal.seed, None);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let make = || {
            Agent::<EpsilonGreedy>::seeded(
                5,
                EpsilonGreedy::new(0.5).unwrap(),
                UpdateRule::SampleAverage,
                77,
            )
            .unwrap()
        };
        let (mut a, mut b) = (make(), make());
        for step in 0..100 {
            let (x, y) = (a.act_simple(), b.act_simple());
            assert_eq!(x, y);
            a.observe_simple(x, step as f64).unwrap();
            b.observe_simple(y, step as f64).unwrap();
        }
    }
}
