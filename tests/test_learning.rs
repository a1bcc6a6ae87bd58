//! Tests for the value-update rules through the agent API

use approx::assert_abs_diff_eq;
use qbandit::env::Arm;
use qbandit::prelude::*;
use rand::SeedableRng;

#[test]
fn test_single_observation_sets_estimate() {
    for reward in [-4.2, 0.0, 0.37, 12.5] {
        let mut agent = Agent::<Greedy>::seeded(5, Greedy, UpdateRule::SampleAverage, 0).unwrap();
        agent.observe_simple(3, reward).unwrap();
        assert_eq!(agent.estimate(&(), 3).unwrap(), reward);
    }
}

#[test]
fn test_sample_average_converges_to_mean() {
    let arm = Arm::with_mean(0.7);
    let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
    let mut table = ActionValueTable::<()>::new(2, 0.0).unwrap();

    for _ in 0..50_000 {
        table.record(1, arm.sample(&mut rng)).unwrap();
    }
    assert_abs_diff_eq!(table.value(1).unwrap(), 0.7, epsilon = 0.03);
    assert_eq!(table.value(0).unwrap(), 0.0);
}

#[test]
fn test_q_learning_without_bootstrap_replaces_value() {
    let rule = UpdateRule::q_learning(1.0, 0.0).unwrap();
    let mut agent = Agent::<Greedy, &str>::seeded(4, Greedy, rule, 0).unwrap();

    agent.observe(&"a", 2, 10.0, &"b").unwrap();
    assert_eq!(agent.estimate(&"a", 2).unwrap(), 10.0);
    agent.observe(&"a", 2, -10.0, &"b").unwrap();
    assert_eq!(agent.estimate(&"a", 2).unwrap(), -10.0);
}

#[test]
fn test_q_learning_propagates_value_backwards() {
    // Chain a -> b -> c where only the last transition pays
    let rule = UpdateRule::q_learning(0.5, 0.9).unwrap();
    let mut agent = Agent::<Greedy, char>::seeded(1, Greedy, rule, 0).unwrap();

    for _ in 0..200 {
        agent.observe(&'b', 0, 1.0, &'c').unwrap();
        agent.observe(&'a', 0, 0.0, &'b').unwrap();
    }
    assert_abs_diff_eq!(agent.estimate(&'b', 0).unwrap(), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(agent.estimate(&'a', 0).unwrap(), 0.9, epsilon = 1e-9);
    assert_eq!(agent.estimate(&'c', 0).unwrap(), 0.0);
}

#[test]
fn test_invalid_action_is_reported() {
    let mut agent = Agent::<Greedy>::seeded(3, Greedy, UpdateRule::SampleAverage, 0).unwrap();
    assert_eq!(
        agent.observe_simple(3, 1.0),
        Err(Error::InvalidAction {
            action: 3,
            n_actions: 3
        })
    );
    assert!(agent.estimate(&(), 9).is_err());
}

#[test]
fn test_invalid_configuration_is_reported() {
    assert!(matches!(
        UpdateRule::q_learning(0.0, 0.5),
        Err(Error::InvalidConfiguration { .. })
    ));
    assert!(matches!(
        UpdateRule::q_learning(0.5, 1.5),
        Err(Error::InvalidConfiguration { .. })
    ));

    let unchecked = UpdateRule::QLearning {
        step_size: 2.0,
        discount: 0.5,
    };
    assert!(matches!(
        Agent::<Greedy>::seeded(3, Greedy, unchecked, 0),
        Err(Error::InvalidConfiguration { .. })
    ));

    let config = AgentConfig::new(3, LearningPolicy::EpsilonGreedy { epsilon: 0.1 }).with_update(unchecked);
    assert!(Agent::<LearningPolicy>::from_config(&config).is_err());
}
