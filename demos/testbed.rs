//! Ten-armed testbed: compares selection strategies averaged over many runs.
//!
//! Run with `cargo run --release --example testbed`. Set `RUST_LOG=debug` to
//! see per-run setup.

use qbandit::experiment::{Curve, run_many};
use qbandit::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

const N_ARMS: usize = 10;
const N_RUNS: usize = 2000;
const STEPS: usize = 1000;
const SEED: u64 = 2024;

fn evaluate(name: &str, policy: LearningPolicy) -> Result<Curve> {
    let runs = run_many(
        N_RUNS,
        STEPS,
        SEED,
        |seed| -> Result<(Agent<LearningPolicy>, StationaryBandit)> {
            let config = AgentConfig::new(N_ARMS, policy).with_seed(seed);
            Ok((
                Agent::from_config(&config)?,
                StationaryBandit::seeded(N_ARMS, seed.rotate_left(17))?,
            ))
        },
    )?;
    let curve = Curve::from_runs(&runs)?;
    info!(name, runs = runs.len(), "finished");
    Ok(curve)
}

fn tail_mean(values: &[f64], n: usize) -> f64 {
    let tail = &values[values.len().saturating_sub(n)..];
    tail.iter().sum::<f64>() / tail.len().max(1) as f64
}

fn main() -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let contenders = [
        ("greedy", LearningPolicy::Greedy),
        ("epsilon-greedy 0.1", LearningPolicy::EpsilonGreedy { epsilon: 0.1 }),
        (
            "optimistic Q1=5",
            LearningPolicy::Optimistic {
                epsilon: 0.0,
                initial_value: 5.0,
            },
        ),
        (
            "ucb c=2",
            LearningPolicy::Ucb {
                epsilon: 0.0,
                c: 2.0,
                tie_break: TieBreak::Random,
            },
        ),
    ];

    println!("{:<20} {:>12} {:>12}", "policy", "avg reward", "% optimal");
    for (name, policy) in contenders {
        let curve = evaluate(name, policy)?;
        println!(
            "{:<20} {:>12.3} {:>12.1}",
            name,
            tail_mean(&curve.average_reward, 100),
            tail_mean(&curve.percent_optimal, 100)
        );
    }
    Ok(())
}
