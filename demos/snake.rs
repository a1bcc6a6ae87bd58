//! Tabular Q-learning on a 5×5 wrap-around grid.
//!
//! Prints the running score every 100 steps. Set `RUST_LOG=debug` to see each
//! wrap and each target reached.

use qbandit::experiment::run_episode;
use qbandit::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

const GRID_SIZE: usize = 5;
const STEPS: usize = 1000;

fn main() -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let mut grid = GridWorld::seeded(GRID_SIZE, 1)?;
    let mut agent = Agent::<EpsilonGreedy, Snapshot>::builder()
        .n_actions(Direction::ALL.len())
        .policy(EpsilonGreedy::new(0.1)?)
        .update_rule(UpdateRule::q_learning(0.1, 0.5)?)
        .seed(2)
        .build()?;

    let mut scores = Vec::with_capacity(STEPS);
    for _ in 0..STEPS {
        run_episode(&mut agent, &mut grid, 1)?;
        scores.push(grid.score());
    }

    for (i, score) in scores.iter().enumerate().filter(|(i, _)| (i + 1) % 100 == 0) {
        println!("step {:>5}  score {:>6}", i + 1, score);
    }
    info!(
        states = agent.table().len(),
        final_score = grid.score(),
        "done"
    );
    Ok(())
}
