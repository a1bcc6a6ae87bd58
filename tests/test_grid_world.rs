//! Grid-world behavior and tabular Q-learning on it

use qbandit::env::{Cell, Position, RewardMode, TARGET_BONUS, WRAP_PENALTY};
use qbandit::experiment::run_episode;
use qbandit::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_left_from_first_column_wraps() {
    let mut grid =
        GridWorld::with_layout(5, Position::new(0, 1), Position::new(3, 3), StdRng::seed_from_u64(1))
            .unwrap();
    let before = grid.score();

    let reward = grid.play(Direction::Left.index()).unwrap();

    assert_eq!(grid.agent(), Position::new(4, 1));
    assert_eq!(grid.score(), before - 10);
    assert_eq!(reward, WRAP_PENALTY as f64);
    assert_eq!(grid.cell(0, 1), Some(Cell::Empty));
    assert_eq!(grid.cell(4, 1), Some(Cell::Agent));
}

#[test]
fn test_reaching_target_relocates_it() {
    for seed in 0..100 {
        let mut grid = GridWorld::with_layout(
            4,
            Position::new(1, 1),
            Position::new(1, 0),
            StdRng::seed_from_u64(seed),
        )
        .unwrap();

        let reward = grid.play(Direction::Up.index()).unwrap();

        assert_eq!(reward, TARGET_BONUS as f64);
        assert_eq!(grid.score(), 10);
        assert_eq!(grid.agent(), Position::new(1, 0));
        assert_ne!(grid.target(), grid.agent());
    }
}

#[test]
fn test_captured_state_survives_mutation() {
    let mut grid = GridWorld::seeded(5, 3).unwrap();
    let snapshot = grid.state();
    let agent = snapshot.agent();

    for action in [0, 0, 2, 3, 1, 1, 1] {
        grid.play(action).unwrap();
    }

    assert_eq!(snapshot.agent(), agent);
    assert_eq!(snapshot.score(), 0);
    assert_eq!(snapshot.cells().iter().filter(|&&c| c == Cell::Agent).count(), 1);

    grid.restore(&snapshot).unwrap();
    assert_eq!(grid.state(), snapshot);
}

#[test]
fn test_snapshots_key_the_table() {
    let grid = GridWorld::seeded(5, 8).unwrap();
    let mut table = ActionValueTable::<Snapshot>::new(4, 0.0).unwrap();

    table.update_sample_average(&grid.state(), 1, 3.0).unwrap();
    // A later capture of the same state finds the same row
    assert_eq!(table.estimate(&grid.state(), 1).unwrap(), 3.0);
    assert_eq!(table.len(), 1);
}

#[test]
fn test_q_learning_on_grid_grows_table_monotonically() {
    let rule = UpdateRule::q_learning(0.1, 0.5).unwrap();
    let mut agent =
        Agent::<EpsilonGreedy, Snapshot>::seeded(4, EpsilonGreedy::new(0.1).unwrap(), rule, 11).unwrap();
    let mut grid = GridWorld::seeded(5, 12).unwrap();

    let mut previous = 0;
    for _ in 0..1000 {
        run_episode(&mut agent, &mut grid, 1).unwrap();
        let rows = agent.table().len();
        assert!(rows >= previous);
        previous = rows;
    }
    assert!(agent.table().iter().all(|(_, row)| row.len() == 4));
    assert!(agent.table().len() > 1);
}

#[test]
fn test_cumulative_reward_mode_reports_score() {
    let mut grid = GridWorld::seeded(5, 21)
        .unwrap()
        .with_reward_mode(RewardMode::CumulativeScore);
    for action in [3, 3, 3, 0, 0, 0, 2] {
        let reward = grid.play(action).unwrap();
        assert_eq!(reward, grid.score() as f64);
    }
}

#[test]
fn test_grid_rejects_bad_action() {
    let mut grid = GridWorld::seeded(5, 0).unwrap();
    let before = grid.state();
    assert!(matches!(
        grid.play(4),
        Err(Error::InvalidAction {
            action: 4,
            n_actions: 4
        })
    ));
    assert_eq!(grid.state(), before);
}
