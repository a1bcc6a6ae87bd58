//! Toroidal grid world with a single target ("Snake" without a tail).

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::env::RewardSource;
use crate::error::{Error, Result};

/// Score change for leaving the grid through an edge.
pub const WRAP_PENALTY: i64 = -10;

/// Score change for reaching the target.
pub const TARGET_BONUS: i64 = 10;

/// The four moves, in action-index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ];

    /// Maps an action index to its move.
    pub fn from_index(action: usize) -> Result<Self> {
        Error::check_action(action, Self::ALL.len())?;
        Ok(Self::ALL[action])
    }

    /// Action index of the move.
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Right => 2,
            Direction::Left => 3,
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
        }
    }
}

/// Column `x` and row `y`; row 0 is the top edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Occupancy of one grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Agent,
    Target,
}

/// Which reward [`GridWorld`] reports through [`RewardSource::play`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    /// Score change caused by the step.
    #[default]
    StepDelta,
    /// Running score after the step.
    CumulativeScore,
}

/// Immutable, hashable copy of everything that defines a grid-world state.
///
/// Two snapshots with the same fields compare and hash equal no matter when
/// they were captured, so they can key an action-value table directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot {
    size: usize,
    agent: Position,
    heading: Direction,
    target: Position,
    score: i64,
    cells: Box<[Cell]>,
}

impl Snapshot {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Square toroidal grid with one agent and one target.
///
/// Moving off an edge re-enters on the opposite edge and costs
/// [`WRAP_PENALTY`]. Reaching the target earns [`TARGET_BONUS`] and moves the
/// target to a uniformly chosen cell other than the agent's. Target
/// placement draws from `R`, which defaults to [`StdRng`].
#[derive(Clone, Debug)]
pub struct GridWorld<R = StdRng> {
    size: usize,
    agent: Position,
    heading: Direction,
    target: Position,
    score: i64,
    cells: Vec<Cell>,
    reward_mode: RewardMode,
    rng: R,
}

impl GridWorld {
    pub fn seeded(size: usize, seed: u64) -> Result<Self> {
        Self::new(size, StdRng::seed_from_u64(seed))
    }
}

impl<R> GridWorld<R>
where
    R: RngCore,
{
    /// Creates a `size`×`size` grid with the agent in the center heading right
    /// and the target on a random free cell.
    pub fn new(size: usize, mut rng: R) -> Result<Self> {
        check_size(size)?;
        let agent = Position::new(size / 2, size / 2);
        let target = random_free_cell(size, agent, &mut rng);
        Self::with_layout(size, agent, target, rng)
    }

    /// Creates a grid with explicit agent and target positions.
    pub fn with_layout(size: usize, agent: Position, target: Position, rng: R) -> Result<Self> {
        check_size(size)?;
        for (name, position) in [("agent", agent), ("target", target)] {
            if position.x >= size || position.y >= size {
                return Err(Error::config(format!(
                    "{name} position ({}, {}) lies outside a {size}x{size} grid",
                    position.x, position.y
                )));
            }
        }
        if agent == target {
            return Err(Error::config("agent and target must occupy different cells"));
        }

        let mut world = Self {
            size,
            agent,
            heading: Direction::Right,
            target,
            score: 0,
            cells: vec![Cell::Empty; size * size],
            reward_mode: RewardMode::default(),
            rng,
        };
        let agent_index = world.index(agent);
        let target_index = world.index(target);
        world.cells[agent_index] = Cell::Agent;
        world.cells[target_index] = Cell::Target;
        Ok(world)
    }

    #[must_use]
    pub fn with_reward_mode(mut self, reward_mode: RewardMode) -> Self {
        self.reward_mode = reward_mode;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn reward_mode(&self) -> RewardMode {
        self.reward_mode
    }

    /// Occupancy of column `x`, row `y`, or `None` outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.size && y < self.size).then(|| self.cells[y * self.size + x])
    }

    /// Turns toward `direction`, moves one cell and returns the score change.
    pub fn step(&mut self, direction: Direction) -> i64 {
        self.heading = direction;
        self.advance()
    }

    /// Moves one cell along the current heading and returns the score change.
    pub fn advance(&mut self) -> i64 {
        let before = self.score;
        let (dx, dy) = self.heading.delta();
        let (x, x_wrapped) = wrap(self.agent.x, dx, self.size);
        let (y, y_wrapped) = wrap(self.agent.y, dy, self.size);
        if x_wrapped || y_wrapped {
            self.score += WRAP_PENALTY;
            debug!(x, y, score = self.score, "wrapped around edge");
        }

        let old_index = self.index(self.agent);
        self.cells[old_index] = Cell::Empty;
        self.agent = Position::new(x, y);

        if self.agent == self.target {
            self.score += TARGET_BONUS;
            self.relocate_target();
        }

        let new_index = self.index(self.agent);
        self.cells[new_index] = Cell::Agent;
        self.score - before
    }

    /// Deep copy of the current state.
    pub fn capture(&self) -> Snapshot {
        Snapshot {
            size: self.size,
            agent: self.agent,
            heading: self.heading,
            target: self.target,
            score: self.score,
            cells: self.cells.clone().into_boxed_slice(),
        }
    }

    /// Overwrites the current state with an independent copy of `snapshot`.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.size != self.size {
            return Err(Error::config(format!(
                "cannot restore a {}x{} snapshot into a {}x{} grid",
                snapshot.size, snapshot.size, self.size, self.size
            )));
        }
        self.agent = snapshot.agent;
        self.heading = snapshot.heading;
        self.target = snapshot.target;
        self.score = snapshot.score;
        self.cells = snapshot.cells.to_vec();
        Ok(())
    }

    fn index(&self, position: Position) -> usize {
        position.y * self.size + position.x
    }

    fn relocate_target(&mut self) {
        self.target = random_free_cell(self.size, self.agent, &mut self.rng);
        let index = self.index(self.target);
        self.cells[index] = Cell::Target;
        debug!(x = self.target.x, y = self.target.y, score = self.score, "target reached");
    }
}

impl<R> RewardSource for GridWorld<R>
where
    R: RngCore,
{
    type State = Snapshot;

    fn n_actions(&self) -> usize {
        Direction::ALL.len()
    }

    fn state(&self) -> Self::State {
        self.capture()
    }

    fn play(&mut self, action: usize) -> Result<f64> {
        let delta = self.step(Direction::from_index(action)?);
        Ok(match self.reward_mode {
            RewardMode::StepDelta => delta as f64,
            RewardMode::CumulativeScore => self.score as f64,
        })
    }
}

fn check_size(size: usize) -> Result<()> {
    if size < 2 {
        return Err(Error::config(format!(
            "grid side must be at least 2, got {size}"
        )));
    }
    Ok(())
}

/// Moves `coord` by `delta` on a ring of `size` cells; reports whether it wrapped.
fn wrap(coord: usize, delta: isize, size: usize) -> (usize, bool) {
    let moved = coord as isize + delta;
    if moved < 0 {
        (size - 1, true)
    } else if moved as usize >= size {
        (0, true)
    } else {
        (moved as usize, false)
    }
}

/// Uniform draw over every cell except `occupied`.
fn random_free_cell(size: usize, occupied: Position, rng: &mut dyn RngCore) -> Position {
    let occupied_index = occupied.y * size + occupied.x;
    let mut index = rng.random_range(0..size * size - 1);
    if index >= occupied_index {
        index += 1;
    }
    Position::new(index % size, index / size)
}
