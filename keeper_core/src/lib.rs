use serde::{Deserialize, Serialize};

pub mod explore;
pub mod geometry;
pub mod grid;
pub mod keeper;
pub mod maze;
pub mod planner;
pub mod sensing;

/// Represents a maze cell coordinate as a (row, column) pair.
///
/// Coordinates are signed: the search core never assumes a bounded grid,
/// only the maze harness does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to `other`.
    pub fn distance_to(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// One atomic action the keeper can take on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    Up,
    Down,
    Left,
    Right,
    /// The no-op movement: stay in place.
    Wait,
}

impl Movement {
    /// The four cardinal movements, in the order the keeper considers them.
    /// Priority tie-breaks depend on this order.
    pub const CARDINAL: [Movement; 4] = [
        Movement::Down,
        Movement::Left,
        Movement::Right,
        Movement::Up,
    ];

    /// The movement that undoes this one.
    pub fn inverse(self) -> Movement {
        match self {
            Movement::Up => Movement::Down,
            Movement::Down => Movement::Up,
            Movement::Left => Movement::Right,
            Movement::Right => Movement::Left,
            Movement::Wait => Movement::Wait,
        }
    }
}

/// What occupies a sensed maze cell. Walls are never traversable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Path,
    Wall,
    Door,
    Key,
}

/// Failures of the search core. All of these signal invariant violations or
/// an unwinnable maze, not conditions to recover from within the core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no movement leads from ({}, {}) to ({}, {})", .from.row, .from.col, .to.row, .to.col)]
    NoMovementExists { from: Position, to: Position },

    #[error("every reachable cell has been visited without a winning configuration")]
    ExplorationExhausted,

    #[error("no path through visited cells connects ({}, {}) to ({}, {})", .start.row, .start.col, .goal.row, .goal.col)]
    NoPathFound { start: Position, goal: Position },
}
