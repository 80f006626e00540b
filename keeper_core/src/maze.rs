use serde::{Deserialize, Serialize};

use crate::{CellKind, Movement, Position, geometry, grid::Grid, sensing::MazeView};

/// Represents errors raised while parsing a text maze.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze text is empty")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell marker '{marker}' at ({row}, {col})")]
    UnknownMarker { marker: char, row: usize, col: usize },

    #[error("expected exactly one keeper start ('@'), found {count}")]
    BadStartCount { count: usize },
}

/// The outcome of applying one movement to the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The keeper moved onto a free cell.
    Moved,
    /// The movement was blocked by a wall or the maze boundary.
    Blocked,
    /// The keeper moved onto a key cell and collected it.
    KeyCollected,
    /// The keeper entered the door holding every key.
    Won,
}

/// An in-memory maze hosting a single keeper.
///
/// This is the harness side of the system: it owns the full grid and answers
/// the keeper's local [`MazeView`] queries without ever exposing more than
/// the 4-neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    cells: Grid<CellKind>,
    keeper: Position,
    keys_found: usize,
    total_keys: usize,
}

impl Maze {
    /// Parses a maze from a text map with one marker per cell:
    /// `#` wall, `.` path, `k` key, `d` door, `@` keeper start.
    ///
    /// All rows must have the same width and exactly one `@` must appear.
    pub fn parse(text: &str) -> Result<Maze, MazeError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(MazeError::Empty);
        }

        let rows = lines.len();
        let cols = lines[0].chars().count();
        let mut cells: Grid<CellKind> = Grid::new(rows, cols);
        let mut starts: Vec<Position> = Vec::new();
        let mut total_keys = 0;

        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != cols {
                return Err(MazeError::RaggedRow {
                    row,
                    expected: cols,
                    found: width,
                });
            }

            for (col, marker) in line.chars().enumerate() {
                let position = Position::new(row as i32, col as i32);
                let kind = match marker {
                    '#' => CellKind::Wall,
                    '.' => CellKind::Path,
                    'k' => {
                        total_keys += 1;
                        CellKind::Key
                    }
                    'd' => CellKind::Door,
                    '@' => {
                        starts.push(position);
                        CellKind::Path
                    }
                    unknown => {
                        return Err(MazeError::UnknownMarker {
                            marker: unknown,
                            row,
                            col,
                        });
                    }
                };
                cells[position] = kind;
            }
        }

        if starts.len() != 1 {
            return Err(MazeError::BadStartCount {
                count: starts.len(),
            });
        }

        Ok(Maze {
            cells,
            keeper: starts[0],
            keys_found: 0,
            total_keys,
        })
    }

    /// Applies one movement to the maze state.
    ///
    /// Keys are collected on entry and their cell becomes path. The keeper
    /// may stand on the door at any time, but entering it only wins once
    /// every key has been collected.
    pub fn apply(&mut self, movement: Movement) -> TurnOutcome {
        let target = geometry::position_after(movement, self.keeper);
        if target == self.keeper {
            return TurnOutcome::Moved;
        }

        match self.cells.get(target).copied() {
            None | Some(CellKind::Wall) => TurnOutcome::Blocked,
            Some(CellKind::Path) => {
                self.keeper = target;
                TurnOutcome::Moved
            }
            Some(CellKind::Key) => {
                self.cells[target] = CellKind::Path;
                self.keys_found += 1;
                self.keeper = target;
                TurnOutcome::KeyCollected
            }
            Some(CellKind::Door) => {
                self.keeper = target;
                if self.keys_found == self.total_keys {
                    TurnOutcome::Won
                } else {
                    TurnOutcome::Moved
                }
            }
        }
    }

    pub fn cells(&self) -> &Grid<CellKind> {
        &self.cells
    }

    pub fn keeper(&self) -> Position {
        self.keeper
    }
}

impl MazeView for Maze {
    fn look(&self, direction: Movement) -> CellKind {
        let target = geometry::position_after(direction, self.keeper);
        // Outside the grid reads as wall, so the keeper can never leave.
        self.cells.get(target).copied().unwrap_or(CellKind::Wall)
    }

    fn keeper_position(&self) -> Position {
        self.keeper
    }

    fn keys_found(&self) -> usize {
        self.keys_found
    }

    fn total_keys(&self) -> usize {
        self.total_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_MAZE: &str = "
        #####
        #@k.#
        #.#d#
        #####
    ";

    #[test]
    fn parse_counts_keys_and_finds_start() {
        let maze = Maze::parse(SMALL_MAZE).unwrap();
        assert_eq!(maze.keeper(), Position::new(1, 1));
        assert_eq!(maze.total_keys(), 1);
        assert_eq!(maze.keys_found(), 0);
        assert_eq!(maze.cells()[Position::new(2, 3)], CellKind::Door);
    }

    #[test]
    fn parse_rejects_empty_text() {
        assert_eq!(Maze::parse("  \n  "), Err(MazeError::Empty));
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let result = Maze::parse("###\n#@##\n###");
        assert_eq!(
            result,
            Err(MazeError::RaggedRow {
                row: 1,
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn parse_rejects_unknown_markers() {
        let result = Maze::parse("###\n#X#\n###");
        assert_eq!(
            result,
            Err(MazeError::UnknownMarker {
                marker: 'X',
                row: 1,
                col: 1
            })
        );
    }

    #[test]
    fn parse_requires_exactly_one_start() {
        assert_eq!(
            Maze::parse("###\n#.#\n###"),
            Err(MazeError::BadStartCount { count: 0 })
        );
        assert_eq!(
            Maze::parse("####\n#@@#\n####"),
            Err(MazeError::BadStartCount { count: 2 })
        );
    }

    #[test]
    fn walls_block_movement() {
        let mut maze = Maze::parse(SMALL_MAZE).unwrap();
        assert_eq!(maze.apply(Movement::Up), TurnOutcome::Blocked);
        assert_eq!(maze.keeper(), Position::new(1, 1));
    }

    #[test]
    fn keys_are_collected_on_entry() {
        let mut maze = Maze::parse(SMALL_MAZE).unwrap();
        assert_eq!(maze.apply(Movement::Right), TurnOutcome::KeyCollected);
        assert_eq!(maze.keys_found(), 1);
        assert_eq!(maze.cells()[Position::new(1, 2)], CellKind::Path);
    }

    #[test]
    fn door_without_keys_is_not_a_win() {
        let mut maze = Maze::parse("######\n#@.dk#\n######").unwrap();
        assert_eq!(maze.apply(Movement::Right), TurnOutcome::Moved);
        assert_eq!(maze.apply(Movement::Right), TurnOutcome::Moved);
        assert_eq!(maze.keeper(), Position::new(1, 3));
        assert_eq!(maze.keys_found(), 0);
    }

    #[test]
    fn door_with_all_keys_wins() {
        let mut maze = Maze::parse(SMALL_MAZE).unwrap();
        assert_eq!(maze.apply(Movement::Right), TurnOutcome::KeyCollected);
        assert_eq!(maze.apply(Movement::Right), TurnOutcome::Moved);
        assert_eq!(maze.apply(Movement::Down), TurnOutcome::Won);
    }

    #[test]
    fn looking_outside_the_grid_reads_as_wall() {
        let maze = Maze::parse("@.\n..").unwrap();
        assert_eq!(maze.look(Movement::Up), CellKind::Wall);
        assert_eq!(maze.look(Movement::Left), CellKind::Wall);
        assert_eq!(maze.look(Movement::Right), CellKind::Path);
    }
}
