use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Movement, Position, SearchError, geometry, sensing, sensing::MazeView};

/// Depth-first exploratory traversal with backtracking.
///
/// The explorer decides one movement per turn. It keeps every position the
/// keeper has occupied and a stack of branch points; when no unvisited
/// neighbor remains it retreats one stack entry at a time. Popping the stack
/// with no retreat target left means the reachable maze has been fully
/// enumerated without success.
#[derive(Debug)]
pub struct Explorer {
    allowed: Vec<Movement>,
    visited: Vec<Position>,
    open_path: Vec<Position>,
    door: Option<Position>,
    rng: StdRng,
}

impl Explorer {
    /// Creates an explorer over the four cardinal movements.
    pub fn new(seed: u64) -> Self {
        Self::with_movements(Movement::CARDINAL.to_vec(), seed)
    }

    /// Creates an explorer restricted to `allowed` movements. Their order is
    /// the priority tie-break.
    pub fn with_movements(allowed: Vec<Movement>, seed: u64) -> Self {
        Self {
            allowed,
            visited: Vec::new(),
            open_path: Vec::new(),
            door: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Records `position` as physically occupied. Called by the driver once
    /// per turn taken, backtrack steps included; duplicates are expected.
    pub fn record_visit(&mut self, position: Position) {
        self.visited.push(position);
    }

    /// The door position, once one has been sensed. Single-assignment.
    pub fn door_position(&self) -> Option<Position> {
        self.door
    }

    /// Every position the keeper has occupied so far, in visit order.
    pub fn visited(&self) -> &[Position] {
        &self.visited
    }

    /// The backtracking stack: unresolved branch points, bottom-to-top a
    /// simple path from the start to the keeper's current position.
    pub fn open_path(&self) -> &[Position] {
        &self.open_path
    }

    pub fn allowed_movements(&self) -> &[Movement] {
        &self.allowed
    }

    /// Decides the next movement from the keeper's current view.
    ///
    /// Either advances into a neighbor not yet visited, or retreats along
    /// the most recent branch point. Fails with
    /// [`SearchError::ExplorationExhausted`] when neither is possible.
    pub fn next_movement<V: MazeView + ?Sized>(&mut self, view: &V) -> Result<Movement, SearchError> {
        let current = view.keeper_position();

        let mut frontier = sensing::reachable_positions(view, &self.allowed);
        frontier.retain(|position| !self.visited.contains(position));

        if frontier.is_empty() {
            // Dead end: retreat one step along the recorded branch path.
            let target = self
                .open_path
                .pop()
                .ok_or(SearchError::ExplorationExhausted)?;
            return geometry::movement_between(current, target, &self.allowed);
        }

        // There is a choice here; remember it for backtracking.
        self.open_path.push(current);

        let candidates: Vec<Movement> = sensing::reachable_movements(view, &self.allowed)
            .into_iter()
            .filter(|&movement| {
                !self
                    .visited
                    .contains(&geometry::position_after(movement, current))
            })
            .collect();

        if self.door.is_none() {
            self.door = sensing::door_position(view, &self.allowed);
        }

        // Grab an adjacent unexplored key or door before choosing at random.
        if let Some(movement) = sensing::priority_movement(view, &self.allowed, self.door) {
            return Ok(movement);
        }

        let choice = self.rng.random_range(0..candidates.len());
        Ok(candidates[choice])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Maze;

    /// Drives the explorer on a live maze for one turn: record the current
    /// position, decide, apply.
    fn step(explorer: &mut Explorer, maze: &mut Maze) -> Result<Movement, SearchError> {
        explorer.record_visit(maze.keeper_position());
        let movement = explorer.next_movement(maze)?;
        maze.apply(movement);
        Ok(movement)
    }

    #[test]
    fn corridor_is_walked_out_and_back() {
        let mut maze = Maze::parse("#####\n#@..#\n#####").unwrap();
        let mut explorer = Explorer::new(7);

        // Forced forward along the corridor, then backtracked to the start.
        assert_eq!(step(&mut explorer, &mut maze), Ok(Movement::Right));
        assert_eq!(step(&mut explorer, &mut maze), Ok(Movement::Right));
        assert_eq!(step(&mut explorer, &mut maze), Ok(Movement::Left));
        assert_eq!(step(&mut explorer, &mut maze), Ok(Movement::Left));

        // Back at the start with nothing left to explore.
        assert_eq!(
            step(&mut explorer, &mut maze),
            Err(SearchError::ExplorationExhausted)
        );
    }

    #[test]
    fn sealed_cell_is_exhausted_immediately() {
        let mut maze = Maze::parse("###\n#@#\n###").unwrap();
        let mut explorer = Explorer::new(0);
        assert_eq!(
            step(&mut explorer, &mut maze),
            Err(SearchError::ExplorationExhausted)
        );
    }

    #[test]
    fn adjacent_key_is_taken_before_random_choice() {
        // Both neighbors are unvisited; the key must win regardless of seed.
        for seed in 0..16 {
            let mut maze = Maze::parse("#####\n#.@k#\n#####").unwrap();
            let mut explorer = Explorer::new(seed);
            assert_eq!(step(&mut explorer, &mut maze), Ok(Movement::Right));
            assert_eq!(maze.keys_found(), 1);
        }
    }

    #[test]
    fn door_position_is_recorded_once_sensed() {
        let mut maze = Maze::parse("#####\n#@.d#\n#####").unwrap();
        let mut explorer = Explorer::new(3);
        assert_eq!(explorer.door_position(), None);

        step(&mut explorer, &mut maze).unwrap();
        step(&mut explorer, &mut maze).unwrap();
        assert_eq!(explorer.door_position(), Some(Position::new(1, 3)));
    }

    #[test]
    fn fresh_moves_never_revisit() {
        // A maze with branches and dead ends. Every non-backtrack movement
        // must target a position not yet visited at decision time.
        let text = "
            ########
            #@...#.#
            #.##...#
            #....#.#
            ########
        ";
        let mut maze = Maze::parse(text).unwrap();
        let mut explorer = Explorer::new(11);
        let mut fresh_targets: Vec<Position> = Vec::new();

        loop {
            explorer.record_visit(maze.keeper_position());
            let before: Vec<Position> = explorer.visited().to_vec();
            let current = maze.keeper_position();
            let movement = match explorer.next_movement(&maze) {
                Ok(movement) => movement,
                Err(SearchError::ExplorationExhausted) => break,
                Err(other) => panic!("unexpected error: {other}"),
            };
            let target = geometry::position_after(movement, current);
            if !before.contains(&target) {
                assert!(
                    !fresh_targets.contains(&target),
                    "{target:?} entered fresh twice"
                );
                fresh_targets.push(target);
            }

            // The stack must stay a simple path of adjacent steps.
            let stack = explorer.open_path();
            for window in stack.windows(2) {
                assert_eq!(window[0].distance_to(window[1]), 1);
            }
            for (i, a) in stack.iter().enumerate() {
                assert!(!stack[i + 1..].contains(a), "stack repeats {a:?}");
            }

            maze.apply(movement);
        }
    }
}
