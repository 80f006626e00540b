use std::collections::VecDeque;

use crate::{Movement, SearchError, explore::Explorer, planner, sensing::MazeView};

/// Trait defining the behavior of a keeper.
/// A keeper decides one movement per game tick from its view of the maze.
pub trait Keeper {
    /// Decides the next movement. `&mut self` lets the keeper maintain
    /// internal state for decision making (visited cells, a queued path).
    fn decide(&mut self, view: &dyn MazeView) -> Result<Movement, SearchError>;
}

/// The two-phase maze-solving keeper.
///
/// While the door is unknown or keys are missing it explores depth-first;
/// once the door is known and every key is held it plans an optimal path
/// through the visited cells and replays it one movement per tick.
#[derive(Debug)]
pub struct KeeperAi {
    explorer: Explorer,
    path_to_door: VecDeque<Movement>,
    following_path: bool,
}

impl KeeperAi {
    pub fn new(seed: u64) -> Self {
        Self {
            explorer: Explorer::new(seed),
            path_to_door: VecDeque::new(),
            following_path: false,
        }
    }

    /// Whether the keeper has switched from exploring to path following.
    pub fn is_following_path(&self) -> bool {
        self.following_path
    }

    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }
}

impl Keeper for KeeperAi {
    fn decide(&mut self, view: &dyn MazeView) -> Result<Movement, SearchError> {
        self.explorer.record_visit(view.keeper_position());

        if self.following_path {
            // The switch to path following is permanent; once the path is
            // spent the keeper idles.
            return Ok(self.path_to_door.pop_front().unwrap_or(Movement::Wait));
        }

        if let Some(door) = self.explorer.door_position() {
            if view.keys_found() == view.total_keys() {
                match planner::plan_path(
                    view.keeper_position(),
                    door,
                    self.explorer.visited(),
                    self.explorer.allowed_movements(),
                ) {
                    Ok(path) => {
                        self.path_to_door = path.into();
                        self.following_path = true;
                        return Ok(self.path_to_door.pop_front().unwrap_or(Movement::Wait));
                    }
                    // The door has only been seen from afar; the visited
                    // graph does not reach it yet. Keep exploring.
                    Err(SearchError::NoPathFound { .. }) => {}
                    Err(other) => return Err(other),
                }
            }
        }

        self.explorer.next_movement(view)
    }
}
