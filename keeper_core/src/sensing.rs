use crate::{CellKind, Movement, Position, geometry};

/// Read-only observer capability over the maze, scoped to the keeper's
/// current 4-neighborhood. The search core never sees more of the maze than
/// this per turn.
pub trait MazeView {
    /// The kind of cell one step in `direction` from the keeper.
    /// `Wait` looks at the cell the keeper stands on.
    fn look(&self, direction: Movement) -> CellKind;

    /// The keeper's current position.
    fn keeper_position(&self) -> Position;

    /// Number of keys collected so far.
    fn keys_found(&self) -> usize;

    /// Number of keys the maze requires before the door opens.
    fn total_keys(&self) -> usize;
}

/// Allowed movements whose sensed cell can be entered: path, key or door,
/// never a wall.
pub fn reachable_movements<V: MazeView + ?Sized>(view: &V, allowed: &[Movement]) -> Vec<Movement> {
    allowed
        .iter()
        .copied()
        .filter(|&movement| view.look(movement) != CellKind::Wall)
        .collect()
}

/// Positions adjacent to the keeper that [`reachable_movements`] lead to.
pub fn reachable_positions<V: MazeView + ?Sized>(view: &V, allowed: &[Movement]) -> Vec<Position> {
    let current = view.keeper_position();
    reachable_movements(view, allowed)
        .into_iter()
        .map(|movement| geometry::position_after(movement, current))
        .collect()
}

/// The best immediately visible opportunity, if any: a movement onto an
/// adjacent door while the door position is still unknown, otherwise a
/// movement onto an adjacent key while keys remain uncollected.
///
/// The first match in `allowed` order wins, so the allowed-movement
/// enumeration order is the tie-break.
pub fn priority_movement<V: MazeView + ?Sized>(
    view: &V,
    allowed: &[Movement],
    known_door: Option<Position>,
) -> Option<Movement> {
    let open = reachable_movements(view, allowed);

    if known_door.is_none() {
        if let Some(movement) = open
            .iter()
            .copied()
            .find(|&movement| view.look(movement) == CellKind::Door)
        {
            return Some(movement);
        }
    }

    if view.keys_found() != view.total_keys() {
        return open
            .iter()
            .copied()
            .find(|&movement| view.look(movement) == CellKind::Key);
    }

    None
}

/// The position of the first adjacent door, if one is in view.
pub fn door_position<V: MazeView + ?Sized>(view: &V, allowed: &[Movement]) -> Option<Position> {
    allowed
        .iter()
        .copied()
        .find(|&movement| view.look(movement) == CellKind::Door)
        .map(|movement| geometry::position_after(movement, view.keeper_position()))
}
