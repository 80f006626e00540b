use crate::{Movement, Position, SearchError};

/// Returns the position reached by applying `movement` to `position`.
///
/// Down increments the row, up decrements it; right increments the column,
/// left decrements it. `Wait` leaves the position unchanged.
pub fn position_after(movement: Movement, position: Position) -> Position {
    match movement {
        Movement::Down => Position::new(position.row + 1, position.col),
        Movement::Up => Position::new(position.row - 1, position.col),
        Movement::Left => Position::new(position.row, position.col - 1),
        Movement::Right => Position::new(position.row, position.col + 1),
        Movement::Wait => position,
    }
}

/// Returns the movement in `allowed` that takes `from` to `to`.
///
/// Fails with [`SearchError::NoMovementExists`] when the two positions are
/// not neighbors under the allowed movement set.
pub fn movement_between(
    from: Position,
    to: Position,
    allowed: &[Movement],
) -> Result<Movement, SearchError> {
    allowed
        .iter()
        .copied()
        .find(|&movement| position_after(movement, from) == to)
        .ok_or(SearchError::NoMovementExists { from, to })
}
