use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::{Movement, Position, SearchError, geometry};

/// A single A* search node.
///
/// Nodes live in an arena (`Vec<Node>`) and link to their parent by index;
/// the chain is only ever walked backwards, for path reconstruction.
#[derive(Debug, Clone)]
struct Node {
    position: Position,
    /// The movement taken to arrive at this node.
    movement: Movement,
    parent: Option<usize>,
    /// Cost from the start node to this node.
    g_cost: u32,
    /// Manhattan estimate from this node to the goal.
    h_cost: u32,
}

impl Node {
    fn f_cost(&self) -> u32 {
        self.g_cost + self.h_cost
    }
}

/// Open-set entry, ordered for a min-heap on (f, h, insertion order).
///
/// Cost ties break toward the lower heuristic, then toward the earlier
/// arena index, so expansion order is a deterministic total order.
#[derive(Debug, PartialEq, Eq)]
struct OpenEntry {
    f_cost: u32,
    h_cost: u32,
    index: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f_cost
            .cmp(&self.f_cost)
            .then(other.h_cost.cmp(&self.h_cost))
            .then(other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Computes the minimum-cost movement sequence from `start` to `goal`
/// through the graph induced by 4-connectivity over `visited` positions.
///
/// Only visited cells are candidate nodes: the planner never explores
/// unknown territory. Edge cost is 1 per movement and the heuristic is the
/// Manhattan distance, so the first time the goal is popped the path is
/// optimal. A neighbor already in the open set is not re-relaxed; under
/// unit edge costs a later discovery in f-order cannot be strictly cheaper,
/// so this is a deliberate simplification rather than a correctness gap.
///
/// Fails with [`SearchError::NoPathFound`] when the visited set does not
/// connect `start` to `goal`.
pub fn plan_path(
    start: Position,
    goal: Position,
    visited: &[Position],
    allowed: &[Movement],
) -> Result<Vec<Movement>, SearchError> {
    let traversable: HashSet<Position> = visited.iter().copied().collect();

    let mut arena: Vec<Node> = Vec::new();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut open_positions: HashSet<Position> = HashSet::new();
    let mut closed: HashSet<Position> = HashSet::new();

    arena.push(Node {
        position: start,
        movement: Movement::Wait,
        parent: None,
        g_cost: 0,
        h_cost: start.distance_to(goal),
    });
    open.push(OpenEntry {
        f_cost: arena[0].f_cost(),
        h_cost: arena[0].h_cost,
        index: 0,
    });
    open_positions.insert(start);

    while let Some(OpenEntry { index, .. }) = open.pop() {
        let (current, g_cost) = {
            let node = &arena[index];
            (node.position, node.g_cost)
        };
        open_positions.remove(&current);
        closed.insert(current);

        if current == goal {
            return Ok(reconstruct(&arena, index));
        }

        for &movement in allowed {
            let next = geometry::position_after(movement, current);
            if !traversable.contains(&next) {
                continue;
            }
            if closed.contains(&next) || open_positions.contains(&next) {
                continue;
            }

            let node = Node {
                position: next,
                movement,
                parent: Some(index),
                g_cost: g_cost + 1,
                h_cost: next.distance_to(goal),
            };
            let entry = OpenEntry {
                f_cost: node.f_cost(),
                h_cost: node.h_cost,
                index: arena.len(),
            };
            arena.push(node);
            open_positions.insert(next);
            open.push(entry);
        }
    }

    Err(SearchError::NoPathFound { start, goal })
}

/// Walks parent indices from the goal node back to the start, collecting the
/// recorded movements in forward order.
fn reconstruct(arena: &[Node], goal_index: usize) -> Vec<Movement> {
    let mut movements = Vec::new();
    let mut index = goal_index;
    while let Some(parent) = arena[index].parent {
        movements.push(arena[index].movement);
        index = parent;
    }
    movements.reverse();
    movements
}
