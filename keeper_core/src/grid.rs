use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::Position;

/// Represents errors that can occur within grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("position ({row}, {col}) is out of bounds for grid size ({rows}, {cols})")]
    OutOfBounds {
        row: i32,
        col: i32,
        rows: usize,
        cols: usize,
    },
}

/// A generic 2D grid addressed by [`Position`].
///
/// Stores elements of type `T` in a flat vector in row-major order. Lookups
/// with negative or out-of-range coordinates return `None` rather than
/// panicking, since the search core works in unbounded coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a grid of the given dimensions filled with default values.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn new(rows: usize, cols: usize) -> Self
    where
        T: Default + Clone,
    {
        let size = rows.checked_mul(cols).expect("Grid size overflow");
        Grid {
            rows,
            cols,
            cells: vec![T::default(); size],
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Converts a position to a flat vector index, or `None` when it lies
    /// outside the grid.
    #[inline]
    fn index_of(&self, position: Position) -> Option<usize> {
        if position.row < 0 || position.col < 0 {
            return None;
        }
        let (row, col) = (position.row as usize, position.col as usize);
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    /// Gets the cell at `position`, or `None` when out of bounds.
    pub fn get(&self, position: Position) -> Option<&T> {
        self.index_of(position).map(|index| &self.cells[index])
    }

    /// Sets the cell at `position`.
    ///
    /// Returns `Err(GridError::OutOfBounds)` when the position is invalid.
    pub fn set(&mut self, position: Position, value: T) -> Result<(), GridError> {
        let index = self.index_of(position).ok_or(GridError::OutOfBounds {
            row: position.row,
            col: position.col,
            rows: self.rows,
            cols: self.cols,
        })?;
        self.cells[index] = value;
        Ok(())
    }

    /// Returns an iterator yielding `(Position, &T)` in row-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = (Position, &T)> {
        self.cells.iter().enumerate().map(|(index, cell)| {
            let row = (index / self.cols) as i32;
            let col = (index % self.cols) as i32;
            (Position::new(row, col), cell)
        })
    }
}

/// Allows indexing the grid by `Position` for immutable access.
impl<T> Index<Position> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, position: Position) -> &Self::Output {
        match self.index_of(position) {
            Some(index) => &self.cells[index],
            None => panic!(
                "Grid index ({}, {}) out of bounds for grid size ({}, {})",
                position.row, position.col, self.rows, self.cols
            ),
        }
    }
}

/// Allows indexing the grid by `Position` for mutable access.
impl<T> IndexMut<Position> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, position: Position) -> &mut Self::Output {
        let (rows, cols) = (self.rows, self.cols);
        match self.index_of(position) {
            Some(index) => &mut self.cells[index],
            None => panic!(
                "Grid index ({}, {}) out of bounds for grid size ({}, {})",
                position.row, position.col, rows, cols
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_set_in_bounds() {
        let mut grid: Grid<u8> = Grid::new(2, 3);
        let pos = Position::new(1, 2);
        assert_eq!(grid.get(pos), Some(&0));
        grid.set(pos, 9).unwrap();
        assert_eq!(grid[pos], 9);
    }

    #[test]
    fn negative_and_out_of_range_positions_are_none() {
        let grid: Grid<u8> = Grid::new(2, 3);
        assert_eq!(grid.get(Position::new(-1, 0)), None);
        assert_eq!(grid.get(Position::new(0, -1)), None);
        assert_eq!(grid.get(Position::new(2, 0)), None);
        assert_eq!(grid.get(Position::new(0, 3)), None);
    }

    #[test]
    fn set_out_of_bounds_errors() {
        let mut grid: Grid<u8> = Grid::new(2, 2);
        assert_eq!(
            grid.set(Position::new(5, 5), 1),
            Err(GridError::OutOfBounds {
                row: 5,
                col: 5,
                rows: 2,
                cols: 2
            })
        );
    }

    #[test]
    fn enumerate_is_row_major() {
        let grid: Grid<u8> = Grid::new(2, 2);
        let positions: Vec<Position> = grid.enumerate().map(|(pos, _)| pos).collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1)
            ]
        );
    }
}
