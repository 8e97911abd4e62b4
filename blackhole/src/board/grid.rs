//! Storage for the cells of a [`Board`][crate::board::Board].

use std::ops::Index;

use crate::board::{Cell, Coordinate, TableSize};

/// Row-major cell storage with a fixed size.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(super) struct Grid {
    /// Size of this grid.
    pub(super) size: TableSize,
    /// Cells that make up this grid.
    pub(super) cells: Box<[Cell]>,
}

impl Grid {
    pub(super) fn new(size: TableSize) -> Self {
        let cells = (0..size.total_size()).map(|_| Cell::default()).collect();
        Self { size, cells }
    }

    /// Build a grid from existing cells. Returns `None` if the length is wrong for the
    /// size.
    pub(super) fn from_cells(size: TableSize, cells: Vec<Cell>) -> Option<Self> {
        if cells.len() == size.total_size() {
            Some(Self {
                size,
                cells: cells.into_boxed_slice(),
            })
        } else {
            None
        }
    }

    /// Get a reference to the cell at the given [`Coordinate`].
    pub(super) fn get(&self, coord: Coordinate) -> Option<&Cell> {
        self.size
            .try_linearize(coord)
            .and_then(|i| self.cells.get(i))
    }

    /// Get a mutable reference to the cell at the given [`Coordinate`].
    pub(super) fn get_mut(&mut self, coord: Coordinate) -> Option<&mut Cell> {
        self.size
            .try_linearize(coord)
            .and_then(move |i| self.cells.get_mut(i))
    }
}

impl Index<Coordinate> for Grid {
    type Output = Cell;

    fn index(&self, coord: Coordinate) -> &Self::Output {
        self.get(coord).expect("coordinate out of bounds")
    }
}
