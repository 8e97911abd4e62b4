//! Types that make up the game board.

use std::fmt;

use crate::game::Player;

use self::grid::Grid;
pub use self::{
    coordinate::Coordinate,
    dimensions::{Direction, Neighbors, TableSize},
    errors::TableSizeError,
};

mod coordinate;
mod dimensions;
mod errors;
mod grid;

/// Content of a single cell on the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Cell {
    /// Nobody has claimed or collapsed this cell yet.
    Empty,
    /// The cell was claimed by the given player.
    Marked(Player),
    /// The cell collapsed into a black hole and can no longer be used.
    BlackHole,
}

impl Cell {
    /// Returns true if the cell is still free.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Get the player who claimed this cell, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Marked(player) => Some(player),
            Cell::Empty | Cell::BlackHole => None,
        }
    }

    /// Single character token used for this cell in save files and terminal output.
    pub fn token(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Marked(Player::First) => 'r',
            Cell::Marked(Player::Second) => 'b',
            Cell::BlackHole => '#',
        }
    }

    /// Parse a cell from its token. Returns `None` for unknown tokens.
    pub fn from_token(token: char) -> Option<Self> {
        match token {
            '.' => Some(Cell::Empty),
            'r' => Some(Cell::Marked(Player::First)),
            'b' => Some(Cell::Marked(Player::Second)),
            '#' => Some(Cell::BlackHole),
            _ => None,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl fmt::Display for Cell {
    /// Displays the colour of the cell: white, red, blue or black.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Cell::Empty => "white",
            Cell::Marked(player) => player.colour(),
            Cell::BlackHole => "black",
        })
    }
}

/// Square game board. Cells only ever move away from [`Cell::Empty`]; the board offers
/// no way to clear a cell once it was set.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Board {
    grid: Grid,
}

impl Board {
    /// Create a board of the given size with every cell empty.
    pub fn new(size: TableSize) -> Self {
        Self {
            grid: Grid::new(size),
        }
    }

    /// Build a board from row-major cells. Returns `None` if the number of cells doesn't
    /// match the size.
    pub(crate) fn from_cells(size: TableSize, cells: Vec<Cell>) -> Option<Self> {
        Grid::from_cells(size, cells).map(|grid| Self { grid })
    }

    /// Get the size of this board.
    pub fn size(&self) -> TableSize {
        self.grid.size
    }

    /// Get the cell at the given coordinate. Returns `None` if the coordinate is out of
    /// bounds.
    pub fn get(&self, coord: Coordinate) -> Option<Cell> {
        self.grid.get(coord).copied()
    }

    /// Set an empty cell. Returns the previous content if the cell could not be changed,
    /// which happens when it is out of bounds (`None`) or not empty.
    pub(crate) fn fill(&mut self, coord: Coordinate, cell: Cell) -> Result<(), Option<Cell>> {
        match self.grid.get_mut(coord) {
            None => Err(None),
            Some(slot) if !slot.is_empty() => Err(Some(*slot)),
            Some(slot) => {
                *slot = cell;
                Ok(())
            }
        }
    }

    /// Get an iterator over the rows of this board. Each row is an iterator over the
    /// cells of that row.
    pub fn rows(&self) -> impl '_ + Iterator<Item = impl '_ + Iterator<Item = Cell>> {
        let grid = &self.grid;
        grid.size
            .iter_coordinates()
            .map(move |row| row.map(move |coord| grid[coord]))
    }

    /// Iterate all cells in row-major order together with their coordinates.
    pub fn cells(&self) -> impl '_ + Iterator<Item = (Coordinate, Cell)> {
        let size = self.grid.size;
        self.grid
            .cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (size.un_linearize(idx), *cell))
    }

    /// Returns true if at least one cell is still empty.
    pub fn has_empty(&self) -> bool {
        self.grid.cells.iter().any(|cell| cell.is_empty())
    }

    /// Count the cells claimed by the given player.
    pub fn count(&self, player: Player) -> usize {
        self.grid
            .cells
            .iter()
            .filter(|cell| cell.owner() == Some(player))
            .count()
    }

    /// Size of the largest orthogonally connected group of cells claimed by the player.
    pub fn largest_group(&self, player: Player) -> usize {
        let size = self.grid.size;
        let mut seen = vec![false; size.total_size()];
        let mut stack = Vec::new();
        let mut best = 0;
        for (start, cell) in self.cells() {
            let idx = size.linearize(start);
            if seen[idx] || cell.owner() != Some(player) {
                continue;
            }
            seen[idx] = true;
            stack.push(start);
            let mut group = 0;
            while let Some(coord) = stack.pop() {
                group += 1;
                for next in size.neighbors(coord) {
                    let next_idx = size.linearize(next);
                    if !seen[next_idx] && self.grid[next].owner() == Some(player) {
                        seen[next_idx] = true;
                        stack.push(next);
                    }
                }
            }
            best = best.max(group);
        }
        best
    }
}
