//! Board sizes and movement on the board.
use std::{convert::TryFrom, fmt, str::FromStr};

use enumflags2::BitFlags;
use serde::{Deserialize, Serialize};

use crate::board::{Coordinate, TableSizeError};

/// Supported board sizes. The board is always square.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum TableSize {
    /// 5x5 board.
    Five,
    /// 7x7 board.
    Seven,
    /// 9x9 board.
    Nine,
}

impl TableSize {
    /// All supported sizes, smallest first.
    pub const ALL: &'static [TableSize] = &[TableSize::Five, TableSize::Seven, TableSize::Nine];

    /// Length of one side of the board.
    pub fn len(self) -> usize {
        match self {
            TableSize::Five => 5,
            TableSize::Seven => 7,
            TableSize::Nine => 9,
        }
    }

    /// Get the size whose side has the given length, if supported.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            5 => Some(TableSize::Five),
            7 => Some(TableSize::Seven),
            9 => Some(TableSize::Nine),
            _ => None,
        }
    }

    /// Number of cells on a board of this size.
    pub fn total_size(self) -> usize {
        self.len() * self.len()
    }

    /// Returns true if the coordinate addresses a cell on a board of this size.
    pub fn contains(self, coord: Coordinate) -> bool {
        coord.row < self.len() && coord.col < self.len()
    }

    /// Convert a coordinate to a row-major index.
    /// Panics if the coordinate is out of range.
    pub fn linearize(self, coord: Coordinate) -> usize {
        match self.try_linearize(coord) {
            Some(v) => v,
            None => panic!("{:?} is out of bounds for {:?}", coord, self),
        }
    }

    /// Convert a coordinate to a row-major index.
    /// Returns `None` if the coordinate is out of range.
    pub fn try_linearize(self, coord: Coordinate) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.row * self.len() + coord.col)
        } else {
            None
        }
    }

    /// Get back a coordinate from a row-major index.
    pub fn un_linearize(self, idx: usize) -> Coordinate {
        Coordinate::new(idx / self.len(), idx % self.len())
    }

    /// Get an iterator over rows of the board. Each row is an iterator over the
    /// coordinates of that row.
    pub fn iter_coordinates(self) -> impl Iterator<Item = impl Iterator<Item = Coordinate>> {
        let len = self.len();
        (0..len).map(move |row| (0..len).map(move |col| Coordinate::new(row, col)))
    }

    /// Get the coordinate one step from `coord` in `dir`, if that is still on the board.
    pub fn step(self, coord: Coordinate, dir: Direction) -> Option<Coordinate> {
        if !self.contains(coord) {
            return None;
        }
        let next = match dir {
            Direction::Up => Coordinate::new(coord.row.checked_sub(1)?, coord.col),
            Direction::Down => Coordinate::new(coord.row + 1, coord.col),
            Direction::Left => Coordinate::new(coord.row, coord.col.checked_sub(1)?),
            Direction::Right => Coordinate::new(coord.row, coord.col + 1),
        };
        Some(next).filter(|&next| self.contains(next))
    }

    /// Iterate the orthogonal neighbors of the given coordinate.
    pub fn neighbors(self, coord: Coordinate) -> Neighbors {
        Neighbors {
            size: self,
            coord,
            // Skip straight to the end for out of bounds coordinates.
            next: if self.contains(coord) { 0 } else { Direction::ALL.len() },
        }
    }
}

impl Default for TableSize {
    /// The default board is 5x5.
    fn default() -> Self {
        TableSize::Five
    }
}

impl TryFrom<usize> for TableSize {
    type Error = TableSizeError;

    fn try_from(len: usize) -> Result<Self, Self::Error> {
        Self::from_len(len).ok_or(TableSizeError::Unsupported(len))
    }
}

impl From<TableSize> for usize {
    fn from(size: TableSize) -> Self {
        size.len()
    }
}

impl FromStr for TableSize {
    type Err = TableSizeError;

    /// Parses either a plain side length (`"7"`) or a `"7x7"` style size.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let side = match s.split_once(|c| c == 'x' || c == 'X') {
            Some((w, h)) if w.trim() == h.trim() => w.trim(),
            Some(_) => return Err(TableSizeError::NotSquare(s.to_owned())),
            None => s,
        };
        let len: usize = side
            .parse()
            .map_err(|_| TableSizeError::NotANumber(s.to_owned()))?;
        TableSize::try_from(len)
    }
}

impl fmt::Display for TableSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{0}x{0}", self.len())
    }
}

/// Direction of a shift move.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0b0001,
    Down = 0b0010,
    Left = 0b0100,
    Right = 0b1000,
}

impl Direction {
    /// All directions in neighbor iteration order.
    pub const ALL: &'static [Direction] = &[
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Get the direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Lower-case name of this direction.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Iterate the directions contained in the given set, in [`Direction::ALL`] order.
    pub fn iter_set(set: BitFlags<Direction>) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .iter()
            .copied()
            .filter(move |&dir| set.contains(dir))
    }
}

impl FromStr for Direction {
    type Err = ();

    /// Accepts the direction names as well as compass names and their first letters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "north" | "u" | "n" => Ok(Direction::Up),
            "down" | "south" | "d" | "s" => Ok(Direction::Down),
            "left" | "west" | "l" | "w" => Ok(Direction::Left),
            "right" | "east" | "r" | "e" => Ok(Direction::Right),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Iterator over the orthogonal neighbors of a coordinate.
#[derive(Debug, Clone)]
pub struct Neighbors {
    size: TableSize,
    coord: Coordinate,
    /// Index into [`Direction::ALL`] of the next direction to try.
    next: usize,
}

impl Iterator for Neighbors {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        while let Some(&dir) = Direction::ALL.get(self.next) {
            self.next += 1;
            if let Some(coord) = self.size.step(self.coord, dir) {
                return Some(coord);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sizes() {
        assert_eq!("5".parse::<TableSize>(), Ok(TableSize::Five));
        assert_eq!("7x7".parse::<TableSize>(), Ok(TableSize::Seven));
        assert_eq!(" 9 ".parse::<TableSize>(), Ok(TableSize::Nine));
        assert_eq!("6".parse::<TableSize>(), Err(TableSizeError::Unsupported(6)));
        assert_eq!(
            "5x7".parse::<TableSize>(),
            Err(TableSizeError::NotSquare("5x7".to_owned()))
        );
        assert_eq!(
            "big".parse::<TableSize>(),
            Err(TableSizeError::NotANumber("big".to_owned()))
        );
    }

    #[test]
    fn linearize_round_trips_every_cell() {
        for &size in TableSize::ALL {
            for (idx, coord) in size.iter_coordinates().flatten().enumerate() {
                assert_eq!(size.linearize(coord), idx);
                assert_eq!(size.un_linearize(idx), coord);
            }
            assert_eq!(size.try_linearize(Coordinate::new(size.len(), 0)), None);
        }
    }

    #[test]
    fn step_stops_at_edges() {
        let size = TableSize::Five;
        let corner = Coordinate::new(0, 0);
        assert_eq!(size.step(corner, Direction::Up), None);
        assert_eq!(size.step(corner, Direction::Left), None);
        assert_eq!(size.step(corner, Direction::Down), Some(Coordinate::new(1, 0)));
        assert_eq!(size.step(corner, Direction::Right), Some(Coordinate::new(0, 1)));
        assert_eq!(size.step(Coordinate::new(4, 4), Direction::Down), None);
        assert_eq!(size.step(Coordinate::new(7, 7), Direction::Up), None);
    }

    #[test]
    fn neighbors_of_center_and_corner() {
        let size = TableSize::Seven;
        let center: Vec<_> = size.neighbors(Coordinate::new(3, 3)).collect();
        assert_eq!(
            center,
            [
                Coordinate::new(2, 3),
                Coordinate::new(4, 3),
                Coordinate::new(3, 2),
                Coordinate::new(3, 4),
            ]
        );
        assert_eq!(size.neighbors(Coordinate::new(6, 6)).count(), 2);
        assert_eq!(size.neighbors(Coordinate::new(9, 9)).count(), 0);
    }

    #[test]
    fn direction_names() {
        for &dir in Direction::ALL {
            assert_eq!(dir.name().parse::<Direction>(), Ok(dir));
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!("W".parse::<Direction>(), Ok(Direction::Left));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn iter_set_keeps_order() {
        let set = Direction::Right | Direction::Up;
        let dirs: Vec<_> = Direction::iter_set(set).collect();
        assert_eq!(dirs, [Direction::Up, Direction::Right]);
    }
}
