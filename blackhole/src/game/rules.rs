//! Move legality and scoring.
use std::cmp::Ordering;

use enumflags2::BitFlags;

use crate::{
    board::{Board, Cell, Coordinate, Direction},
    game::{CannotMoveReason, Move, Player, Session, Status},
};

/// Standing of one player, compared by marks first and largest group second.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Score {
    /// Number of cells the player claimed.
    pub marks: usize,
    /// Size of the player's largest orthogonally connected group of marks.
    pub largest_group: usize,
}

impl Score {
    /// Compute the score of a player on the given board.
    pub fn of(board: &Board, player: Player) -> Self {
        Self {
            marks: board.count(player),
            largest_group: board.largest_group(player),
        }
    }
}

/// Decide who won a finished game. `last_mover` made the final move and loses full ties.
pub(crate) fn decide_winner(board: &Board, last_mover: Player) -> Player {
    let other = last_mover.opponent();
    match Score::of(board, last_mover).cmp(&Score::of(board, other)) {
        Ordering::Greater => last_mover,
        Ordering::Less | Ordering::Equal => other,
    }
}

impl Session {
    /// Check whether the current player may make the given move, without making it.
    pub fn check_move(&self, mv: Move) -> Result<(), CannotMoveReason> {
        self.check(mv).map(|_| ())
    }

    /// Validate a move, returning the mover, the cell to change and its new content.
    pub(super) fn check(&self, mv: Move) -> Result<(Player, Coordinate, Cell), CannotMoveReason> {
        let mover = match self.status() {
            Status::Active { current } => current,
            Status::Over { .. } => return Err(CannotMoveReason::GameOver),
        };
        let (target, cell) = match mv {
            Move::Place { at } => (at, Cell::Marked(mover)),
            Move::Shift { direction } => {
                let from = self.focus(mover).ok_or(CannotMoveReason::NoFocus)?;
                let target = self
                    .size()
                    .step(from, direction)
                    .ok_or(CannotMoveReason::OutOfBounds)?;
                (target, Cell::BlackHole)
            }
        };
        match self.cell(target) {
            None => Err(CannotMoveReason::OutOfBounds),
            Some(Cell::Empty) => Ok((mover, target, cell)),
            Some(_) => Err(CannotMoveReason::Occupied),
        }
    }

    /// Directions in which the given player could shift right now, ignoring whose turn
    /// it is.
    pub fn legal_shifts(&self, player: Player) -> BitFlags<Direction> {
        let mut dirs = BitFlags::empty();
        if let Some(from) = self.focus(player) {
            for &dir in Direction::ALL {
                let open = self
                    .size()
                    .step(from, dir)
                    .and_then(|to| self.cell(to))
                    .map_or(false, Cell::is_empty);
                if open {
                    dirs.insert(dir);
                }
            }
        }
        dirs
    }

    /// Returns true if the given player would have any legal move on its turn.
    pub fn has_legal_move(&self, player: Player) -> bool {
        self.board().has_empty() || !self.legal_shifts(player).is_empty()
    }

    /// List every legal move of the current player. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mover = match self.current() {
            Some(player) => player,
            None => return Vec::new(),
        };
        let places = self
            .board()
            .cells()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(at, _)| Move::Place { at });
        let shifts =
            Direction::iter_set(self.legal_shifts(mover)).map(|direction| Move::Shift { direction });
        places.chain(shifts).collect()
    }

    /// Score of the given player in the current position.
    pub fn score(&self, player: Player) -> Score {
        Score::of(self.board(), player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TableSize;

    fn play(session: &mut Session, moves: &[Move]) {
        for &mv in moves {
            session.apply(mv).unwrap();
        }
    }

    fn place(row: usize, col: usize) -> Move {
        Move::Place {
            at: Coordinate::new(row, col),
        }
    }

    #[test]
    fn shift_into_edge_is_out_of_bounds() {
        let mut session = Session::new(TableSize::Five);
        play(&mut session, &[place(0, 0), place(4, 4)]);
        assert_eq!(
            session.check_move(Move::Shift {
                direction: Direction::Up
            }),
            Err(CannotMoveReason::OutOfBounds)
        );
        assert_eq!(
            session.legal_shifts(Player::First),
            Direction::Down | Direction::Right
        );
    }

    #[test]
    fn shift_into_claimed_cell_is_occupied() {
        let mut session = Session::new(TableSize::Five);
        play(&mut session, &[place(2, 2), place(2, 3)]);
        assert_eq!(
            session.check_move(Move::Shift {
                direction: Direction::Right
            }),
            Err(CannotMoveReason::Occupied)
        );
        assert_eq!(session.check_move(place(2, 3)), Err(CannotMoveReason::Occupied));
    }

    #[test]
    fn legal_moves_counts_places_and_shifts() {
        let mut session = Session::new(TableSize::Five);
        assert_eq!(session.legal_moves().len(), 25);
        play(&mut session, &[place(0, 0), place(1, 1)]);
        // 23 empty cells plus shifts down and right from (0, 0).
        assert_eq!(session.legal_moves().len(), 25);
        assert!(session.legal_moves().iter().all(|&mv| session.check_move(mv).is_ok()));
    }

    #[test]
    fn more_marks_wins() {
        let mut session = Session::new(TableSize::Five);
        session.apply(place(0, 0)).unwrap();
        assert_eq!(decide_winner(session.board(), Player::First), Player::First);
        assert_eq!(decide_winner(session.board(), Player::Second), Player::First);
    }

    #[test]
    fn group_breaks_mark_ties() {
        let mut session = Session::new(TableSize::Five);
        play(
            &mut session,
            &[place(0, 0), place(4, 4), place(2, 0), place(4, 3)],
        );
        assert_eq!(session.score(Player::First).marks, 2);
        assert_eq!(session.score(Player::Second).largest_group, 2);
        assert_eq!(decide_winner(session.board(), Player::Second), Player::Second);
    }

    #[test]
    fn full_tie_goes_to_the_player_who_did_not_finish() {
        let mut session = Session::new(TableSize::Five);
        play(&mut session, &[place(0, 0), place(4, 4)]);
        assert_eq!(decide_winner(session.board(), Player::Second), Player::First);
        assert_eq!(decide_winner(session.board(), Player::First), Player::Second);
    }
}
