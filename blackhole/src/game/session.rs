//! State of a single game.
use crate::{
    board::{Board, Cell, Coordinate, TableSize},
    game::{rules, CannotMoveReason, Move, Player, Status},
    persistence::MalformedReason,
};

/// Result of a move that was applied.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MoveOutcome {
    /// The given cell changed and `next` is now on turn.
    Continue { changed: Coordinate, next: Player },
    /// The given cell changed and the game ended with `winner` winning.
    Finished { changed: Coordinate, winner: Player },
}

impl MoveOutcome {
    /// Get the cell that was changed by the move.
    pub fn changed(&self) -> Coordinate {
        match *self {
            MoveOutcome::Continue { changed, .. } | MoveOutcome::Finished { changed, .. } => {
                changed
            }
        }
    }
}

/// One in-progress or finished game.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Session {
    /// Cells of the game.
    board: Board,

    /// Whose turn it is, or who won.
    status: Status,

    /// Most recent placement of each player, indexed by [`Player::index`].
    focus: [Option<Coordinate>; 2],
}

impl Session {
    /// Start a fresh game on an empty board of the given size. [`Player::First`] moves
    /// first.
    pub fn new(size: TableSize) -> Self {
        Self {
            board: Board::new(size),
            status: Status::Active {
                current: Player::First,
            },
            focus: [None, None],
        }
    }

    /// Reassemble a session from stored parts, checking that they describe a reachable
    /// state.
    pub(crate) fn from_parts(
        board: Board,
        status: Status,
        focus: [Option<Coordinate>; 2],
    ) -> Result<Self, MalformedReason> {
        for &player in Player::ALL {
            if let Some(at) = focus[player.index()] {
                if board.get(at) != Some(Cell::Marked(player)) {
                    return Err(MalformedReason::InvalidFocus { player, at });
                }
            }
        }
        // Every move fills exactly one cell and First opens, so the number of filled
        // cells fixes who moved last and who is next.
        let filled = board.cells().filter(|(_, cell)| !cell.is_empty()).count();
        let next = if filled % 2 == 0 {
            Player::First
        } else {
            Player::Second
        };
        match status {
            Status::Active { current } if current != next => {
                return Err(MalformedReason::InconsistentStatus(
                    "current player does not match the number of moves",
                ))
            }
            Status::Over { .. } if board.has_empty() => {
                return Err(MalformedReason::InconsistentStatus(
                    "finished game with empty cells",
                ))
            }
            Status::Over { winner }
                if winner != rules::decide_winner(&board, next.opponent()) =>
            {
                return Err(MalformedReason::InconsistentStatus(
                    "winner does not match the board",
                ))
            }
            _ => {}
        }
        let session = Self {
            board,
            status,
            focus,
        };
        if let Status::Active { current } = status {
            if !session.has_legal_move(current) {
                return Err(MalformedReason::Stalled(current));
            }
        }
        Ok(session)
    }

    /// Get the board of this game.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get the size of the board.
    pub fn size(&self) -> TableSize {
        self.board.size()
    }

    /// Get the content of a cell. Returns `None` if the coordinate is out of bounds.
    pub fn cell(&self, at: Coordinate) -> Option<Cell> {
        self.board.get(at)
    }

    /// Get the status of the game.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Get the player whose turn it is. `None` once the game is over.
    pub fn current(&self) -> Option<Player> {
        self.status.current()
    }

    /// Get the winner. `None` while the game is running.
    pub fn winner(&self) -> Option<Player> {
        self.status.winner()
    }

    /// Returns true if the game is over.
    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Get the most recent placement of the given player, if it placed at all.
    pub fn focus(&self, player: Player) -> Option<Coordinate> {
        self.focus[player.index()]
    }

    /// Apply a move for the current player. On error nothing was changed.
    pub fn apply(&mut self, mv: Move) -> Result<MoveOutcome, CannotMoveReason> {
        let (mover, target, cell) = self.check(mv)?;
        self.board.fill(target, cell).map_err(|prev| match prev {
            None => CannotMoveReason::OutOfBounds,
            Some(_) => CannotMoveReason::Occupied,
        })?;
        if let Move::Place { at } = mv {
            self.focus[mover.index()] = Some(at);
        }

        let next = mover.opponent();
        Ok(if self.has_legal_move(next) {
            self.status = Status::Active { current: next };
            MoveOutcome::Continue {
                changed: target,
                next,
            }
        } else {
            let winner = rules::decide_winner(&self.board, mover);
            self.status = Status::Over { winner };
            MoveOutcome::Finished {
                changed: target,
                winner,
            }
        })
    }
}
