//! Implementation of the game itself.
//!
//! [`Session`] holds the full state of one game and enforces the rules. [`GameModel`]
//! wraps a session, is the only thing that mutates it, and notifies subscribed
//! [`GameObserver`]s about every committed change.
//!
//! # Rules
//!
//! Two players, [`Player::First`] and [`Player::Second`], alternate turns on an empty
//! square board. `First` always starts. On their turn a player makes one of two moves:
//!
//! * [`Move::Place`] claims any empty cell. The claimed cell becomes that player's
//!   *focus*.
//! * [`Move::Shift`] collapses the empty cell next to the player's focus, in the given
//!   direction, into a black hole. It is only possible once the player has placed at
//!   least once.
//!
//! Every move uses up one empty cell, and a placement is possible as long as an empty
//! cell exists, so the game ends exactly when the board is full. The player with more
//! marks wins. Ties go to the player with the larger connected group of marks, and if
//! that is still tied, to the player who did not make the last move.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Coordinate, Direction};

pub use self::{
    errors::CannotMoveReason,
    events::{GameEvent, GameObserver, SubscriptionId},
    model::GameModel,
    rules::Score,
    session::{MoveOutcome, Session},
};

mod errors;
mod events;
mod model;
#[cfg(feature = "rng_gen")]
mod random;
mod rules;
mod session;

/// One of the two players. `First` plays red and always starts, `Second` plays blue.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Both players in turn order.
    pub const ALL: &'static [Player] = &[Player::First, Player::Second];

    /// Get the opponent of this player.
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Identifier used for this player in save files.
    pub fn name(self) -> &'static str {
        match self {
            Player::First => "first",
            Player::Second => "second",
        }
    }

    /// Colour of this player's marks.
    pub fn colour(self) -> &'static str {
        match self {
            Player::First => "red",
            Player::Second => "blue",
        }
    }

    /// Index of this player for per-player arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A move attempted by the current player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Move {
    /// Claim the empty cell at the given coordinate.
    Place { at: Coordinate },
    /// Collapse the empty cell next to the mover's focus in the given direction.
    Shift { direction: Direction },
}

impl From<Coordinate> for Move {
    fn from(at: Coordinate) -> Self {
        Move::Place { at }
    }
}

impl From<Direction> for Move {
    fn from(direction: Direction) -> Self {
        Move::Shift { direction }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Move::Place { at } => write!(f, "place {}", at),
            Move::Shift { direction } => write!(f, "shift {}", direction),
        }
    }
}

/// Status of a session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Status {
    /// The game is running and it is `current`'s turn.
    Active { current: Player },
    /// The game is over and `winner` won it.
    Over { winner: Player },
}

impl Status {
    /// The player whose turn it is, if the game is still running.
    pub fn current(self) -> Option<Player> {
        match self {
            Status::Active { current } => Some(current),
            Status::Over { .. } => None,
        }
    }

    /// The winner, if the game is over.
    pub fn winner(self) -> Option<Player> {
        match self {
            Status::Active { .. } => None,
            Status::Over { winner } => Some(winner),
        }
    }

    /// Returns true if the game is over.
    pub fn is_over(self) -> bool {
        matches!(self, Status::Over { .. })
    }
}
