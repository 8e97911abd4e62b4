//! Game model for Black Hole, a two-player territory game played on a square grid.
//!
//! Players take turns either claiming an empty cell or collapsing an empty cell next to
//! their most recent claim into a black hole. The game ends when no empty cell remains,
//! and the player holding more of the board wins.
//!
//! [`GameModel`] is the entry point. It owns the running [`Session`], accepts moves,
//! notifies subscribed [`GameObserver`]s about every change and saves and restores
//! sessions through the [`persistence`] module.
//!
//! ```
//! use blackhole::{Coordinate, Direction, GameModel, Move, Player, TableSize};
//!
//! let mut model = GameModel::new(TableSize::Five);
//! assert!(model.player_clicked(Move::Place { at: Coordinate::new(2, 2) }));
//! assert_eq!(model.current_player(), Some(Player::Second));
//! // Second has not placed anything yet, so it has nothing to shift from.
//! assert!(!model.player_clicked(Move::Shift { direction: Direction::Up }));
//! ```

pub mod board;
pub mod game;
pub mod persistence;

pub use crate::{
    board::{Board, Cell, Coordinate, Direction, TableSize},
    game::{
        CannotMoveReason, GameEvent, GameModel, GameObserver, Move, Player, Session, Status,
        SubscriptionId,
    },
    persistence::{GameDataError, MalformedDataError, MalformedReason},
};
