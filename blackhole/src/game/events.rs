//! Change notifications delivered by [`GameModel`][crate::game::GameModel].
use crate::{
    board::{Cell, Coordinate},
    game::Player,
};

/// Something that changed in the model.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GameEvent {
    /// The cell at `at` now holds `cell`.
    FieldChanged { at: Coordinate, cell: Cell },
    /// It is now the given player's turn.
    PlayerChanged(Player),
    /// The game ended and the given player won.
    GameOver { winner: Player },
    /// The whole session was replaced, by a new game or a load. Observers should rebuild
    /// their view of every cell.
    GameLoaded,
}

/// Receiver of [`GameEvent`]s.
///
/// Observers are called synchronously, after the change they report was committed. The
/// model is mutably borrowed for the duration of the call, so an observer can't reach
/// back into it.
///
/// Implemented for every `FnMut(&GameEvent)`.
pub trait GameObserver {
    /// Handle a single event.
    fn notify(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> GameObserver for F {
    fn notify(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Handle returned by [`GameModel::subscribe`][crate::game::GameModel::subscribe], used
/// to unsubscribe again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SubscriptionId(pub(super) u64);
