use thiserror::Error;

/// Reason why a move is not legal in the current position.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotMoveReason {
    /// The game is already over.
    #[error("the game is already over")]
    GameOver,

    /// The target cell is not on the board.
    #[error("the target coordinate is out of bounds")]
    OutOfBounds,

    /// The target cell was already claimed or collapsed.
    #[error("the target cell is not empty")]
    Occupied,

    /// The mover has not placed anything to shift from yet.
    #[error("the player has no focus to shift from")]
    NoFocus,
}
