//! Errors returned when saving or loading a session.

use std::io;

use thiserror::Error;

use crate::{board::Coordinate, game::Player};

/// Error returned by save and load operations.
#[derive(Debug, Error)]
pub enum GameDataError {
    /// The underlying storage could not be read or written.
    #[error("could not access game data: {0}")]
    Io(#[from] io::Error),

    /// The data was read but does not describe a valid session.
    #[error(transparent)]
    Malformed(#[from] MalformedDataError),
}

impl GameDataError {
    /// Returns true if the data could not be loaded because it doesn't exist. Callers
    /// usually treat this as "start a fresh game".
    pub fn is_not_found(&self) -> bool {
        match self {
            GameDataError::Io(err) => err.kind() == io::ErrorKind::NotFound,
            GameDataError::Malformed(_) => false,
        }
    }

    /// Returns true if the data was readable but corrupt.
    pub fn is_malformed(&self) -> bool {
        matches!(self, GameDataError::Malformed(_))
    }
}

impl From<MalformedReason> for GameDataError {
    fn from(reason: MalformedReason) -> Self {
        GameDataError::Malformed(MalformedDataError::new(reason))
    }
}

/// Reason why stored data does not describe a valid session.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum MalformedReason {
    /// The document is not valid JSON, is truncated, or has missing, unknown or mistyped
    /// fields.
    #[error("invalid document: {0}")]
    Syntax(String),

    /// The document is JSON but not a saved game.
    #[error("unexpected format tag {0:?}")]
    WrongFormat(String),

    /// The document was written by an incompatible version.
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),

    /// The table size is not 5, 7 or 9.
    #[error("unsupported table size {0}")]
    UnsupportedSize(usize),

    /// The grid doesn't have one row per table row.
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    /// A grid row doesn't have one cell per table column.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A grid cell holds an unknown token.
    #[error("unknown cell {token:?} at {at}")]
    UnknownCell { at: Coordinate, token: char },

    /// Turn, terminal flag and winner contradict each other.
    #[error("inconsistent status: {0}")]
    InconsistentStatus(&'static str),

    /// A focus does not point at a mark of its player.
    #[error("focus of {player} at {at} is not one of its marks")]
    InvalidFocus { player: Player, at: Coordinate },

    /// The game is marked as running but the player on turn can't move.
    #[error("game is not over but {0} has no legal move")]
    Stalled(Player),
}

/// Error for data that was read successfully but is not a valid session.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("malformed game data: {reason}")]
pub struct MalformedDataError {
    /// What was wrong with the data.
    reason: MalformedReason,
}

impl MalformedDataError {
    /// Construct an error for the given reason.
    pub(super) fn new(reason: MalformedReason) -> Self {
        Self { reason }
    }

    /// Get the reason the data was rejected.
    pub fn reason(&self) -> &MalformedReason {
        &self.reason
    }

    /// Extract the reason from this error.
    pub fn into_reason(self) -> MalformedReason {
        self.reason
    }
}
