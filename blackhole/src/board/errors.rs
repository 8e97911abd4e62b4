//! Errors used by the board types.

use thiserror::Error;

/// Error returned when a table size cannot be parsed or is not supported.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum TableSizeError {
    /// The side length is a number but not one of 5, 7 or 9.
    #[error("unsupported table size {0}, expected 5, 7 or 9")]
    Unsupported(usize),

    /// Width and height differ.
    #[error("table must be square, got {0:?}")]
    NotSquare(String),

    /// The size could not be read as a number.
    #[error("invalid table size {0:?}")]
    NotANumber(String),
}
