//! Errors raised while building or marking a board.

use crate::Position;

/// Error that can occur when constructing or mutating a [`crate::BoardState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// The raw value sets bits outside the 18-bit layout, or marks a cell for both players.
    #[display("board {_0:#x} is not a valid board state")]
    InvalidState(u32),

    /// Player numbers are 1 or 2.
    #[display("invalid player number {_0}")]
    InvalidPlayer(u8),

    /// Positions run from 0 to 8.
    #[display("invalid position {_0}")]
    InvalidPosition(usize),

    /// The cell already carries a mark.
    #[display("field {} has already been set", _0.to_index())]
    OccupiedCell(Position),
}

impl std::error::Error for BoardError {}
