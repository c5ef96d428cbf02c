//! Win detection.

use strum::IntoEnumIterator;
use tracing::instrument;

use crate::{BoardState, Mark};

/// Winning lines as 9-bit masks over positions 0-8.
pub const WIN_PATTERNS: [u16; 8] = [
    //  876 543 210  <- positions
    // Rows
    0b000_000_111,
    0b000_111_000,
    0b111_000_000,
    // Columns
    0b001_001_001,
    0b010_010_010,
    0b100_100_100,
    // Diagonals
    0b100_010_001,
    0b001_010_100,
];

/// Checks whether `mark`'s plane covers at least one winning line.
#[instrument]
pub fn is_player_win(board: BoardState, mark: Mark) -> bool {
    let marks = board.marks(mark);
    WIN_PATTERNS
        .iter()
        .any(|&pattern| marks & pattern == pattern)
}

/// Returns the first player holding a winning line, if any.
#[instrument]
pub fn winner(board: BoardState) -> Option<Mark> {
    Mark::iter().find(|&mark| is_player_win(board, mark))
}
