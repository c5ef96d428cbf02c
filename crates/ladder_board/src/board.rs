//! The packed 18-bit board.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{BoardError, Mark, Position, rules};

/// Width of one player's plane in bits.
pub const PLANE_WIDTH: u32 = 9;

/// Number of cells on the board.
pub const CELL_COUNT: u32 = 9;

const PLANE_MASK: u32 = 0x1FF;
const BOARD_MASK: u32 = 0x3_FFFF;

/// A 3x3 board packed into 18 bits.
///
/// ```text
///          MSB <--------------------------> LSB
/// bits:    8 7 6 5 4 3 2 1 0 | 8 7 6 5 4 3 2 1 0
///          |-- player two --|   |-- player one --|
/// ```
///
/// A bit is set when the owning player has marked the matching cell.
/// The two planes never overlap, so at most nine bits are ever set.
/// Every constructor upholds this; a value that exists is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BoardState(u32);

/// Where a board stands in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardStatus {
    /// Moves are still possible and nobody has won.
    InProgress,
    /// A player holds a winning line.
    Won(Mark),
    /// Every cell is marked and nobody has won.
    Draw,
}

impl BoardState {
    /// The board before any move.
    pub const EMPTY: Self = Self(0);

    /// Builds a board from its packed representation.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidState`] if a cell is marked by both
    /// players or a bit above bit 17 is set.
    #[instrument]
    pub fn new(bits: u32) -> Result<Self, BoardError> {
        let one = bits & PLANE_MASK;
        let two = (bits >> PLANE_WIDTH) & PLANE_MASK;
        if bits & !BOARD_MASK != 0 || one & two != 0 {
            debug!(bits, "Rejected overlapping or oversized board");
            return Err(BoardError::InvalidState(bits));
        }
        Ok(Self(bits))
    }

    /// Returns the packed representation.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns the 9-bit plane owned by `mark`.
    pub fn marks(self, mark: Mark) -> u16 {
        ((self.0 >> mark.shift()) & PLANE_MASK) as u16
    }

    fn occupied(self) -> u16 {
        self.marks(Mark::One) | self.marks(Mark::Two)
    }

    /// Checks if any player has marked `pos`.
    pub fn is_set(self, pos: Position) -> bool {
        self.occupied() & pos.bit() != 0
    }

    /// Checks if `mark` has marked `pos`.
    pub fn is_set_for(self, pos: Position, mark: Mark) -> bool {
        self.marks(mark) & pos.bit() != 0
    }

    /// Returns unmarked positions in ascending order.
    pub fn free_fields(self) -> Vec<Position> {
        Position::ALL
            .into_iter()
            .filter(|&pos| !self.is_set(pos))
            .collect()
    }

    /// Returns the number of marked cells.
    pub fn mark_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns a new board with `pos` marked for `mark`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OccupiedCell`] if either player already holds `pos`.
    #[instrument]
    pub fn set_mark(self, pos: Position, mark: Mark) -> Result<Self, BoardError> {
        if self.is_set(pos) {
            return Err(BoardError::OccupiedCell(pos));
        }
        Ok(Self(self.0 | u32::from(pos.bit()) << mark.shift()))
    }

    /// Checks if `mark` holds a winning line.
    pub fn is_player_win(self, mark: Mark) -> bool {
        rules::is_player_win(self, mark)
    }

    /// Checks if either player holds a winning line.
    pub fn is_win(self) -> bool {
        self.winner().is_some()
    }

    /// Returns the player holding a winning line, if any.
    pub fn winner(self) -> Option<Mark> {
        rules::winner(self)
    }

    /// Checks if all nine cells are marked.
    pub fn is_full(self) -> bool {
        rules::is_full(self)
    }

    /// A board is finished once it is full or someone has won.
    ///
    /// Always computed from the bits; nothing caches it.
    pub fn is_finished(self) -> bool {
        self.is_full() || self.is_win()
    }

    /// Classifies the board.
    pub fn status(self) -> BoardStatus {
        match self.winner() {
            Some(mark) => BoardStatus::Won(mark),
            None if self.is_full() => BoardStatus::Draw,
            None => BoardStatus::InProgress,
        }
    }
}

impl TryFrom<u32> for BoardState {
    type Error = BoardError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<BoardState> for u32 {
    fn from(board: BoardState) -> Self {
        board.bits()
    }
}
