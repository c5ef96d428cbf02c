//! Player numbers and the board plane each one owns.

use serde::{Deserialize, Serialize};

use crate::BoardError;

/// Player number within a match.
///
/// Player one always opens the match and owns bits 0-8 of the board;
/// player two owns bits 9-17.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Mark {
    /// Player 1 (moves first).
    #[strum(to_string = "player 1")]
    One,
    /// Player 2.
    #[strum(to_string = "player 2")]
    Two,
}

impl Mark {
    /// Returns the opponent's mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::One => Mark::Two,
            Mark::Two => Mark::One,
        }
    }

    /// Returns the player number (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Mark::One => 1,
            Mark::Two => 2,
        }
    }

    /// Bit offset of this player's plane within the packed board.
    pub(crate) fn shift(self) -> u32 {
        match self {
            Mark::One => 0,
            Mark::Two => crate::PLANE_WIDTH,
        }
    }
}

impl TryFrom<u8> for Mark {
    type Error = BoardError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(Mark::One),
            2 => Ok(Mark::Two),
            other => Err(BoardError::InvalidPlayer(other)),
        }
    }
}

impl From<Mark> for u8 {
    fn from(mark: Mark) -> Self {
        mark.number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_numbers_round_trip() {
        assert_eq!(Mark::try_from(1), Ok(Mark::One));
        assert_eq!(Mark::try_from(2), Ok(Mark::Two));
        assert_eq!(Mark::One.number(), 1);
        assert_eq!(Mark::Two.number(), 2);
    }

    #[test]
    fn test_rejects_other_player_numbers() {
        for n in [0u8, 3, 255] {
            assert_eq!(Mark::try_from(n), Err(BoardError::InvalidPlayer(n)));
        }
    }

    #[test]
    fn test_opponent_alternates() {
        assert_eq!(Mark::One.opponent(), Mark::Two);
        assert_eq!(Mark::Two.opponent().opponent(), Mark::Two);
    }
}
