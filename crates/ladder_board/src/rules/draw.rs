//! Full-board and draw detection.

use tracing::instrument;

use super::win::winner;
use crate::{BoardState, CELL_COUNT};

/// Checks if every cell carries a mark.
#[instrument]
pub fn is_full(board: BoardState) -> bool {
    board.bits().count_ones() == CELL_COUNT
}

/// A full board with no winner.
#[instrument]
pub fn is_draw(board: BoardState) -> bool {
    is_full(board) && winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(BoardState::EMPTY));
    }

    #[test]
    fn test_full_board() {
        // Player 1 holds every cell.
        let board = BoardState::new(0b111_111_111).expect("valid board");
        assert!(is_full(board));
        assert!(!is_draw(board));
    }

    #[test]
    fn test_draw_detection() {
        // 1 2 1 / 2 1 1 / 2 1 2
        let one = 0b010_110_101;
        let two = 0b101_001_010;
        let board = BoardState::new(one | two << 9).expect("valid board");
        assert!(is_full(board));
        assert!(is_draw(board));
    }

    #[test]
    fn test_eight_marks_not_full() {
        let board = BoardState::new(0b000_110_101 | 0b101_001_010 << 9).expect("valid board");
        assert!(!is_full(board));
    }
}
