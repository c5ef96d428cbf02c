//! Bit-packed tic-tac-toe board.
//!
//! A [`BoardState`] packs the 3x3 grid into 18 bits, one 9-bit plane per
//! player. It is a plain `Copy` value with no I/O: every mutation returns a
//! new board, and finished/won/full are computed from the bits on demand.
//!
//! # Example
//!
//! ```
//! use ladder_board::{BoardState, Mark, Position};
//!
//! let board = BoardState::EMPTY
//!     .set_mark(Position::Center, Mark::One)
//!     .expect("empty cell");
//! assert!(board.is_set_for(Position::Center, Mark::One));
//! assert_eq!(board.free_fields().len(), 8);
//! assert!(!board.is_finished());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod mark;
mod position;
pub mod rules;

pub use board::{BoardState, BoardStatus, CELL_COUNT, PLANE_WIDTH};
pub use error::BoardError;
pub use mark::Mark;
pub use position::Position;
