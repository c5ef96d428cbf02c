//! Game rules over the packed board.
//!
//! Pure functions evaluating a [`crate::BoardState`]; the board's own
//! query methods delegate here.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{WIN_PATTERNS, is_player_win, winner};
