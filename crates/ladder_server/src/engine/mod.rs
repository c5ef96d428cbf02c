//! Match engine: authentication, match lifecycle, moves and leaderboard.

mod error;
mod match_engine;
mod reply;

pub use error::{Conflict, EngineError, ErrorKind, NotFound};
pub use match_engine::MatchEngine;
pub use reply::{Ack, MatchCreated, MatchView, Reply, Scores};
