//! Engine error types.
//!
//! Display strings double as the `why` shown to callers, so they name the
//! cause without exposing ids, hashes or storage detail.

use derive_more::{Display, From};
use ladder_board::{BoardError, Position};
use tracing::error;

use crate::db::DbError;
use crate::input::ValidationError;

/// Category of an engine failure; the request layer maps each to one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input.
    Validation,
    /// Unknown player or wrong credential hash.
    Authentication,
    /// Request clashes with current state.
    Conflict,
    /// Unknown opponent or match, or caller is not a participant.
    NotFound,
    /// Storage failure or corrupt stored state.
    Internal,
}

/// Request clashes with stored state.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Conflict {
    /// Name is already registered.
    #[display("player {_0} already exists")]
    AlreadyRegistered(String),
    /// Both sides of a match named the same player.
    #[display("please play against someone else")]
    SelfPlay,
    /// Caller is not the player to move.
    #[display("not your turn")]
    NotYourTurn,
    /// Board is full or has a winner.
    #[display("match finished")]
    MatchFinished,
    /// Target cell already carries a mark.
    #[display("field {} has already been set", _0.to_index())]
    OccupiedCell(Position),
}

/// Something the request refers to does not exist for this caller.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum NotFound {
    /// Named opponent is not registered.
    #[display("player {_0} does not exist")]
    Player(String),
    /// Match is unknown or the caller does not take part in it.
    #[display("no such match")]
    Match,
}

/// Failure of a [`crate::MatchEngine`] operation.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum EngineError {
    /// Input failed validation.
    #[display("{_0}")]
    #[from]
    Validation(ValidationError),

    /// Unknown player or wrong credential hash.
    #[display("player {_0} cannot be authenticated")]
    Authentication(String),

    /// Request clashes with stored state.
    #[display("{_0}")]
    #[from]
    Conflict(Conflict),

    /// Referenced entity missing.
    #[display("{_0}")]
    #[from]
    NotFound(NotFound),

    /// Storage or consistency failure; the detail is logged, never displayed.
    #[display("internal error")]
    Internal(String),
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Category used to choose a transport status.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Builds an internal error, logging its detail.
    pub fn internal(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        error!(detail = %detail, "Internal engine failure");
        Self::Internal(detail)
    }
}

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<BoardError> for EngineError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::OccupiedCell(pos) => Conflict::OccupiedCell(pos).into(),
            other => Self::internal(format!("Board error: {}", other)),
        }
    }
}
