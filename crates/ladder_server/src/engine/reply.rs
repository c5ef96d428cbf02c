//! Tagged results handed back to callers.
//!
//! Serialized as `{"status": "ok", ...fields}` or
//! `{"status": "error", "why": "..."}`.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::db::{MatchId, Standing};
use crate::engine::{EngineError, ErrorKind};

/// Outcome of an engine operation in wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Reply<T> {
    /// Operation succeeded; fields of `T` sit beside the status.
    Ok(T),
    /// Operation failed.
    Error {
        /// Human-readable reason.
        why: String,
        /// Failure category; not serialized.
        #[serde(skip)]
        kind: ErrorKind,
    },
}

impl<T> Reply<T> {
    /// Failure category, if this is an error.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Reply::Ok(_) => None,
            Reply::Error { kind, .. } => Some(*kind),
        }
    }
}

impl<T> From<Result<T, EngineError>> for Reply<T> {
    fn from(result: Result<T, EngineError>) -> Self {
        match result {
            Ok(data) => Reply::Ok(data),
            Err(err) => Reply::Error {
                why: err.to_string(),
                kind: err.kind(),
            },
        }
    }
}

/// Success with no extra fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack;

/// Match created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct MatchCreated {
    match_id: MatchId,
}

/// Current state of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct MatchView {
    /// Name of the player to move.
    turn: String,
    /// Raw packed board.
    board: u32,
}

/// Leaderboard rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Scores {
    scores: Vec<Standing>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Conflict;
    use serde_json::json;

    #[test]
    fn test_ok_flattens_fields() {
        let reply: Reply<MatchCreated> = Ok(MatchCreated::new(1)).into();
        assert_eq!(
            serde_json::to_value(&reply).expect("serialize"),
            json!({"status": "ok", "match_id": 1})
        );
    }

    #[test]
    fn test_ack_has_status_only() {
        let reply: Reply<Ack> = Ok(Ack).into();
        assert_eq!(serde_json::to_value(&reply).expect("serialize"), json!({"status": "ok"}));
    }

    #[test]
    fn test_error_carries_why() {
        let reply: Reply<Ack> = Err(Conflict::MatchFinished.into()).into();
        assert_eq!(reply.error_kind(), Some(ErrorKind::Conflict));
        assert_eq!(
            serde_json::to_value(&reply).expect("serialize"),
            json!({"status": "error", "why": "match finished"})
        );
    }
}
