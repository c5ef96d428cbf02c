//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use ladder_board::{BoardError, BoardState, Mark};
use tracing::instrument;

use crate::db::schema;

/// Storage-assigned player identifier.
pub type PlayerId = i32;

/// Storage-assigned match identifier.
pub type MatchId = i32;

/// Registered player.
///
/// Name and credential hash never change after registration; the score only
/// grows, one point per winning move.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::players)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Player {
    id: PlayerId,
    name: String,
    score: i32,
    #[getter(skip)]
    credential_hash: String,
    created_at: NaiveDateTime,
}

impl Player {
    /// Materializes a stored player from an insert, for stores without SQL defaults.
    pub(crate) fn from_new(id: PlayerId, new: NewPlayer, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            name: new.name,
            score: 0,
            credential_hash: new.credential_hash,
            created_at,
        }
    }

    /// Checks a presented credential hash against the stored one.
    #[instrument(skip_all, fields(player_id = self.id))]
    pub fn matches_credential(&self, credential_hash: &str) -> bool {
        self.credential_hash == credential_hash
    }

    /// Adds one win to the score.
    #[instrument(skip(self), fields(player_id = self.id, score = self.score))]
    pub fn credit_win(&mut self) {
        self.score += 1;
    }
}

/// Insertable player for registration.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer {
    name: String,
    #[getter(skip)]
    credential_hash: String,
}

/// A match between two players.
///
/// Whether the match is finished is never stored; it is derived from
/// `board` on every read.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::matches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Match {
    id: MatchId,
    player_one_id: PlayerId,
    player_two_id: PlayerId,
    turn_player_id: PlayerId,
    board: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Match {
    /// Materializes a stored match from an insert, for stores without SQL defaults.
    pub(crate) fn from_new(id: MatchId, new: NewMatch, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            player_one_id: new.player_one_id,
            player_two_id: new.player_two_id,
            turn_player_id: new.turn_player_id,
            board: new.board,
            created_at,
            updated_at: created_at,
        }
    }

    /// Decodes the stored board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidState`] if the stored value is corrupt.
    pub fn board_state(&self) -> Result<BoardState, BoardError> {
        // Negative values land above bit 17 and are rejected.
        BoardState::new(self.board as u32)
    }

    /// Checks whether `player` takes part in this match.
    pub fn has_participant(&self, player: PlayerId) -> bool {
        player == self.player_one_id || player == self.player_two_id
    }

    /// Returns the board plane `player` marks, if they take part.
    pub fn mark_of(&self, player: PlayerId) -> Option<Mark> {
        if player == self.player_one_id {
            Some(Mark::One)
        } else if player == self.player_two_id {
            Some(Mark::Two)
        } else {
            None
        }
    }

    /// Returns the other participant, if `player` takes part.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        match self.mark_of(player)? {
            Mark::One => Some(self.player_two_id),
            Mark::Two => Some(self.player_one_id),
        }
    }

    /// Stores the board after an accepted move and hands the turn over.
    #[instrument(skip(self), fields(match_id = self.id))]
    pub fn record_move(&mut self, board: BoardState, next_turn: PlayerId, at: NaiveDateTime) {
        // Boards occupy 18 bits, well inside i32.
        self.board = board.bits() as i32;
        self.turn_player_id = next_turn;
        self.updated_at = at;
    }
}

/// Insertable match.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = schema::matches)]
pub struct NewMatch {
    player_one_id: PlayerId,
    player_two_id: PlayerId,
    turn_player_id: PlayerId,
    board: i32,
}

impl NewMatch {
    /// Opening position: player one to move on an empty board.
    #[instrument]
    pub fn opening(player_one_id: PlayerId, player_two_id: PlayerId) -> Self {
        Self {
            player_one_id,
            player_two_id,
            turn_player_id: player_one_id,
            board: 0,
        }
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, Getters, new)]
pub struct Standing {
    name: String,
    score: i32,
}

impl From<Player> for Standing {
    fn from(player: Player) -> Self {
        Self {
            name: player.name,
            score: player.score,
        }
    }
}
