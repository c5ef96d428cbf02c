//! Match lifecycle and move application.

use chrono::Utc;
use ladder_board::Position;
use tracing::{debug, info, instrument, warn};

use crate::db::{Match, MatchId, NewMatch, NewPlayer, Player, Repository, Standing, Store};
use crate::engine::{Conflict, EngineError, MatchView, NotFound};
use crate::input::{CredentialHash, PlayerName};

/// Owns the game rules and applies them against a [`Store`].
///
/// Construct one per process and share it by reference (the HTTP layer
/// wraps it in an `Arc`). Every operation returns a `Result` and never
/// panics on bad input or stored state.
#[derive(Debug, Clone)]
pub struct MatchEngine<S> {
    store: S,
}

impl<S: Store> MatchEngine<S> {
    /// Creates an engine over `store`.
    #[instrument(skip(store))]
    pub fn new(store: S) -> Self {
        info!("Creating MatchEngine");
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers a player with a zero score.
    ///
    /// Uniqueness is decided by the store's insert, not by a prior lookup.
    ///
    /// # Errors
    ///
    /// [`Conflict::AlreadyRegistered`] if the name is taken.
    #[instrument(skip(self, credential_hash), fields(name = %name))]
    pub fn register_player(
        &self,
        name: &PlayerName,
        credential_hash: &CredentialHash,
    ) -> Result<(), EngineError> {
        let new_player = NewPlayer::new(
            name.as_str().to_string(),
            credential_hash.as_str().to_string(),
        );

        self.store
            .exclusive(|repo| match repo.create_player(new_player) {
                Ok(player) => {
                    info!(player_id = player.id(), "Player registered");
                    Ok(())
                }
                Err(err) if err.is_duplicate() => {
                    warn!("Registration rejected, name taken");
                    Err(Conflict::AlreadyRegistered(name.to_string()).into())
                }
                Err(err) => Err(err.into()),
            })
    }

    /// Opens a match between an authenticated player and a named opponent.
    ///
    /// The caller becomes player one and moves first.
    ///
    /// # Errors
    ///
    /// Authentication failure for the caller, [`Conflict::SelfPlay`] if both
    /// names match, [`NotFound::Player`] if the opponent is unknown.
    #[instrument(skip(self, credential_hash), fields(player_one = %player_one, player_two = %player_two))]
    pub fn create_match(
        &self,
        player_one: &PlayerName,
        credential_hash: &CredentialHash,
        player_two: &PlayerName,
    ) -> Result<MatchId, EngineError> {
        self.store.exclusive(|repo| {
            let first = authenticate(repo, player_one, credential_hash)?;
            if player_one == player_two {
                warn!("Match rejected, player named themselves as opponent");
                return Err(Conflict::SelfPlay.into());
            }
            let second = repo
                .find_player_by_name(player_two.as_str())?
                .ok_or_else(|| NotFound::Player(player_two.to_string()))?;

            let game = repo.create_match(NewMatch::opening(*first.id(), *second.id()))?;
            info!(match_id = game.id(), "Match opened");
            Ok(*game.id())
        })
    }

    /// Lists up to `max_entries` players by descending score.
    ///
    /// Equal scores keep registration order.
    ///
    /// # Errors
    ///
    /// Only storage failures.
    #[instrument(skip(self))]
    pub fn leaderboard(&self, max_entries: u32) -> Result<Vec<Standing>, EngineError> {
        let players = self
            .store
            .read(|repo| repo.list_players_by_score_desc(i64::from(max_entries)))?;
        debug!(count = players.len(), "Leaderboard assembled");
        Ok(players.into_iter().map(Standing::from).collect())
    }

    /// Reports whose turn it is and the raw board, for a participant.
    ///
    /// Finished matches stay readable; the turn then names whoever would
    /// have moved next.
    ///
    /// # Errors
    ///
    /// Authentication failure, or [`NotFound::Match`] if the match is
    /// unknown or the caller does not play in it.
    #[instrument(skip(self, credential_hash), fields(name = %name))]
    pub fn match_state(
        &self,
        name: &PlayerName,
        credential_hash: &CredentialHash,
        match_id: MatchId,
    ) -> Result<MatchView, EngineError> {
        self.store.read(|repo| {
            let (_, game) = authorize(repo, name, credential_hash, match_id)?;
            let board = game.board_state()?;
            let turn = repo
                .find_player_by_id(*game.turn_player_id())?
                .ok_or_else(|| {
                    EngineError::internal(format!(
                        "turn player {} of match {} is missing",
                        game.turn_player_id(),
                        match_id
                    ))
                })?;
            Ok(MatchView::new(turn.name().clone(), board.bits()))
        })
    }

    /// Marks `position` for the caller and hands the turn to the opponent.
    ///
    /// Runs as one exclusive unit: the finished and turn checks, the board
    /// write and any score credit see and commit the same state, so two
    /// concurrent moves on one match cannot both succeed.
    ///
    /// # Errors
    ///
    /// Authentication failure, [`NotFound::Match`], [`Conflict::MatchFinished`],
    /// [`Conflict::NotYourTurn`] or [`Conflict::OccupiedCell`].
    #[instrument(skip(self, credential_hash), fields(name = %name, position = position.to_index()))]
    pub fn apply_move(
        &self,
        name: &PlayerName,
        credential_hash: &CredentialHash,
        position: Position,
        match_id: MatchId,
    ) -> Result<(), EngineError> {
        self.store.exclusive(|repo| {
            let (mut player, mut game) = authorize(repo, name, credential_hash, match_id)?;
            let player_id = *player.id();

            let board = game.board_state()?;
            if board.is_finished() {
                warn!("Move rejected, match finished");
                return Err(Conflict::MatchFinished.into());
            }
            if *game.turn_player_id() != player_id {
                warn!("Move rejected, not the caller's turn");
                return Err(Conflict::NotYourTurn.into());
            }

            let (mark, next_turn) = game
                .mark_of(player_id)
                .zip(game.opponent_of(player_id))
                .ok_or_else(|| EngineError::internal("participant without a board plane"))?;

            let next = board.set_mark(position, mark)?;
            game.record_move(next, next_turn, Utc::now().naive_utc());
            repo.update_match(&game)?;

            if next.is_player_win(mark) {
                player.credit_win();
                repo.update_player(&player)?;
                info!(score = player.score(), "Winning move credited");
            }

            info!(status = ?next.status(), "Move applied");
            Ok(())
        })
    }
}

/// Looks up `name` and checks its credential hash.
fn authenticate(
    repo: &mut dyn Repository,
    name: &PlayerName,
    credential_hash: &CredentialHash,
) -> Result<Player, EngineError> {
    match repo.find_player_by_name(name.as_str())? {
        Some(player) if player.matches_credential(credential_hash.as_str()) => Ok(player),
        _ => {
            warn!(name = %name, "Authentication failed");
            Err(EngineError::Authentication(name.to_string()))
        }
    }
}

/// Authenticates the caller and loads a match they take part in.
fn authorize(
    repo: &mut dyn Repository,
    name: &PlayerName,
    credential_hash: &CredentialHash,
    match_id: MatchId,
) -> Result<(Player, Match), EngineError> {
    let player = authenticate(repo, name, credential_hash)?;
    match repo.find_match_by_id(match_id)? {
        Some(game) if game.has_participant(*player.id()) => Ok((player, game)),
        _ => {
            warn!(match_id, "Match unknown or caller not a participant");
            Err(NotFound::Match.into())
        }
    }
}
