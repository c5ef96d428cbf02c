//! In-process store for tests and embedding.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::db::{
    DbError, DbErrorKind, Match, MatchId, NewMatch, NewPlayer, Player, PlayerId, Repository, Store,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    players: BTreeMap<PlayerId, Player>,
    matches: BTreeMap<MatchId, Match>,
    last_player_id: PlayerId,
    last_match_id: MatchId,
}

impl Repository for Tables {
    fn find_player_by_name(&mut self, name: &str) -> Result<Option<Player>, DbError> {
        Ok(self.players.values().find(|p| p.name() == name).cloned())
    }

    fn find_player_by_id(&mut self, id: PlayerId) -> Result<Option<Player>, DbError> {
        Ok(self.players.get(&id).cloned())
    }

    #[instrument(skip(self, player), fields(name = %player.name()))]
    fn create_player(&mut self, player: NewPlayer) -> Result<Player, DbError> {
        if self.players.values().any(|p| p.name() == player.name()) {
            return Err(DbError::with_kind(
                DbErrorKind::Duplicate,
                format!("player name '{}' is taken", player.name()),
            ));
        }
        self.last_player_id += 1;
        let player = Player::from_new(self.last_player_id, player, Utc::now().naive_utc());
        info!(player_id = player.id(), "Player created");
        self.players.insert(*player.id(), player.clone());
        Ok(player)
    }

    fn find_match_by_id(&mut self, id: MatchId) -> Result<Option<Match>, DbError> {
        Ok(self.matches.get(&id).cloned())
    }

    #[instrument(skip(self))]
    fn create_match(&mut self, game: NewMatch) -> Result<Match, DbError> {
        self.last_match_id += 1;
        let game = Match::from_new(self.last_match_id, game, Utc::now().naive_utc());
        info!(match_id = game.id(), "Match created");
        self.matches.insert(*game.id(), game.clone());
        Ok(game)
    }

    fn update_match(&mut self, game: &Match) -> Result<(), DbError> {
        // Participants are immutable on Match, so replacing the row only moves board, turn and time.
        match self.matches.get_mut(game.id()) {
            Some(stored) => {
                *stored = game.clone();
                Ok(())
            }
            None => Err(DbError::with_kind(
                DbErrorKind::Missing,
                format!("match {} does not exist", game.id()),
            )),
        }
    }

    fn update_player(&mut self, player: &Player) -> Result<(), DbError> {
        match self.players.get_mut(player.id()) {
            Some(stored) => {
                *stored = player.clone();
                Ok(())
            }
            None => Err(DbError::with_kind(
                DbErrorKind::Missing,
                format!("player {} does not exist", player.id()),
            )),
        }
    }

    fn list_players_by_score_desc(&mut self, limit: i64) -> Result<Vec<Player>, DbError> {
        let mut players: Vec<Player> = self.players.values().cloned().collect();
        players.sort_by(|a, b| b.score().cmp(a.score()).then(a.id().cmp(b.id())));
        players.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(players)
    }
}

/// Store keeping every table behind one mutex.
///
/// Clones share the same tables. Exclusive work runs on a copy that replaces
/// the tables only when the work succeeds.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating MemoryStore");
        Self::default()
    }
}

impl Store for MemoryStore {
    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| DbError::new("memory store lock poisoned"))?;
        work(&mut *tables)
    }

    fn exclusive<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| DbError::new("memory store lock poisoned"))?;
        let mut draft = tables.clone();
        let out = work(&mut draft)?;
        *tables = draft;
        debug!("Exclusive unit committed");
        Ok(out)
    }
}
